use serde::{Deserialize, Serialize};

/// Which candidates the level-wise search keeps, emits and extends.
///
/// Every variant retains only candidates that reach the support threshold
/// and emits only those that reach the confidence threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum LevelPolicy {
    /// Extend every frequent candidate.
    #[default]
    Frequent,
    /// Keep only candidates whose all-confidence reaches the threshold.
    AllConfidence { min_all_confidence: f64 },
    /// Extend only candidates that are not yet confident.
    UntilConfident,
}

impl LevelPolicy {
    pub fn tracks_all_confidence(&self) -> bool {
        matches!(self, LevelPolicy::AllConfidence { .. })
    }

    /// Extra frequency-like condition on top of support.
    pub fn keeps(&self, all_confidence: f64) -> bool {
        match *self {
            LevelPolicy::AllConfidence { min_all_confidence } => {
                all_confidence >= min_all_confidence
            }
            LevelPolicy::Frequent | LevelPolicy::UntilConfident => true,
        }
    }

    /// Whether a kept candidate moves on to candidate generation.
    pub fn extends(&self, confident: bool) -> bool {
        match self {
            LevelPolicy::UntilConfident => !confident,
            LevelPolicy::Frequent | LevelPolicy::AllConfidence { .. } => true,
        }
    }
}
