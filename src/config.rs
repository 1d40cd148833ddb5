//! Thresholds shared by all miners.

use serde::{Deserialize, Serialize};

use crate::data::EncodedDataset;
use crate::error::ConfigError;

/// What a relative support threshold is measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportScope {
    /// Fraction of the whole dataset.
    #[default]
    Global,
    /// Fraction of each class's own frequency.
    PerClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub min_support: f64,
    pub min_confidence: f64,
    pub support_scope: SupportScope,
    /// Longest antecedent any miner may produce.
    pub max_antecedent_length: usize,
    /// Work-unit limit for one run; `None` runs unbounded.
    pub max_work: Option<usize>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 0.01,
            min_confidence: 0.5,
            support_scope: SupportScope::Global,
            max_antecedent_length: 16,
            max_work: None,
        }
    }
}

impl MiningConfig {
    pub fn new(min_support: f64, min_confidence: f64) -> Self {
        Self {
            min_support,
            min_confidence,
            ..Self::default()
        }
    }

    pub fn with_support_scope(mut self, scope: SupportScope) -> Self {
        self.support_scope = scope;
        self
    }

    pub fn with_max_antecedent_length(mut self, length: usize) -> Self {
        self.max_antecedent_length = length;
        self
    }

    pub fn with_max_work(mut self, units: usize) -> Self {
        self.max_work = Some(units);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("min_support", self.min_support)?;
        check_fraction("min_confidence", self.min_confidence)?;
        if self.max_antecedent_length == 0 {
            return Err(ConfigError::ZeroAntecedentLength);
        }
        Ok(())
    }

    /// Resolve the relative support threshold against a dataset.
    pub fn thresholds(&self, dataset: &EncodedDataset) -> SupportThresholds {
        SupportThresholds::resolve(self.min_support, self.support_scope, dataset)
    }
}

pub(crate) fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { name, value })
    }
}

/// `max(1, ceil(fraction * base))`.
///
/// A rule has to occur at least once, so a zero fraction still means one
/// instance.
pub fn relative_support(fraction: f64, base: usize) -> usize {
    // keep 0.1 * 30 at 3 rather than 4
    let scaled = fraction * base as f64 - 1e-9;
    (scaled.ceil().max(0.0) as usize).max(1)
}

/// Absolute support thresholds, one per class index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportThresholds {
    per_class: Vec<usize>,
    floor: usize,
}

impl SupportThresholds {
    pub fn resolve(fraction: f64, scope: SupportScope, dataset: &EncodedDataset) -> Self {
        let per_class: Vec<usize> = match scope {
            SupportScope::Global => {
                vec![relative_support(fraction, dataset.len()); dataset.num_classes()]
            }
            SupportScope::PerClass => dataset
                .frequency_by_class()
                .iter()
                .map(|&freq| relative_support(fraction, freq))
                .collect(),
        };
        let floor = per_class
            .iter()
            .copied()
            .min()
            .unwrap_or_else(|| relative_support(fraction, dataset.len()));
        Self { per_class, floor }
    }

    /// Threshold a rule for `class_idx` has to reach.
    pub fn for_class(&self, class_idx: usize) -> usize {
        self.per_class[class_idx]
    }

    /// Smallest threshold over all classes; anything below it can never
    /// take part in an accepted rule.
    pub fn floor(&self) -> usize {
        self.floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_support() {
        assert_eq!(relative_support(0.2, 5), 1);
        assert_eq!(relative_support(0.1, 30), 3);
        assert_eq!(relative_support(0.25, 10), 3);
        assert_eq!(relative_support(0.0, 10), 1);
        assert_eq!(relative_support(1.0, 7), 7);
    }

    #[test]
    fn test_thresholds_per_class() {
        let data = EncodedDataset::from_rows(
            &[vec![0], vec![0], vec![1], vec![1], vec![1], vec![1]],
            &[8, 8, 9, 9, 9, 9],
        )
        .unwrap();

        let global = SupportThresholds::resolve(0.5, SupportScope::Global, &data);
        assert_eq!(global.for_class(0), 3);
        assert_eq!(global.for_class(1), 3);
        assert_eq!(global.floor(), 3);

        let per_class = SupportThresholds::resolve(0.5, SupportScope::PerClass, &data);
        assert_eq!(per_class.for_class(0), 1);
        assert_eq!(per_class.for_class(1), 2);
        assert_eq!(per_class.floor(), 1);
    }

    #[test]
    fn test_validate() {
        assert!(MiningConfig::default().validate().is_ok());
        assert_eq!(
            MiningConfig::new(1.5, 0.5).validate(),
            Err(ConfigError::FractionOutOfRange {
                name: "min_support",
                value: 1.5
            })
        );
        assert!(MiningConfig::new(0.1, f64::NAN).validate().is_err());
        assert_eq!(
            MiningConfig::default()
                .with_max_antecedent_length(0)
                .validate(),
            Err(ConfigError::ZeroAntecedentLength)
        );
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config: MiningConfig =
            serde_json::from_str(r#"{"min_support": 0.2, "support_scope": "per_class"}"#).unwrap();
        assert_eq!(config.min_support, 0.2);
        assert_eq!(config.min_confidence, 0.5);
        assert_eq!(config.support_scope, SupportScope::PerClass);
        assert_eq!(config.max_work, None);
    }
}
