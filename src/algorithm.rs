//! Miner selection and the driver-facing entry points.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::apriori::{LevelPolicy, LevelwiseMiner};
use crate::charm::ClosedMiner;
use crate::config::{MiningConfig, SupportScope};
use crate::data::EncodedDataset;
use crate::error::{ConfigError, MiningError};
use crate::fp::TreeMiner;
use crate::rules::Rule;

/// A single mining run over one dataset.
pub trait RuleMiner {
    /// Run to completion and return the rules in discovery order.
    fn mine(&mut self) -> Result<Vec<Rule>, MiningError>;
}

/// Miner family, plus the acceptance policy for the level-wise one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Levelwise(LevelPolicy),
    Tree,
    Closed,
}

impl Algorithm {
    pub fn miner<'a>(
        &self,
        dataset: &'a EncodedDataset,
        config: &MiningConfig,
    ) -> Result<Box<dyn RuleMiner + 'a>, MiningError> {
        Ok(match *self {
            Algorithm::Levelwise(policy) => Box::new(LevelwiseMiner::new(dataset, config, policy)?),
            Algorithm::Tree => Box::new(TreeMiner::new(dataset, config)?),
            Algorithm::Closed => Box::new(ClosedMiner::new(dataset, config)?),
        })
    }
}

/// Named set-ups of the miners used by well-known associative classifiers.
///
/// `LevelPolicy::UntilConfident` has no preset. Select it with
/// `Algorithm::Levelwise(LevelPolicy::UntilConfident)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Level-wise, global support, every frequent candidate extended.
    Cba,
    /// As `Cba` with support relative to each class.
    Cba2,
    /// Level-wise with an all-confidence filter.
    Acac,
    /// FP-Growth with global support.
    Cmar,
    /// Tidset intersection over closed itemsets.
    Mcar,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Cba,
        Preset::Cba2,
        Preset::Acac,
        Preset::Cmar,
        Preset::Mcar,
    ];

    pub const DEFAULT_MIN_ALL_CONFIDENCE: f64 = 0.5;

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Cba => "cba",
            Preset::Cba2 => "cba2",
            Preset::Acac => "acac",
            Preset::Cmar => "cmar",
            Preset::Mcar => "mcar",
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Preset::Cba | Preset::Cba2 => Algorithm::Levelwise(LevelPolicy::Frequent),
            Preset::Acac => Algorithm::Levelwise(LevelPolicy::AllConfidence {
                min_all_confidence: Self::DEFAULT_MIN_ALL_CONFIDENCE,
            }),
            Preset::Cmar => Algorithm::Tree,
            Preset::Mcar => Algorithm::Closed,
        }
    }

    /// `config` with the support scope this preset expects.
    pub fn configure(&self, config: MiningConfig) -> MiningConfig {
        match self {
            Preset::Cba2 => config.with_support_scope(SupportScope::PerClass),
            _ => config.with_support_scope(SupportScope::Global),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

/// Mine `dataset` with one algorithm.
pub fn mine_rules(
    dataset: &EncodedDataset,
    algorithm: Algorithm,
    config: &MiningConfig,
) -> Result<Vec<Rule>, MiningError> {
    algorithm.miner(dataset, config)?.mine()
}

/// One independent `(dataset, algorithm, config)` run.
#[derive(Debug, Clone)]
pub struct MiningJob<'a> {
    pub dataset: &'a EncodedDataset,
    pub algorithm: Algorithm,
    pub config: MiningConfig,
}

impl<'a> MiningJob<'a> {
    pub fn new(dataset: &'a EncodedDataset, algorithm: Algorithm, config: MiningConfig) -> Self {
        Self {
            dataset,
            algorithm,
            config,
        }
    }

    pub fn from_preset(dataset: &'a EncodedDataset, preset: Preset, config: MiningConfig) -> Self {
        Self::new(dataset, preset.algorithm(), preset.configure(config))
    }

    pub fn run(&self) -> Result<Vec<Rule>, MiningError> {
        mine_rules(self.dataset, self.algorithm, &self.config)
    }
}

/// Run independent jobs on the rayon pool. Results keep the job order.
pub fn mine_batch(jobs: &[MiningJob<'_>]) -> Vec<Result<Vec<Rule>, MiningError>> {
    jobs.par_iter().map(MiningJob::run).collect()
}
