//! Class-association rule mining.
//!
//! Three engines turn an [`EncodedDataset`] into a flat list of
//! `antecedent -> class` [`Rule`]s:
//!
//! - [`apriori`]: level-wise candidate generation with anti-monotone pruning,
//! - [`fp`]: FP-Growth over a class-aware prefix tree,
//! - [`charm`]: closed itemsets by tidset intersection.
//!
//! ```
//! use carmine::{mine_rules, Algorithm, EncodedDataset, MiningConfig};
//!
//! let data = EncodedDataset::from_rows(
//!     &[vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![1, 3]],
//!     &[10, 10, 11, 11, 11],
//! )?;
//! let rules = mine_rules(&data, Algorithm::Tree, &MiningConfig::new(0.2, 0.6))?;
//! assert!(rules.iter().any(|r| r.antecedent().items() == [3] && r.class() == 11));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod algorithm;
pub mod apriori;
pub mod budget;
pub mod charm;
pub mod config;
pub mod data;
pub mod error;
pub mod fp;
pub mod rules;

#[cfg(feature = "python")]
mod python;
#[cfg(test)]
mod testing;

pub use algorithm::{mine_batch, mine_rules, Algorithm, MiningJob, Preset, RuleMiner};
pub use apriori::{LevelPolicy, LevelwiseMiner};
pub use budget::MiningBudget;
pub use charm::ClosedMiner;
pub use config::{MiningConfig, SupportScope, SupportThresholds};
pub use data::{ClassId, EncodedDataset, Item, ItemCatalog};
pub use error::{ConfigError, DatasetError, MiningError};
pub use fp::TreeMiner;
pub use rules::{Antecedent, Rule};
