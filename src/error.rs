use crate::data::ClassId;

/// Errors raised while assembling an [`EncodedDataset`](crate::data::EncodedDataset).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error("number of labels ({labels}) does not match number of instances ({rows})")]
    LabelLenMismatch { rows: usize, labels: usize },

    #[error("instance {row} has {got} items, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("class id {class} collides with an item id")]
    ClassCollidesWithItem { class: ClassId },

    #[error("dataset has {rows} instances, at most {max} are addressable")]
    TooManyInstances { rows: usize, max: usize },
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a fraction in [0, 1], got {value}")]
    FractionOutOfRange { name: &'static str, value: f64 },

    #[error("max_antecedent_length must be at least 1")]
    ZeroAntecedentLength,

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

/// Errors returned by a mining run.
///
/// Zero rules is a valid outcome and never an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MiningError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("work budget exceeded: {used} units used, limit is {limit}")]
    BudgetExceeded { limit: usize, used: usize },
}
