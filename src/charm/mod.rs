//! Tidset-intersection (CHARM-style) miner over closed itemsets.

mod mining;
mod superset;
mod tidset;

pub use mining::ClosedMiner;
pub use superset::{Itemset, SupersetTable};
pub use tidset::Tidset;

#[cfg(test)]
mod tests;
