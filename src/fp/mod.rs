//! FP-Growth (tree-structured) rule miner.

pub mod builder;
pub mod combinations;
pub mod mining;
pub mod tree;

pub use builder::{build_conditional_fp_tree, build_fp_tree, ItemOrder};
pub use mining::TreeMiner;
pub use tree::{FPNode, FPTree, PrefixPath};
