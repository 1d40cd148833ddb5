//! Level-wise (Apriori-style) rule miner.

mod level;
mod mining;
mod policy;

pub use level::CandidateLevel;
pub use mining::LevelwiseMiner;
pub use policy::LevelPolicy;
