//! Contextual-bandit policy layer — example encoding, serialized engine
//! access, score reconciliation and ranking, explore/exploit sampling, and
//! reward reporting.

pub mod adapter;
pub mod encoder;
pub mod ranker;
pub mod reward;
pub mod sampler;

#[cfg(test)]
mod testing;

pub use adapter::Bandit;
pub use encoder::{build_predict_example, build_reward_example};
pub use ranker::{apply_scores, rank};
pub use sampler::{sample_index, select, Sampler};
