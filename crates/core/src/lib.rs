//! Shared types for the contextual-bandit wrapper: the context/action data
//! model, the error taxonomy, configuration, and the learning-engine boundary.

pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use engine::{ActionScores, LearningEngine, DEFAULT_OPTIONS};
pub use error::{BanditError, BanditResult};
pub use types::{Action, Context};
