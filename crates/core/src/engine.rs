//! Learning-engine boundary.
//!
//! The bandit wrapper talks to its learner only through [`LearningEngine`]:
//! parse example lines into engine-owned handles, run predict or learn over a
//! multi-line batch, and hand the handles back. The engine decides its own
//! exploration and may reorder or drop actions in what it returns, so scores
//! always come with explicit indices.

use crate::error::BanditResult;

/// Default option string: ADF contextual bandit, 2^18 weights, user×action
/// interactions, 20% epsilon-greedy exploration.
pub const DEFAULT_OPTIONS: &str = "--cb_explore_adf -b 18 -q UA --quiet --epsilon 0.2";

/// Scores returned by a predict call.
///
/// `indices[i]` is the action position (0-based, shared line excluded) that
/// `scores[i]` belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionScores {
    pub scores: Vec<f32>,
    pub indices: Vec<usize>,
}

impl ActionScores {
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices.iter().copied().zip(self.scores.iter().copied())
    }
}

/// Narrow predict/learn/release interface of a contextual-bandit learner.
///
/// Implementations are driven from one thread at a time; the wrapper holds
/// its lock across a whole parse → call → release sequence.
pub trait LearningEngine: Send {
    /// Engine-owned example handle. Must be given back via `release_batch`.
    type Example: Send;

    /// Build an engine from its option string.
    fn configure(options: &str) -> BanditResult<Self>
    where
        Self: Sized;

    fn parse_example(&mut self, line: &str) -> BanditResult<Self::Example>;

    fn predict_batch(&mut self, examples: &mut [Self::Example]) -> BanditResult<ActionScores>;

    /// Update the model from a labelled batch. A failed call must leave the
    /// model untouched.
    fn learn_batch(&mut self, examples: &mut [Self::Example]) -> BanditResult<()>;

    fn release_batch(&mut self, examples: Vec<Self::Example>);

    /// Engine name for logging.
    fn engine_name(&self) -> &str;
}
