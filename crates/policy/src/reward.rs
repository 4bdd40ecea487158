//! Reward reporting: encode an observed outcome and feed it to the engine.

use bandit_core::{Action, BanditResult, Context, LearningEngine};
use tracing::debug;

use crate::adapter::Bandit;
use crate::encoder::build_reward_example;

impl<E: LearningEngine> Bandit<E> {
    /// Teach the engine that choosing `candidates[selected]` in `context`
    /// earned `reward`.
    ///
    /// `selected` indexes `candidates` as ordered now, i.e. after any
    /// reordering done by [`Bandit::predict`], and the candidate's `prob`
    /// must still hold the probability it was drawn with. An out-of-range
    /// index fails before the engine is touched.
    pub fn reward(
        &self,
        context: &Context,
        candidates: &[Action],
        selected: usize,
        reward: f32,
    ) -> BanditResult<()> {
        let lines = build_reward_example(context, candidates, selected, reward)?;

        debug!(
            selected,
            action = %candidates[selected].id,
            prob = candidates[selected].prob,
            reward,
            "Reward"
        );

        self.learn_lines(&lines)
    }
}
