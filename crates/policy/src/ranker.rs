//! Write engine scores back onto candidates and order them.

use bandit_core::{Action, ActionScores, BanditError, BanditResult};

/// Assign `scores[i]` to `candidates[indices[i]]`.
///
/// The whole mapping is validated before anything is written, so a bad
/// response leaves the candidates as they were. Candidates the engine did
/// not score get a probability of zero.
pub fn apply_scores(candidates: &mut [Action], scores: &ActionScores) -> BanditResult<()> {
    if scores.scores.len() != scores.indices.len() {
        return Err(BanditError::EngineCall(format!(
            "engine returned {} scores for {} indices",
            scores.scores.len(),
            scores.indices.len()
        )));
    }

    let mut seen = vec![false; candidates.len()];
    for &index in &scores.indices {
        let Some(slot) = seen.get_mut(index) else {
            return Err(BanditError::EngineCall(format!(
                "engine returned action {index} for {} candidates",
                candidates.len()
            )));
        };
        if *slot {
            return Err(BanditError::EngineCall(format!(
                "engine scored action {index} twice"
            )));
        }
        *slot = true;
    }

    for action in candidates.iter_mut() {
        action.prob = 0.0;
    }
    for (index, score) in scores.iter() {
        candidates[index].prob = score;
    }
    Ok(())
}

/// Sort by probability, highest first. Stable, so ties keep the order the
/// candidates were given in.
pub fn rank(candidates: &mut [Action]) {
    candidates.sort_by(|a, b| b.prob.total_cmp(&a.prob));
}
