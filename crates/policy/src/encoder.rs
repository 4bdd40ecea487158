//! Context/action encoding into the engine's multi-line ADF example text.
//!
//! ```text
//! shared |User time=mon usr=tom
//! |Action id=politics
//! 0:-1.000000:0.2 |Action id=sports
//! ```
//!
//! Line 0 is always the shared context; line `i + 1` is candidate `i`.
//! Property keys and values must not contain whitespace, `|` or `:`, which
//! delimit tokens, namespaces and feature weights in the line format.

use bandit_core::{Action, BanditError, BanditResult, Context};
use std::collections::BTreeMap;

fn is_reserved(c: char) -> bool {
    c.is_whitespace() || c == '|' || c == ':'
}

fn check_properties(owner: &str, properties: &BTreeMap<String, String>) -> BanditResult<()> {
    for (key, value) in properties {
        if key.is_empty() || key.contains(is_reserved) || value.contains(is_reserved) {
            return Err(BanditError::ExampleParse(format!(
                "{owner} property '{key}={value}' cannot be encoded"
            )));
        }
    }
    Ok(())
}

fn check_inputs(context: &Context, candidates: &[Action]) -> BanditResult<()> {
    check_properties("context", &context.properties)?;
    for action in candidates {
        check_properties(&format!("action '{}'", action.id), &action.properties)?;
    }
    Ok(())
}

fn shared_line(context: &Context) -> String {
    format!("shared |User {}", context.properties())
}

fn action_line(action: &Action) -> String {
    format!("|Action {}", action.properties())
}

/// Lines for a predict request, candidates in input order.
pub fn build_predict_example(
    context: &Context,
    candidates: &[Action],
) -> BanditResult<Vec<String>> {
    check_inputs(context, candidates)?;

    let mut lines = Vec::with_capacity(candidates.len() + 1);
    lines.push(shared_line(context));
    lines.extend(candidates.iter().map(action_line));
    Ok(lines)
}

/// Lines for a learn request. The selected candidate's line carries the
/// `0:<cost>:<probability>` label, where cost is the negated reward and
/// probability is the candidate's current `prob` in its shortest exact form,
/// so small positive probabilities survive the round trip.
pub fn build_reward_example(
    context: &Context,
    candidates: &[Action],
    selected: usize,
    reward: f32,
) -> BanditResult<Vec<String>> {
    if selected >= candidates.len() {
        return Err(BanditError::Index {
            index: selected,
            len: candidates.len(),
        });
    }
    check_inputs(context, candidates)?;

    // The engine minimises cost.
    let cost = if reward == 0.0 { 0.0 } else { -reward };

    let mut lines = Vec::with_capacity(candidates.len() + 1);
    lines.push(shared_line(context));
    lines.extend(candidates.iter().enumerate().map(|(i, action)| {
        if i == selected {
            format!("0:{cost:.6}:{} {}", action.prob, action_line(action))
        } else {
            action_line(action)
        }
    }));
    Ok(lines)
}
