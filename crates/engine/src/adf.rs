//! In-process ADF contextual-bandit engine.
//!
//! Learns a per-action cost estimate with a hashed linear regressor and
//! explores epsilon-greedily. Returned action scores are ordered by
//! probability, highest first, so callers must map them back through the
//! returned indices.

use bandit_core::{ActionScores, BanditError, BanditResult, LearningEngine};
use tracing::{debug, info};

use crate::example::{parse_line, AdfExample};
use crate::model::LinearModel;
use crate::options::EngineOptions;

pub struct AdfEngine {
    options: EngineOptions,
    model: LinearModel,
    live_examples: usize,
}

impl AdfEngine {
    /// Number of parsed examples not yet released.
    pub fn live_examples(&self) -> usize {
        self.live_examples
    }

    fn split<'a>(
        examples: &'a [AdfExample],
    ) -> BanditResult<(Option<&'a AdfExample>, &'a [AdfExample])> {
        let (shared, actions) = match examples.split_first() {
            Some((first, rest)) if first.shared => (Some(first), rest),
            _ => (None, examples),
        };

        if actions.is_empty() {
            return Err(BanditError::EngineCall(
                "batch contains no action examples".to_string(),
            ));
        }
        if actions.iter().any(|a| a.shared) {
            return Err(BanditError::EngineCall(
                "shared example must be the first line of a batch".to_string(),
            ));
        }

        Ok((shared, actions))
    }

    fn costs(&self, shared: Option<&AdfExample>, actions: &[AdfExample]) -> Vec<f32> {
        actions
            .iter()
            .map(|action| {
                let features = self
                    .model
                    .features(shared, action, &self.options.quadratic);
                self.model.predict(&features)
            })
            .collect()
    }

    /// Epsilon-greedy distribution; ties for the lowest cost share the
    /// exploit mass.
    fn explore(&self, costs: &[f32]) -> Vec<f32> {
        let n = costs.len() as f32;
        let best = costs.iter().copied().fold(f32::INFINITY, f32::min);
        let ties = costs.iter().filter(|&&c| c == best).count() as f32;
        let epsilon = self.options.epsilon;

        costs
            .iter()
            .map(|&c| {
                let explore = epsilon / n;
                if c == best {
                    explore + (1.0 - epsilon) / ties
                } else {
                    explore
                }
            })
            .collect()
    }
}

impl LearningEngine for AdfEngine {
    type Example = AdfExample;

    fn configure(options: &str) -> BanditResult<Self> {
        let options = EngineOptions::parse(options)?;

        info!(
            bits = options.bits,
            weight_bytes = (1usize << options.bits) * std::mem::size_of::<f32>(),
            epsilon = options.epsilon,
            learning_rate = options.learning_rate,
            quadratic = ?options.quadratic,
            "ADF engine configured"
        );

        Ok(Self {
            model: LinearModel::new(options.bits),
            options,
            live_examples: 0,
        })
    }

    fn parse_example(&mut self, line: &str) -> BanditResult<AdfExample> {
        let example = parse_line(line)?;
        self.live_examples += 1;
        Ok(example)
    }

    fn predict_batch(&mut self, examples: &mut [AdfExample]) -> BanditResult<ActionScores> {
        let (shared, actions) = Self::split(examples)?;
        let costs = self.costs(shared, actions);
        if costs.iter().any(|c| !c.is_finite()) {
            return Err(BanditError::EngineCall(
                "model produced a non-finite cost".to_string(),
            ));
        }

        let probs = self.explore(&costs);
        let mut order: Vec<usize> = (0..probs.len()).collect();
        order.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));

        debug!(actions = actions.len(), ?costs, "ADF predict");

        Ok(ActionScores {
            scores: order.iter().map(|&i| probs[i]).collect(),
            indices: order,
        })
    }

    fn learn_batch(&mut self, examples: &mut [AdfExample]) -> BanditResult<()> {
        let (shared, actions) = Self::split(examples)?;

        let mut labelled = actions
            .iter()
            .filter_map(|a| a.label.map(|label| (a, label)));
        let (action, label) = match (labelled.next(), labelled.next()) {
            (Some(found), None) => found,
            (None, _) => {
                return Err(BanditError::EngineCall(
                    "learn batch has no labelled action".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(BanditError::EngineCall(
                    "learn batch has more than one labelled action".to_string(),
                ))
            }
        };

        if !(label.probability > 0.0 && label.probability <= 1.0) {
            return Err(BanditError::EngineCall(format!(
                "label probability {} outside (0, 1]",
                label.probability
            )));
        }

        let eta = (self.options.learning_rate / label.probability).min(1.0);
        let features = self
            .model
            .features(shared, action, &self.options.quadratic);
        self.model.update(&features, label.cost, eta);

        debug!(cost = label.cost, probability = label.probability, eta, "ADF learn");
        Ok(())
    }

    fn release_batch(&mut self, examples: Vec<AdfExample>) {
        self.live_examples = self.live_examples.saturating_sub(examples.len());
    }

    fn engine_name(&self) -> &str {
        "adf_linear"
    }
}
