//! Probability-mass-function sampling over ranked candidates.
//!
//! Given probabilities `[0.7, 0.1, 0.1, 0.1]` the first candidate is chosen
//! 70% of the time. Probabilities need not sum to one.

use bandit_core::{Action, BanditError, BanditResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Draw an index with probability `probs[i] / sum(probs)`.
pub fn sample_index<R: Rng + ?Sized>(probs: &[f32], rng: &mut R) -> BanditResult<usize> {
    if let Some(bad) = probs.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
        return Err(BanditError::DegenerateMass(format!(
            "probability {bad} is not a finite non-negative number"
        )));
    }

    let total: f64 = probs.iter().map(|&p| f64::from(p)).sum();
    if total <= 0.0 {
        return Err(BanditError::DegenerateMass(format!(
            "total mass over {} candidates is zero",
            probs.len()
        )));
    }

    // u in [0, total); strict comparison never lands on a zero-mass entry.
    let u = rng.gen::<f64>() * total;
    let mut cumulative = 0.0f64;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += f64::from(p);
        // Strict `<`, not `>= u`: a draw on a boundary goes to the next entry.
        if u < cumulative {
            return Ok(i);
        }
    }

    Err(BanditError::DegenerateMass(format!(
        "draw {u} exceeded cumulative mass {cumulative}"
    )))
}

/// Draw a candidate index from the candidates' current `prob` values.
pub fn select<R: Rng + ?Sized>(candidates: &[Action], rng: &mut R) -> BanditResult<usize> {
    let probs: Vec<f32> = candidates.iter().map(|a| a.prob).collect();
    sample_index(&probs, rng)
}

/// Owns the random source used for explore/exploit selection.
pub struct Sampler<R = StdRng> {
    rng: R,
}

impl Sampler<StdRng> {
    /// Seed from `seed`, or from the clock when none is given.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });
        info!(seed, "Sampler seeded");
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Sampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn select(&mut self, candidates: &[Action]) -> BanditResult<usize> {
        select(candidates, &mut self.rng)
    }

    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }
}
