//! News-recommendation simulation.
//!
//! Two readers, two times of day, seven article topics. Each (reader, time)
//! pair likes exactly one topic; everything else earns nothing. A learning
//! bandit should climb well above the 1/7 reward rate of random picks.

use anyhow::anyhow;
use bandit_core::{Action, AppConfig, Context, LearningEngine};
use bandit_policy::{Bandit, Sampler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

const USERS: [&str; 2] = ["ann", "tom"];
const TIMES: [&str; 2] = ["mon", "aft"];
const TOPICS: [&str; 7] = [
    "politics", "sports", "music", "food", "finance", "health", "camping",
];

#[derive(Debug, Clone, Serialize)]
pub struct WorkerSummary {
    pub worker: usize,
    pub rounds: usize,
    pub total_reward: f32,
    pub reward_rate: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub rounds: usize,
    pub total_reward: f32,
    pub reward_rate: f32,
    pub workers: Vec<WorkerSummary>,
}

pub fn catalog() -> Vec<Action> {
    TOPICS
        .iter()
        .map(|id| Action::new(*id).with("id", *id))
        .collect()
}

/// Reward for showing `action` in `context`: 1 for the liked topic, else 0.
pub fn preference(context: &Context, action: &Action) -> f32 {
    let liked = match (context.get("usr"), context.get("time")) {
        (Some("tom"), Some("mon")) => "politics",
        (Some("tom"), Some("aft")) => "music",
        (Some("ann"), Some("mon")) => "sports",
        (Some("ann"), Some("aft")) => "politics",
        _ => return 0.0,
    };
    if action.get("id") == Some(liked) {
        1.0
    } else {
        0.0
    }
}

fn random_context<R: Rng>(rng: &mut R) -> Context {
    Context::new()
        .with("usr", USERS[rng.gen_range(0..USERS.len())])
        .with("time", TIMES[rng.gen_range(0..TIMES.len())])
}

/// Run the simulation; every worker keeps its own catalog and random
/// source and shares the one bandit.
pub fn run<E: LearningEngine>(bandit: &Bandit<E>, config: &AppConfig) -> anyhow::Result<Summary> {
    let sim = &config.simulation;
    let workers = sim.workers.max(1);
    let mut base = Sampler::from_seed(config.sampler.seed);
    let seeds: Vec<u64> = (0..workers).map(|_| base.rng().gen()).collect();

    let results = std::thread::scope(|s| {
        let handles: Vec<_> = seeds
            .into_iter()
            .enumerate()
            .map(|(worker, seed)| {
                s.spawn(move || run_worker(bandit, worker, seed, sim.rounds, sim.report_every))
            })
            .collect();

        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .map_err(|_| anyhow!("simulation worker panicked"))?
                    .map_err(anyhow::Error::from)
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    let rounds: usize = results.iter().map(|w| w.rounds).sum();
    let total_reward: f32 = results.iter().map(|w| w.total_reward).sum();
    let summary = Summary {
        rounds,
        total_reward,
        reward_rate: rate(total_reward, rounds),
        workers: results,
    };

    info!(
        rounds = summary.rounds,
        reward_rate = summary.reward_rate,
        "Simulation complete"
    );
    Ok(summary)
}

fn run_worker<E: LearningEngine>(
    bandit: &Bandit<E>,
    worker: usize,
    seed: u64,
    rounds: usize,
    report_every: usize,
) -> bandit_core::BanditResult<WorkerSummary> {
    let mut sampler = Sampler::new(StdRng::seed_from_u64(seed));
    let mut candidates = catalog();
    let mut total_reward = 0.0f32;

    for round in 1..=rounds {
        let context = random_context(sampler.rng());
        bandit.predict(&context, &mut candidates)?;

        let chosen = sampler.select(&candidates)?;
        let reward = preference(&context, &candidates[chosen]);
        total_reward += reward;

        bandit.reward(&context, &candidates, chosen, reward)?;

        if report_every > 0 && round % report_every == 0 {
            info!(
                worker,
                round,
                reward_rate = rate(total_reward, round),
                "Simulation progress"
            );
        }
    }

    Ok(WorkerSummary {
        worker,
        rounds,
        total_reward,
        reward_rate: rate(total_reward, rounds),
    })
}

fn rate(total: f32, rounds: usize) -> f32 {
    if rounds == 0 {
        0.0
    } else {
        total / rounds as f32
    }
}
