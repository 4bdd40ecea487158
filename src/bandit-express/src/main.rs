//! Bandit Express — contextual-bandit wrapper demo driver.
//!
//! Wires configuration, logging, the ADF engine and the sampler, then runs a
//! news-recommendation simulation through the predict → select → reward loop.

mod simulation;

use bandit_core::config::AppConfig;
use bandit_engine::AdfEngine;
use bandit_policy::Bandit;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bandit-express")]
#[command(about = "Contextual-bandit explore/exploit simulation")]
#[command(version)]
struct Cli {
    /// Optional TOML config file
    #[arg(long, env = "BANDIT_EXPRESS_CONFIG")]
    config: Option<String>,

    /// Engine option string (overrides config)
    #[arg(long, env = "BANDIT_EXPRESS__ENGINE__OPTIONS")]
    options: Option<String>,

    /// Sampler seed (overrides config; clock-seeded when absent)
    #[arg(long, env = "BANDIT_EXPRESS__SAMPLER__SEED")]
    seed: Option<u64>,

    /// Simulation rounds per worker (overrides config)
    #[arg(long, env = "BANDIT_EXPRESS__SIMULATION__ROUNDS")]
    rounds: Option<usize>,

    /// Concurrent simulation workers sharing one engine (overrides config)
    #[arg(long, env = "BANDIT_EXPRESS__SIMULATION__WORKERS")]
    workers: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bandit_express=info,bandit_policy=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(options) = cli.options {
        config.engine.options = options;
    }
    if let Some(seed) = cli.seed {
        config.sampler.seed = Some(seed);
    }
    if let Some(rounds) = cli.rounds {
        config.simulation.rounds = rounds;
    }
    if let Some(workers) = cli.workers {
        config.simulation.workers = workers.max(1);
    }

    info!(
        options = %config.engine.options,
        seed = ?config.sampler.seed,
        rounds = config.simulation.rounds,
        workers = config.simulation.workers,
        "Configuration loaded"
    );

    let bandit = Bandit::<AdfEngine>::configure(&config.engine.options)?;
    let summary = simulation::run(&bandit, &config)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
