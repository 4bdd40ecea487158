use serde::Deserialize;

use crate::engine::DEFAULT_OPTIONS;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `BANDIT_EXPRESS__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_engine_options")]
    pub options: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SamplerConfig {
    /// Fixed seed for the process-level random source. When unset the
    /// source is seeded from the clock at startup.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    #[serde(default = "default_report_every")]
    pub report_every: usize,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

// Default functions
fn default_engine_options() -> String {
    DEFAULT_OPTIONS.to_string()
}
fn default_rounds() -> usize {
    10_000
}
fn default_report_every() -> usize {
    500
}
fn default_workers() -> usize {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            options: default_engine_options(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            report_every: default_report_every(),
            workers: default_workers(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional config file and environment
    /// variables. Environment values win over the file.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("BANDIT_EXPRESS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.engine.options, DEFAULT_OPTIONS);
        assert!(config.sampler.seed.is_none());
        assert_eq!(config.simulation.rounds, 10_000);
        assert_eq!(config.simulation.report_every, 500);
        assert_eq!(config.simulation.workers, 1);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Some("/nonexistent/bandit-express")).unwrap();
        assert_eq!(config.engine.options, DEFAULT_OPTIONS);
    }
}
