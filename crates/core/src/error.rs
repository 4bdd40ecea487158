use thiserror::Error;

pub type BanditResult<T> = Result<T, BanditError>;

#[derive(Error, Debug)]
pub enum BanditError {
    /// The engine rejected its option string or could not initialize.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A generated example line could not be parsed by the engine.
    #[error("Example parse error: {0}")]
    ExampleParse(String),

    /// Predict or learn failed inside the engine.
    #[error("Engine call error: {0}")]
    EngineCall(String),

    #[error("Selected index {index} out of range for {len} candidates")]
    Index { index: usize, len: usize },

    /// The probability mass handed to the sampler cannot be sampled from.
    #[error("Degenerate probability mass: {0}")]
    DegenerateMass(String),

    #[error("Config loading error: {0}")]
    Config(#[from] config::ConfigError),
}
