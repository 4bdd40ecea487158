//! Command-line style option string accepted by [`AdfEngine::configure`].
//!
//! [`AdfEngine::configure`]: crate::AdfEngine

use bandit_core::{BanditError, BanditResult};

const DEFAULT_EPSILON: f32 = 0.05;
const DEFAULT_BITS: u32 = 18;
const DEFAULT_LEARNING_RATE: f32 = 0.5;
/// 2^24 weights, 64 MiB of `f32`.
const MAX_BITS: u32 = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub epsilon: f32,
    pub bits: u32,
    /// Namespace pairs crossed into quadratic features, e.g. `('U', 'A')`.
    pub quadratic: Vec<(char, char)>,
    pub learning_rate: f32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            bits: DEFAULT_BITS,
            quadratic: Vec::new(),
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }
}

impl EngineOptions {
    pub fn parse(options: &str) -> BanditResult<Self> {
        let mut parsed = Self::default();
        let mut adf = false;
        let mut tokens = options.split_whitespace();

        while let Some(token) = tokens.next() {
            match token {
                "--cb_explore_adf" => adf = true,
                "--quiet" | "--no_stdin" => {}
                "--epsilon" => {
                    let epsilon: f32 = value(token, tokens.next())?;
                    if !(0.0..=1.0).contains(&epsilon) {
                        return Err(invalid(format!("--epsilon must be in [0, 1], got {epsilon}")));
                    }
                    parsed.epsilon = epsilon;
                }
                "-b" | "--bit_precision" => {
                    let bits: u32 = value(token, tokens.next())?;
                    if bits == 0 || bits > MAX_BITS {
                        return Err(invalid(format!(
                            "{token} must be in 1..={MAX_BITS}, got {bits}"
                        )));
                    }
                    parsed.bits = bits;
                }
                "-q" | "--quadratic" => {
                    let pair: String = value(token, tokens.next())?;
                    let mut chars = pair.chars();
                    match (chars.next(), chars.next(), chars.next()) {
                        (Some(a), Some(b), None) => parsed.quadratic.push((a, b)),
                        _ => {
                            return Err(invalid(format!(
                                "{token} expects two namespace characters, got '{pair}'"
                            )))
                        }
                    }
                }
                "-l" | "--learning_rate" => {
                    let rate: f32 = value(token, tokens.next())?;
                    if !(rate > 0.0 && rate.is_finite()) {
                        return Err(invalid(format!("{token} must be positive, got {rate}")));
                    }
                    parsed.learning_rate = rate;
                }
                "--cb_explore" | "--cb" => {
                    return Err(invalid(format!(
                        "{token}: only action-dependent-feature reductions are supported"
                    )))
                }
                other => return Err(invalid(format!("unrecognised option '{other}'"))),
            }
        }

        if !adf {
            return Err(invalid("--cb_explore_adf is required".to_string()));
        }

        Ok(parsed)
    }
}

fn value<T: std::str::FromStr>(option: &str, raw: Option<&str>) -> BanditResult<T> {
    let raw = raw.ok_or_else(|| invalid(format!("{option} requires a value")))?;
    raw.parse()
        .map_err(|_| invalid(format!("invalid value '{raw}' for {option}")))
}

fn invalid(msg: String) -> BanditError {
    BanditError::Configuration(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandit_core::DEFAULT_OPTIONS;

    #[test]
    fn test_default_option_string() {
        let opts = EngineOptions::parse(DEFAULT_OPTIONS).unwrap();
        assert_eq!(opts.bits, 18);
        assert_eq!(opts.quadratic, vec![('U', 'A')]);
        assert!((opts.epsilon - 0.2).abs() < f32::EPSILON);
        assert!((opts.learning_rate - DEFAULT_LEARNING_RATE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_minimal_options() {
        let opts = EngineOptions::parse("--cb_explore_adf").unwrap();
        assert_eq!(opts, EngineOptions::default());
    }

    #[test]
    fn test_bit_precision_bounds() {
        let opts = EngineOptions::parse("--cb_explore_adf -b 24").unwrap();
        assert_eq!(opts.bits, MAX_BITS);
        let opts = EngineOptions::parse("--cb_explore_adf --bit_precision 1").unwrap();
        assert_eq!(opts.bits, 1);
    }

    #[test]
    fn test_rejects_invalid_options() {
        for bad in [
            "",
            "--epsilon 0.2",
            "--cb_explore_adf --epsilon",
            "--cb_explore_adf --epsilon 1.5",
            "--cb_explore_adf --epsilon abc",
            "--cb_explore_adf -b 0",
            "--cb_explore_adf -b 25",
            "--cb_explore_adf --bit_precision 30",
            "--cb_explore_adf -q UAX",
            "--cb_explore_adf -l 0",
            "--cb_explore_adf --bogus",
            "--cb_explore 7 --cover 3",
        ] {
            let err = EngineOptions::parse(bad).unwrap_err();
            assert!(
                matches!(err, BanditError::Configuration(_)),
                "'{bad}' should be a configuration error"
            );
        }
    }
}
