//! Scriptable engine with call counters for adapter tests.

use bandit_core::{ActionScores, BanditError, BanditResult, LearningEngine};

#[derive(Debug, Default)]
pub struct StubEngine {
    pub options: String,
    /// Fixed predict response; uniform identity mapping when unset.
    pub response: Option<ActionScores>,
    pub fail_predict: bool,
    pub fail_learn: bool,
    /// Zero-based line number at which parsing fails.
    pub fail_parse_at: Option<usize>,
    pub parsed: usize,
    pub released: usize,
    pub predict_calls: usize,
    pub learn_calls: usize,
    /// Every line successfully parsed, in order.
    pub lines: Vec<String>,
    /// Lines of each batch handed to `learn_batch`.
    pub learned: Vec<Vec<String>>,
    attempts: usize,
}

impl StubEngine {
    pub fn responding(response: ActionScores) -> Self {
        Self {
            response: Some(response),
            ..Default::default()
        }
    }
}

impl LearningEngine for StubEngine {
    type Example = String;

    fn configure(options: &str) -> BanditResult<Self> {
        if options == "fail" {
            return Err(BanditError::Configuration("rejected".to_string()));
        }
        Ok(Self {
            options: options.to_string(),
            ..Default::default()
        })
    }

    fn parse_example(&mut self, line: &str) -> BanditResult<String> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_parse_at == Some(attempt) {
            return Err(BanditError::ExampleParse(line.to_string()));
        }
        self.parsed += 1;
        self.lines.push(line.to_string());
        Ok(line.to_string())
    }

    fn predict_batch(&mut self, examples: &mut [String]) -> BanditResult<ActionScores> {
        self.predict_calls += 1;
        if self.fail_predict {
            return Err(BanditError::EngineCall("predict failed".to_string()));
        }
        if let Some(response) = &self.response {
            return Ok(response.clone());
        }
        let n = examples.len().saturating_sub(1);
        Ok(ActionScores {
            scores: vec![1.0 / n.max(1) as f32; n],
            indices: (0..n).collect(),
        })
    }

    fn learn_batch(&mut self, examples: &mut [String]) -> BanditResult<()> {
        self.learn_calls += 1;
        if self.fail_learn {
            return Err(BanditError::EngineCall("learn failed".to_string()));
        }
        self.learned.push(examples.to_vec());
        Ok(())
    }

    fn release_batch(&mut self, examples: Vec<String>) {
        self.released += examples.len();
    }

    fn engine_name(&self) -> &str {
        "stub"
    }
}
