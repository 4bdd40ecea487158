//! Engine adapter: owns the learning engine and serializes every
//! parse → predict/learn → release sequence behind one lock.

use bandit_core::{
    Action, ActionScores, BanditResult, Context, LearningEngine, DEFAULT_OPTIONS,
};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::encoder::build_predict_example;
use crate::ranker::{apply_scores, rank};

/// Parsed examples for one engine call. Dropping the batch hands every
/// example back to the engine, whichever way the call exits.
struct ExampleBatch<'e, E: LearningEngine> {
    engine: &'e mut E,
    examples: Vec<E::Example>,
}

impl<'e, E: LearningEngine> ExampleBatch<'e, E> {
    fn parse(engine: &'e mut E, lines: &[String]) -> BanditResult<Self> {
        let mut batch = Self {
            engine,
            examples: Vec::with_capacity(lines.len()),
        };
        for line in lines {
            let example = batch.engine.parse_example(line)?;
            batch.examples.push(example);
        }
        Ok(batch)
    }

    fn predict(&mut self) -> BanditResult<ActionScores> {
        self.engine.predict_batch(&mut self.examples)
    }

    fn learn(&mut self) -> BanditResult<()> {
        self.engine.learn_batch(&mut self.examples)
    }
}

impl<E: LearningEngine> Drop for ExampleBatch<'_, E> {
    fn drop(&mut self) {
        let examples = std::mem::take(&mut self.examples);
        self.engine.release_batch(examples);
    }
}

/// Thread-safe contextual bandit over a single learning engine.
///
/// Calls from any number of threads are totally ordered by lock acquisition;
/// each blocks for the full engine round trip.
pub struct Bandit<E: LearningEngine> {
    engine: Mutex<E>,
}

impl<E: LearningEngine> Bandit<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    /// Configure the engine from an option string, falling back to
    /// [`DEFAULT_OPTIONS`] when it is blank.
    pub fn configure(options: &str) -> BanditResult<Self> {
        let options = if options.trim().is_empty() {
            DEFAULT_OPTIONS
        } else {
            options
        };
        let engine = E::configure(options)?;
        info!(engine = engine.engine_name(), options, "Bandit engine ready");
        Ok(Self::new(engine))
    }

    /// Score `candidates` for `context`, write each candidate's `prob`, and
    /// reorder the slice highest probability first.
    ///
    /// On error the candidates are left exactly as they were.
    pub fn predict(&self, context: &Context, candidates: &mut [Action]) -> BanditResult<()> {
        if candidates.is_empty() {
            debug!("Predict with no candidates, nothing to rank");
            return Ok(());
        }

        let lines = build_predict_example(context, candidates)?;

        let mut engine = self.engine.lock();
        let scores = Self::run_predict(&mut engine, &lines)?;

        // Candidates are only touched while the engine lock is held.
        apply_scores(candidates, &scores).inspect_err(|e| {
            warn!(error = %e, "Engine returned an unusable score mapping");
        })?;
        rank(candidates);

        debug!(
            candidates = candidates.len(),
            top = %candidates[0].id,
            top_prob = candidates[0].prob,
            "Predict complete"
        );
        Ok(())
    }

    /// Run a learn over pre-built, labelled example lines.
    pub fn learn_lines(&self, lines: &[String]) -> BanditResult<()> {
        let mut engine = self.engine.lock();
        let mut batch = ExampleBatch::parse(&mut *engine, lines)?;
        batch.learn().inspect_err(|e| {
            warn!(error = %e, lines = lines.len(), "Engine learn failed");
        })
    }

    /// Inspect the engine under the lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        let engine = self.engine.lock();
        f(&engine)
    }

    pub fn into_inner(self) -> E {
        self.engine.into_inner()
    }

    fn run_predict(engine: &mut E, lines: &[String]) -> BanditResult<ActionScores> {
        let mut batch = ExampleBatch::parse(engine, lines)?;
        batch.predict().inspect_err(|e| {
            warn!(error = %e, lines = lines.len(), "Engine predict failed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubEngine;
    use bandit_core::BanditError;
    use std::sync::Arc;

    fn catalog(ids: &[&str]) -> Vec<Action> {
        ids.iter().map(|id| Action::new(*id).with("id", *id)).collect()
    }

    fn ids(candidates: &[Action]) -> Vec<&str> {
        candidates.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_configure_defaults_blank_options() {
        let bandit = Bandit::<StubEngine>::configure("  ").unwrap();
        bandit.with_engine(|e| assert_eq!(e.options, DEFAULT_OPTIONS));

        let bandit = Bandit::<StubEngine>::configure("--custom").unwrap();
        bandit.with_engine(|e| assert_eq!(e.options, "--custom"));
    }

    #[test]
    fn test_configure_error_propagates() {
        let err = Bandit::<StubEngine>::configure("fail").err().unwrap();
        assert!(matches!(err, BanditError::Configuration(_)));
    }

    #[test]
    fn test_predict_reconciles_reversed_indices() {
        let bandit = Bandit::new(StubEngine::responding(ActionScores {
            scores: vec![0.6, 0.3, 0.1],
            indices: vec![2, 1, 0],
        }));
        let mut acts = catalog(&["a", "b", "c"]);

        bandit.predict(&Context::new(), &mut acts).unwrap();

        assert_eq!(ids(&acts), vec!["c", "b", "a"]);
        assert_eq!(acts[0].prob, 0.6);
        assert_eq!(acts[1].prob, 0.3);
        assert_eq!(acts[2].prob, 0.1);

        let engine = bandit.into_inner();
        assert_eq!(engine.predict_calls, 1);
        assert_eq!(engine.parsed, 4);
        assert_eq!(engine.released, 4);
        assert_eq!(engine.lines[0], "shared |User ");
    }

    #[test]
    fn test_predict_failure_releases_and_keeps_candidates() {
        let mut stub = StubEngine::default();
        stub.fail_predict = true;
        let bandit = Bandit::new(stub);
        let mut acts = catalog(&["a", "b"]);
        acts[1].prob = 0.4;

        let err = bandit.predict(&Context::new(), &mut acts).unwrap_err();
        assert!(matches!(err, BanditError::EngineCall(_)));
        assert_eq!(ids(&acts), vec!["a", "b"]);
        assert_eq!(acts[1].prob, 0.4);

        let engine = bandit.into_inner();
        assert_eq!(engine.parsed, 3);
        assert_eq!(engine.released, 3);
    }

    #[test]
    fn test_parse_failure_releases_parsed_prefix() {
        let mut stub = StubEngine::default();
        stub.fail_parse_at = Some(2);
        let bandit = Bandit::new(stub);
        let mut acts = catalog(&["a", "b", "c"]);

        let err = bandit.predict(&Context::new(), &mut acts).unwrap_err();
        assert!(matches!(err, BanditError::ExampleParse(_)));

        let engine = bandit.into_inner();
        assert_eq!(engine.predict_calls, 0);
        assert_eq!(engine.parsed, 2);
        assert_eq!(engine.released, 2);
    }

    #[test]
    fn test_bad_mapping_is_engine_error() {
        let bandit = Bandit::new(StubEngine::responding(ActionScores {
            scores: vec![1.0],
            indices: vec![5],
        }));
        let mut acts = catalog(&["a", "b"]);

        let err = bandit.predict(&Context::new(), &mut acts).unwrap_err();
        assert!(matches!(err, BanditError::EngineCall(_)));
        assert!(acts.iter().all(|a| a.prob == 0.0));
        bandit.with_engine(|e| assert_eq!(e.parsed, e.released));
    }

    #[test]
    fn test_unencodable_property_never_reaches_engine() {
        let bandit = Bandit::new(StubEngine::default());
        let mut acts = catalog(&["a", "b"]);
        acts[0].prob = 0.3;

        let ctx = Context::new().with("name", "tom smith");
        let err = bandit.predict(&ctx, &mut acts).unwrap_err();
        assert!(matches!(err, BanditError::ExampleParse(_)));
        assert_eq!(acts[0].prob, 0.3);

        let engine = bandit.into_inner();
        assert_eq!(engine.parsed, 0);
        assert_eq!(engine.predict_calls, 0);
    }

    #[test]
    fn test_empty_candidates_skip_engine() {
        let bandit = Bandit::new(StubEngine::default());
        let mut acts: Vec<Action> = Vec::new();
        bandit.predict(&Context::new(), &mut acts).unwrap();
        bandit.with_engine(|e| assert_eq!(e.parsed, 0));
    }

    #[test]
    fn test_concurrent_calls_are_serialized() {
        let bandit = Arc::new(Bandit::new(StubEngine::default()));

        std::thread::scope(|s| {
            for t in 0..8 {
                let bandit = Arc::clone(&bandit);
                s.spawn(move || {
                    let mut acts = catalog(&["a", "b", "c"]);
                    let ctx = Context::new().with("thread", t.to_string());
                    for _ in 0..50 {
                        bandit.predict(&ctx, &mut acts).unwrap();
                    }
                });
            }
        });

        bandit.with_engine(|e| {
            assert_eq!(e.predict_calls, 400);
            assert_eq!(e.parsed, 1600);
            assert_eq!(e.released, 1600);
        });
    }
}
