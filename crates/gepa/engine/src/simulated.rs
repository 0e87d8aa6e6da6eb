//! Deterministic collaborators for tests and dry runs.
//!
//! Each records the calls it receives so tests can assert on exactly which
//! collaborator work a rollout triggered.

use crate::contracts::{Evaluation, Evaluator, Merger, Mutator, Trace};
use crate::error::EngineError;
use async_trait::async_trait;
use gepa_frontier::Score;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One call received by a [`ScriptedEvaluator`].
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationCall {
    pub candidate: String,
    pub instances: Vec<String>,
    pub traced: bool,
}

/// Evaluator driven by a lookup table keyed on `(candidate, instance)`.
///
/// Lookup order: exact pair, then the candidate's flat score, then the
/// evaluator default.
pub struct ScriptedEvaluator {
    pairs: HashMap<(String, String), Score>,
    flat: HashMap<String, Score>,
    default_score: Score,
    calls: Mutex<Vec<EvaluationCall>>,
}

impl ScriptedEvaluator {
    pub fn new(default_score: Score) -> Self {
        Self {
            pairs: HashMap::new(),
            flat: HashMap::new(),
            default_score,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Score `candidate` on `instance`.
    pub fn with_score(
        mut self,
        candidate: impl Into<String>,
        instance: impl Into<String>,
        score: Score,
    ) -> Self {
        self.pairs.insert((candidate.into(), instance.into()), score);
        self
    }

    /// Score `candidate` the same on every instance without a pair entry.
    pub fn with_candidate_score(mut self, candidate: impl Into<String>, score: Score) -> Self {
        self.flat.insert(candidate.into(), score);
        self
    }

    /// Score `candidate` position-wise on `instances`.
    pub fn with_scores(mut self, candidate: &str, instances: &[String], scores: &[Score]) -> Self {
        for (instance, score) in instances.iter().zip(scores) {
            self.pairs
                .insert((candidate.to_string(), instance.clone()), *score);
        }
        self
    }

    pub fn score_of(&self, candidate: &str, instance: &str) -> Score {
        self.pairs
            .get(&(candidate.to_string(), instance.to_string()))
            .or_else(|| self.flat.get(candidate))
            .copied()
            .unwrap_or(self.default_score)
    }

    pub fn calls(&self) -> Vec<EvaluationCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Calls whose instance list equals `instances`.
    pub fn calls_on(&self, instances: &[String]) -> Vec<EvaluationCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.instances == instances)
            .collect()
    }

    fn record(&self, candidate: &str, instances: &[String], traced: bool) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(EvaluationCall {
                candidate: candidate.to_string(),
                instances: instances.to_vec(),
                traced,
            });
        }
    }
}

#[async_trait]
impl Evaluator<String> for ScriptedEvaluator {
    async fn evaluate(&self, candidate: &str, instances: &[String]) -> Result<Vec<Score>, EngineError> {
        self.record(candidate, instances, false);
        Ok(instances
            .iter()
            .map(|i| self.score_of(candidate, i))
            .collect())
    }

    async fn evaluate_with_traces(
        &self,
        candidate: &str,
        instances: &[String],
    ) -> Result<Evaluation, EngineError> {
        self.record(candidate, instances, true);
        Ok(Evaluation::from_traces(
            instances
                .iter()
                .map(|i| {
                    let score = self.score_of(candidate, i);
                    Trace::new(i.clone(), format!("{} => {}", candidate, i), score)
                        .with_feedback(format!("scored {:.2}", score))
                })
                .collect(),
        ))
    }
}

/// Mutator that replays a queue of children, then derives revisions.
pub struct ScriptedMutator {
    children: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedMutator {
    pub fn new<S: Into<String>>(children: impl IntoIterator<Item = S>) -> Self {
        Self {
            children: Mutex::new(children.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(parent, trace_count)` for every call received.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mutator for ScriptedMutator {
    async fn mutate(&self, parent: &str, traces: &[Trace]) -> Result<String, EngineError> {
        let call_index = {
            let mut calls = self
                .calls
                .lock()
                .map_err(|_| EngineError::Mutation("call log poisoned".into()))?;
            calls.push((parent.to_string(), traces.len()));
            calls.len()
        };
        let next = self
            .children
            .lock()
            .map_err(|_| EngineError::Mutation("child queue poisoned".into()))?
            .pop_front();
        Ok(next.unwrap_or_else(|| format!("{} [rev {}]", parent, call_index)))
    }
}

/// Merger that replays a queue of results, then concatenates distinct inputs.
pub struct ScriptedMerger {
    results: Mutex<VecDeque<Option<String>>>,
    refuse_when_exhausted: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedMerger {
    pub fn new(results: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().collect()),
            refuse_when_exhausted: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Merger that always reports that no merge is possible.
    pub fn refusing() -> Self {
        Self {
            refuse_when_exhausted: true,
            ..Self::new(std::iter::empty())
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Merger for ScriptedMerger {
    async fn merge(&self, first: &str, second: &str) -> Result<Option<String>, EngineError> {
        self.calls
            .lock()
            .map_err(|_| EngineError::Merge("call log poisoned".into()))?
            .push((first.to_string(), second.to_string()));

        let scripted = self
            .results
            .lock()
            .map_err(|_| EngineError::Merge("result queue poisoned".into()))?
            .pop_front();
        match scripted {
            Some(result) => Ok(result),
            None if self.refuse_when_exhausted || first == second => Ok(None),
            None => Ok(Some(format!("{}\n{}", first, second))),
        }
    }
}

/// Mutator whose backend is always down.
pub struct FailingMutator;

#[async_trait]
impl Mutator for FailingMutator {
    async fn mutate(&self, _parent: &str, _traces: &[Trace]) -> Result<String, EngineError> {
        Err(EngineError::Mutation("simulated backend failure".into()))
    }
}
