//! Narrow contracts for the collaborators the controller delegates to.
//!
//! The controller never looks inside a candidate or a trace: candidates are
//! opaque text, traces are handed to the mutator exactly as the evaluator
//! produced them.

use crate::error::EngineError;
use async_trait::async_trait;
use gepa_frontier::Score;
use serde::{Deserialize, Serialize};

/// A labelled list of observations attached to a trace
/// (for example the entities a judge found missing).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub label: String,
    pub items: Vec<String>,
}

/// What happened when a candidate ran on one instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Instance input as shown to the candidate.
    pub input: String,
    /// Output the candidate produced.
    pub output: String,
    pub score: Score,
    /// Free-text explanation of the score.
    pub feedback: String,
    #[serde(default)]
    pub findings: Vec<Finding>,
}

impl Trace {
    pub fn new(input: impl Into<String>, output: impl Into<String>, score: Score) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            score,
            feedback: String::new(),
            findings: Vec::new(),
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = feedback.into();
        self
    }

    pub fn with_finding(mut self, label: impl Into<String>, items: Vec<String>) -> Self {
        self.findings.push(Finding {
            label: label.into(),
            items,
        });
        self
    }
}

/// Position-aligned scores, plus traces when the evaluator ran in traced mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub scores: Vec<Score>,
    pub traces: Vec<Trace>,
}

impl Evaluation {
    /// Build an evaluation whose scores are read off the traces.
    pub fn from_traces(traces: Vec<Trace>) -> Self {
        Self {
            scores: traces.iter().map(|t| t.score).collect(),
            traces,
        }
    }

    /// Sum of scores; the minibatch acceptance statistic.
    pub fn total(&self) -> Score {
        self.scores.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Scores a candidate on an ordered list of instances.
#[async_trait]
pub trait Evaluator<I: Sync>: Send + Sync {
    /// Score vector aligned with `instances`.
    async fn evaluate(&self, candidate: &str, instances: &[I]) -> Result<Vec<Score>, EngineError> {
        Ok(self.evaluate_with_traces(candidate, instances).await?.scores)
    }

    /// Scores together with one trace per instance.
    async fn evaluate_with_traces(
        &self,
        candidate: &str,
        instances: &[I],
    ) -> Result<Evaluation, EngineError>;
}

/// Produces a new candidate from a parent and its traces.
#[async_trait]
pub trait Mutator: Send + Sync {
    async fn mutate(&self, parent: &str, traces: &[Trace]) -> Result<String, EngineError>;
}

/// Combines two candidates. `Ok(None)` means no meaningful merge exists.
#[async_trait]
pub trait Merger: Send + Sync {
    async fn merge(&self, first: &str, second: &str) -> Result<Option<String>, EngineError>;
}

/// The three collaborators a run needs, borrowed for the run's duration.
pub struct Collaborators<'a, I: Sync> {
    pub evaluator: &'a dyn Evaluator<I>,
    pub mutator: &'a dyn Mutator,
    pub merger: &'a dyn Merger,
}

impl<'a, I: Sync> Collaborators<'a, I> {
    pub fn new(
        evaluator: &'a dyn Evaluator<I>,
        mutator: &'a dyn Mutator,
        merger: &'a dyn Merger,
    ) -> Self {
        Self {
            evaluator,
            mutator,
            merger,
        }
    }
}

impl<I: Sync> Clone for Collaborators<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: Sync> Copy for Collaborators<'_, I> {}
