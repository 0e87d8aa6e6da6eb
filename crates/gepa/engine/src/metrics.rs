use serde::{Deserialize, Serialize};

/// Counters collected over one optimization run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Rollouts executed.
    pub rollouts: u64,
    /// Mutations that reached the minibatch check.
    pub mutations_attempted: u64,
    /// Mutations that beat their parent on the minibatch.
    pub mutations_accepted: u64,
    /// Mutations discarded after the minibatch check.
    pub mutations_rejected: u64,
    /// Merges that produced and inserted a candidate.
    pub merges_done: u64,
    /// Gated merge attempts that produced nothing.
    pub merge_attempts_failed: u64,
    /// Evaluator calls on the full validation set.
    pub validation_evaluations: u64,
    /// Evaluator calls on training minibatches.
    pub minibatch_evaluations: u64,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&mut self) {
        self.mutations_attempted += 1;
        self.mutations_accepted += 1;
    }

    pub fn record_rejected(&mut self) {
        self.mutations_attempted += 1;
        self.mutations_rejected += 1;
    }

    pub fn record_merge(&mut self) {
        self.merges_done += 1;
    }

    pub fn record_merge_failure(&mut self) {
        self.merge_attempts_failed += 1;
    }

    /// Fraction of attempted mutations that were accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.mutations_attempted == 0 {
            return 0.0;
        }
        self.mutations_accepted as f64 / self.mutations_attempted as f64
    }
}
