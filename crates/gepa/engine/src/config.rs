use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Run configuration for the evolutionary controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Number of rollouts to execute.
    pub rollout_budget: usize,
    /// Upper bound on successful merges over the whole run.
    pub max_merges: usize,
    /// Training examples drawn per mutation for the accept/reject check.
    pub minibatch_size: usize,
    /// Seed for the run's single random source.
    pub seed: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            rollout_budget: 5,
            max_merges: 3,
            minibatch_size: 5,
            seed: 42,
        }
    }
}

impl OptimizerConfig {
    /// Small smoke-test run.
    pub fn quick() -> Self {
        Self {
            rollout_budget: 2,
            max_merges: 1,
            minibatch_size: 3,
            ..Self::default()
        }
    }

    /// Longer search with more merge opportunities.
    pub fn thorough() -> Self {
        Self {
            rollout_budget: 50,
            max_merges: 10,
            minibatch_size: 8,
            ..Self::default()
        }
    }

    pub fn with_rollout_budget(mut self, rollouts: usize) -> Self {
        self.rollout_budget = rollouts;
        self
    }

    pub fn with_max_merges(mut self, merges: usize) -> Self {
        self.max_merges = merges;
        self
    }

    pub fn with_minibatch_size(mut self, size: usize) -> Self {
        self.minibatch_size = size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.rollout_budget == 0 {
            return Err(EngineError::InvalidConfig(
                "rollout_budget must be at least 1".into(),
            ));
        }
        if self.minibatch_size == 0 {
            return Err(EngineError::InvalidConfig(
                "minibatch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
