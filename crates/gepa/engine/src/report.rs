use crate::metrics::RunMetrics;
use gepa_frontier::{CandidateId, FrontierPool, Score};
use serde::{Deserialize, Serialize};

/// How a candidate entered the population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateOrigin {
    Base,
    Mutation { parent: CandidateId },
    Merge { first: CandidateId, second: CandidateId },
}

impl std::fmt::Display for CandidateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Mutation { parent } => write!(f, "mutation of {}", parent),
            Self::Merge { first, second } => write!(f, "merge of {} and {}", first, second),
        }
    }
}

/// One population member as seen at the end of a run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub origin: CandidateOrigin,
    pub aggregate: Score,
    /// Number of instance fronts the candidate sits on.
    pub frontier_weight: usize,
    pub text: String,
}

/// Outcome of a complete optimization run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub best_id: CandidateId,
    pub best_candidate: String,
    pub best_aggregate: Score,
    /// Every candidate, in insertion order.
    pub candidates: Vec<CandidateRecord>,
    /// Highest score recorded on each validation instance.
    pub instance_best: Vec<Score>,
    pub metrics: RunMetrics,
}

impl OptimizationReport {
    pub(crate) fn from_pool(
        pool: &FrontierPool<String>,
        origins: &[CandidateOrigin],
        metrics: RunMetrics,
    ) -> Self {
        let weights = pool.frontier_weights();
        let candidates = pool
            .iter()
            .map(|(id, text)| CandidateRecord {
                id,
                origin: origins.get(id.index()).copied().unwrap_or(CandidateOrigin::Base),
                aggregate: pool.aggregates()[id.index()],
                frontier_weight: weights[id.index()],
                text: text.clone(),
            })
            .collect();

        Self {
            best_id: pool.best_id(),
            best_candidate: pool.best_candidate().clone(),
            best_aggregate: pool.best_aggregate(),
            candidates,
            instance_best: (0..pool.instance_count())
                .filter_map(|i| pool.instance_best(i))
                .collect(),
            metrics,
        }
    }

    /// Aggregate improvement of the best candidate over the base candidate.
    pub fn improvement(&self) -> Score {
        self.candidates
            .first()
            .map(|base| self.best_aggregate - base.aggregate)
            .unwrap_or(0.0)
    }
}
