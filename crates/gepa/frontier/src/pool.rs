use crate::error::FrontierError;
use crate::types::{aggregate, CandidateId, Score};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// Append-only candidate population with per-instance Pareto membership.
///
/// Invariants maintained by every successful [`FrontierPool::insert`]:
/// - every score vector has exactly `instance_count()` entries;
/// - `instance_best(i)` never decreases;
/// - every member of `frontier(i)` scored exactly `instance_best(i)` on `i`.
///
/// Ties are exact float equality.
#[derive(Clone, Debug)]
pub struct FrontierPool<C> {
    candidates: Vec<C>,
    scores: Vec<Vec<Score>>,
    aggregates: Vec<Score>,
    instance_best: Vec<Score>,
    frontier: Vec<BTreeSet<CandidateId>>,
    best: CandidateId,
}

impl<C> FrontierPool<C> {
    /// Seed a pool with the base candidate at index 0.
    ///
    /// The length of `base_scores` fixes the instance count for the lifetime
    /// of the pool.
    pub fn new(base: C, base_scores: Vec<Score>) -> Result<Self, FrontierError> {
        if base_scores.is_empty() {
            return Err(FrontierError::NoInstances);
        }
        check_finite(&base_scores)?;

        let instance_count = base_scores.len();
        let base_aggregate = aggregate(&base_scores);

        debug!(
            instances = instance_count,
            aggregate = base_aggregate,
            "Frontier pool seeded with base candidate"
        );

        Ok(Self {
            candidates: vec![base],
            instance_best: base_scores.clone(),
            scores: vec![base_scores],
            aggregates: vec![base_aggregate],
            frontier: (0..instance_count)
                .map(|_| BTreeSet::from([CandidateId::BASE]))
                .collect(),
            best: CandidateId::BASE,
        })
    }

    /// Append a candidate and fold its scores into the per-instance fronts.
    ///
    /// A strictly higher score evicts the previous members of that
    /// instance's front; an equal score joins it; a lower score changes
    /// nothing. Nothing is ever removed from the population.
    pub fn insert(&mut self, candidate: C, scores: Vec<Score>) -> Result<CandidateId, FrontierError> {
        if scores.len() != self.instance_count() {
            return Err(FrontierError::ScoreLengthMismatch {
                expected: self.instance_count(),
                actual: scores.len(),
            });
        }
        check_finite(&scores)?;

        let id = CandidateId(self.candidates.len());
        let candidate_aggregate = aggregate(&scores);

        let mut improved = 0usize;
        let mut tied = 0usize;
        for (instance, &score) in scores.iter().enumerate() {
            let current = self.instance_best[instance];
            if score > current {
                self.instance_best[instance] = score;
                self.frontier[instance] = BTreeSet::from([id]);
                improved += 1;
            } else if score == current {
                self.frontier[instance].insert(id);
                tied += 1;
            }
        }

        if candidate_aggregate > self.aggregates[self.best.index()] {
            self.best = id;
        }

        self.candidates.push(candidate);
        self.scores.push(scores);
        self.aggregates.push(candidate_aggregate);

        debug!(
            candidate = %id,
            aggregate = candidate_aggregate,
            improved,
            tied,
            "Candidate inserted into frontier pool"
        );

        Ok(id)
    }

    /// Draw a candidate with probability proportional to the number of
    /// instance fronts it belongs to.
    ///
    /// Candidates that sit on no front have zero weight and are never drawn.
    pub fn select_weighted<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<CandidateId, FrontierError> {
        let weights = self.frontier_weights();
        let dist =
            WeightedIndex::new(&weights).map_err(|_| FrontierError::NoSelectableCandidate)?;
        Ok(CandidateId(dist.sample(rng)))
    }

    /// Number of instance fronts each candidate belongs to, by index.
    pub fn frontier_weights(&self) -> Vec<usize> {
        let mut weights = vec![0usize; self.candidates.len()];
        for members in &self.frontier {
            for id in members {
                weights[id.index()] += 1;
            }
        }
        weights
    }

    /// Index of the candidate with the highest aggregate score.
    ///
    /// Ties resolve to the earliest inserted candidate.
    pub fn best_id(&self) -> CandidateId {
        self.best
    }

    /// The candidate with the highest aggregate score.
    pub fn best_candidate(&self) -> &C {
        &self.candidates[self.best.index()]
    }

    /// Aggregate score of the current best candidate.
    pub fn best_aggregate(&self) -> Score {
        self.aggregates[self.best.index()]
    }

    pub fn candidate(&self, id: CandidateId) -> Option<&C> {
        self.candidates.get(id.index())
    }

    pub fn scores(&self, id: CandidateId) -> Option<&[Score]> {
        self.scores.get(id.index()).map(Vec::as_slice)
    }

    pub fn aggregate_score(&self, id: CandidateId) -> Option<Score> {
        self.aggregates.get(id.index()).copied()
    }

    /// Aggregate scores of every candidate, by index.
    pub fn aggregates(&self) -> &[Score] {
        &self.aggregates
    }

    /// Highest score recorded so far on `instance`.
    pub fn instance_best(&self, instance: usize) -> Option<Score> {
        self.instance_best.get(instance).copied()
    }

    /// Candidates currently achieving `instance_best(instance)`.
    pub fn frontier(&self, instance: usize) -> Option<&BTreeSet<CandidateId>> {
        self.frontier.get(instance)
    }

    pub fn instance_count(&self) -> usize {
        self.instance_best.len()
    }

    /// Population size. Always at least one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Iterate over `(id, candidate)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CandidateId, &C)> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| (CandidateId(index), candidate))
    }

    /// Consume the pool, returning the best candidate.
    pub fn into_best(mut self) -> C {
        self.candidates.swap_remove(self.best.index())
    }
}

fn check_finite(scores: &[Score]) -> Result<(), FrontierError> {
    match scores.iter().position(|s| !s.is_finite()) {
        Some(instance) => Err(FrontierError::NonFiniteScore {
            instance,
            value: scores[instance],
        }),
        None => Ok(()),
    }
}
