use crate::config::OptimizerConfig;
use crate::contracts::Collaborators;
use crate::error::EngineError;
use crate::metrics::RunMetrics;
use crate::minibatch::sample_minibatch;
use crate::report::{CandidateOrigin, OptimizationReport};
use gepa_frontier::{CandidateId, FrontierError, FrontierPool, Score};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Counters the controller carries between rollouts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Rollouts executed so far.
    pub rollout: usize,
    pub merges_done: usize,
    /// Merges earned by accepted mutations and not yet performed.
    pub merges_scheduled: usize,
    /// Whether the most recent mutation cleared the minibatch check.
    pub last_mutation_ok: bool,
}

impl ControllerState {
    fn merge_gate_open(&self, max_merges: usize) -> bool {
        self.merges_scheduled > 0 && self.last_mutation_ok && self.merges_done < max_merges
    }
}

/// Why a gated merge attempt produced no candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeSkip {
    /// Both weighted draws returned the same candidate.
    SameParent(CandidateId),
    /// The merger reported that the two candidates cannot be merged.
    /// The merge gate closes until the next accepted mutation.
    NoMerge { first: CandidateId, second: CandidateId },
}

/// Result of a single rollout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RolloutOutcome {
    /// Two frontier members were merged and the result inserted.
    Merged {
        child: CandidateId,
        first: CandidateId,
        second: CandidateId,
        aggregate: Score,
    },
    /// A merge was attempted but produced nothing; mutation was skipped.
    MergeSkipped { reason: MergeSkip },
    /// The child beat its parent on the minibatch and joined the pool.
    Accepted {
        child: CandidateId,
        parent: CandidateId,
        parent_total: Score,
        child_total: Score,
        aggregate: Score,
    },
    /// The child did not beat its parent on the minibatch and was discarded.
    Rejected {
        parent: CandidateId,
        parent_total: Score,
        child_total: Score,
    },
}

/// Budgeted evolutionary search over candidate instructions.
///
/// Created by [`EvolutionaryController::setup`], advanced one rollout at a
/// time with [`step`](Self::step), and closed with [`finish`](Self::finish).
/// The controller owns the run's only random source.
pub struct EvolutionaryController<'a, I: Sync> {
    config: OptimizerConfig,
    collaborators: Collaborators<'a, I>,
    train: &'a [I],
    validation: &'a [I],
    pool: FrontierPool<String>,
    origins: Vec<CandidateOrigin>,
    rng: StdRng,
    state: ControllerState,
    metrics: RunMetrics,
}

impl<'a, I: Clone + Sync> EvolutionaryController<'a, I> {
    /// Validate the run, score the base candidate on the validation set, and
    /// seed the frontier pool with it.
    pub async fn setup(
        config: OptimizerConfig,
        base: impl Into<String>,
        train: &'a [I],
        validation: &'a [I],
        collaborators: Collaborators<'a, I>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if validation.is_empty() {
            return Err(EngineError::EmptyValidationSet);
        }
        if train.is_empty() {
            return Err(EngineError::EmptyTrainingPool);
        }

        let base = base.into();
        let mut metrics = RunMetrics::new();
        let base_scores = evaluate_full(&collaborators, &base, validation, &mut metrics).await?;
        let pool = FrontierPool::new(base, base_scores)?;

        info!(
            rollouts = config.rollout_budget,
            max_merges = config.max_merges,
            minibatch_size = config.minibatch_size,
            train = train.len(),
            validation = validation.len(),
            base_aggregate = pool.best_aggregate(),
            "Optimization run set up"
        );

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            collaborators,
            train,
            validation,
            pool,
            origins: vec![CandidateOrigin::Base],
            state: ControllerState::default(),
            metrics,
        })
    }

    /// Execute one rollout: a merge when the merge gate is open, otherwise a
    /// mutation.
    pub async fn step(&mut self) -> Result<RolloutOutcome, EngineError> {
        if self.is_exhausted() {
            return Err(EngineError::BudgetExhausted(self.config.rollout_budget));
        }

        self.state.rollout += 1;
        self.metrics.rollouts += 1;

        let outcome = if self.state.merge_gate_open(self.config.max_merges) {
            self.attempt_merge().await?
        } else {
            self.attempt_mutation().await?
        };

        debug!(rollout = self.state.rollout, outcome = ?outcome, "Rollout finished");
        Ok(outcome)
    }

    /// True once `rollout_budget` rollouts have run.
    pub fn is_exhausted(&self) -> bool {
        self.state.rollout >= self.config.rollout_budget
    }

    /// Close the run and report the best candidate by aggregate score.
    pub fn finish(self) -> OptimizationReport {
        let report = OptimizationReport::from_pool(&self.pool, &self.origins, self.metrics);
        info!(
            best = %report.best_id,
            best_aggregate = report.best_aggregate,
            candidates = report.candidates.len(),
            merges = self.state.merges_done,
            "Optimization run finished"
        );
        report
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn pool(&self) -> &FrontierPool<String> {
        &self.pool
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// How each candidate entered the pool, by index.
    pub fn origins(&self) -> &[CandidateOrigin] {
        &self.origins
    }

    async fn attempt_merge(&mut self) -> Result<RolloutOutcome, EngineError> {
        let first = self.pool.select_weighted(&mut self.rng)?;
        let second = self.pool.select_weighted(&mut self.rng)?;

        if first == second {
            self.metrics.record_merge_failure();
            debug!(candidate = %first, "Merge skipped: both draws chose the same parent");
            return Ok(RolloutOutcome::MergeSkipped {
                reason: MergeSkip::SameParent(first),
            });
        }

        let first_text = self.candidate_text(first)?;
        let second_text = self.candidate_text(second)?;
        let merged = self
            .collaborators
            .merger
            .merge(&first_text, &second_text)
            .await?;

        let merged = match merged {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                // Close the gate so the next rollout mutates.
                self.state.last_mutation_ok = false;
                self.metrics.record_merge_failure();
                debug!(first = %first, second = %second, "Merge skipped: merger declined");
                return Ok(RolloutOutcome::MergeSkipped {
                    reason: MergeSkip::NoMerge { first, second },
                });
            }
        };

        let scores =
            evaluate_full(&self.collaborators, &merged, self.validation, &mut self.metrics).await?;
        let child = self.pool.insert(merged, scores)?;
        self.origins.push(CandidateOrigin::Merge { first, second });

        self.state.merges_scheduled -= 1;
        self.state.merges_done += 1;
        self.metrics.record_merge();

        let aggregate = self.pool.aggregate_score(child).unwrap_or_default();
        info!(
            rollout = self.state.rollout,
            child = %child,
            first = %first,
            second = %second,
            aggregate,
            merges_done = self.state.merges_done,
            "Merged frontier candidates"
        );

        Ok(RolloutOutcome::Merged {
            child,
            first,
            second,
            aggregate,
        })
    }

    async fn attempt_mutation(&mut self) -> Result<RolloutOutcome, EngineError> {
        self.state.last_mutation_ok = false;

        let parent = self.pool.select_weighted(&mut self.rng)?;
        let parent_text = self.candidate_text(parent)?;
        let minibatch = sample_minibatch(self.train, self.config.minibatch_size, &mut self.rng)?;

        debug!(
            rollout = self.state.rollout,
            parent = %parent,
            minibatch = ?minibatch.indices,
            "Mutating parent"
        );

        let parent_eval = self
            .collaborators
            .evaluator
            .evaluate_with_traces(&parent_text, &minibatch.instances)
            .await?;
        self.metrics.minibatch_evaluations += 1;
        check_len(minibatch.len(), parent_eval.scores.len())?;

        let child_text = self
            .collaborators
            .mutator
            .mutate(&parent_text, &parent_eval.traces)
            .await?;

        let child_scores = self
            .collaborators
            .evaluator
            .evaluate(&child_text, &minibatch.instances)
            .await?;
        self.metrics.minibatch_evaluations += 1;
        check_len(minibatch.len(), child_scores.len())?;

        let parent_total = parent_eval.total();
        let child_total: Score = child_scores.iter().sum();

        debug!(
            rollout = self.state.rollout,
            parent_total,
            child_total,
            "Minibatch comparison"
        );

        if child_total <= parent_total {
            self.metrics.record_rejected();
            return Ok(RolloutOutcome::Rejected {
                parent,
                parent_total,
                child_total,
            });
        }

        let scores =
            evaluate_full(&self.collaborators, &child_text, self.validation, &mut self.metrics)
                .await?;
        let child = self.pool.insert(child_text, scores)?;
        self.origins.push(CandidateOrigin::Mutation { parent });

        self.state.last_mutation_ok = true;
        if self.state.merges_done < self.config.max_merges {
            self.state.merges_scheduled += 1;
        }
        self.metrics.record_accepted();

        let aggregate = self.pool.aggregate_score(child).unwrap_or_default();
        info!(
            rollout = self.state.rollout,
            child = %child,
            parent = %parent,
            parent_total,
            child_total,
            aggregate,
            merges_scheduled = self.state.merges_scheduled,
            "Accepted mutation"
        );

        Ok(RolloutOutcome::Accepted {
            child,
            parent,
            parent_total,
            child_total,
            aggregate,
        })
    }

    fn candidate_text(&self, id: CandidateId) -> Result<String, EngineError> {
        self.pool
            .candidate(id)
            .cloned()
            .ok_or_else(|| FrontierError::UnknownCandidate(id.index()).into())
    }
}

async fn evaluate_full<I: Sync>(
    collaborators: &Collaborators<'_, I>,
    candidate: &str,
    validation: &[I],
    metrics: &mut RunMetrics,
) -> Result<Vec<Score>, EngineError> {
    let scores = collaborators.evaluator.evaluate(candidate, validation).await?;
    metrics.validation_evaluations += 1;
    check_len(validation.len(), scores.len())?;
    Ok(scores)
}

fn check_len(expected: usize, actual: usize) -> Result<(), EngineError> {
    if expected != actual {
        return Err(EngineError::ScoreLengthMismatch { expected, actual });
    }
    Ok(())
}

/// Run a complete optimization and return the full report.
pub async fn optimize_with_report<I: Clone + Sync>(
    base: impl Into<String>,
    train: &[I],
    validation: &[I],
    collaborators: Collaborators<'_, I>,
    config: OptimizerConfig,
) -> Result<OptimizationReport, EngineError> {
    let mut controller =
        EvolutionaryController::setup(config, base, train, validation, collaborators).await?;
    while !controller.is_exhausted() {
        controller.step().await?;
    }
    Ok(controller.finish())
}

/// Run a complete optimization and return the best candidate text.
pub async fn optimize<I: Clone + Sync>(
    base: impl Into<String>,
    train: &[I],
    validation: &[I],
    collaborators: Collaborators<'_, I>,
    config: OptimizerConfig,
) -> Result<String, EngineError> {
    Ok(
        optimize_with_report(base, train, validation, collaborators, config)
            .await?
            .best_candidate,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::{FailingMutator, ScriptedEvaluator, ScriptedMerger, ScriptedMutator};

    fn sentences(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{} {}", prefix, i)).collect()
    }

    #[tokio::test]
    async fn setup_seeds_pool_with_base() {
        let train = sentences("train", 10);
        let val = sentences("val", 4);
        let eval = ScriptedEvaluator::new(0.4);
        let mutator = ScriptedMutator::new(Vec::<String>::new());
        let merger = ScriptedMerger::new([]);
        let controller = EvolutionaryController::setup(
            OptimizerConfig::default(),
            "base",
            &train,
            &val,
            Collaborators::new(&eval, &mutator, &merger),
        )
        .await
        .unwrap();

        assert_eq!(controller.pool().len(), 1);
        assert_eq!(controller.pool().instance_count(), 4);
        assert_eq!(controller.state(), &ControllerState::default());
        assert_eq!(eval.calls_on(&val).len(), 1);
    }

    #[tokio::test]
    async fn setup_rejects_empty_sets() {
        let eval = ScriptedEvaluator::new(0.4);
        let mutator = ScriptedMutator::new(Vec::<String>::new());
        let merger = ScriptedMerger::new([]);
        let collab: Collaborators<'_, String> = Collaborators::new(&eval, &mutator, &merger);
        let some = sentences("s", 3);
        let none: Vec<String> = Vec::new();

        let r = EvolutionaryController::setup(OptimizerConfig::default(), "b", &some, &none, collab).await;
        assert!(matches!(r, Err(EngineError::EmptyValidationSet)));

        let r = EvolutionaryController::setup(OptimizerConfig::default(), "b", &none, &some, collab).await;
        assert!(matches!(r, Err(EngineError::EmptyTrainingPool)));
    }

    #[tokio::test]
    async fn setup_rejects_zero_budget() {
        let eval = ScriptedEvaluator::new(0.4);
        let mutator = ScriptedMutator::new(Vec::<String>::new());
        let merger = ScriptedMerger::new([]);
        let data = sentences("s", 3);
        let r = EvolutionaryController::setup(
            OptimizerConfig::default().with_rollout_budget(0),
            "b",
            &data,
            &data,
            Collaborators::new(&eval, &mutator, &merger),
        )
        .await;
        assert!(matches!(r, Err(EngineError::InvalidConfig(_))));
        assert!(eval.calls().is_empty());
    }

    #[tokio::test]
    async fn better_child_is_accepted_and_schedules_merge() {
        let train = sentences("train", 8);
        let val = sentences("val", 3);
        let eval = ScriptedEvaluator::new(0.2).with_candidate_score("child", 0.6);
        let mutator = ScriptedMutator::new(["child"]);
        let merger = ScriptedMerger::new([]);
        let mut controller = EvolutionaryController::setup(
            OptimizerConfig::default(),
            "base",
            &train,
            &val,
            Collaborators::new(&eval, &mutator, &merger),
        )
        .await
        .unwrap();

        let outcome = controller.step().await.unwrap();
        assert!(matches!(
            outcome,
            RolloutOutcome::Accepted { child: CandidateId(1), parent: CandidateId(0), .. }
        ));
        assert_eq!(controller.pool().len(), 2);
        assert!(controller.state().last_mutation_ok);
        assert_eq!(controller.state().merges_scheduled, 1);
        assert_eq!(controller.metrics().validation_evaluations, 2);
        assert_eq!(mutator.calls()[0].1, 5);
    }

    #[tokio::test]
    async fn declined_merge_closes_gate() {
        let train = sentences("train", 8);
        let val = sentences("val", 2);
        let eval = ScriptedEvaluator::new(0.2)
            .with_scores("base", &val, &[0.2, 0.8])
            .with_candidate_score("child", 0.6)
            .with_scores("child", &val, &[0.9, 0.5]);
        let mutator = ScriptedMutator::new(["child"]);
        let merger = ScriptedMerger::refusing();
        let mut controller = EvolutionaryController::setup(
            OptimizerConfig::default().with_rollout_budget(40),
            "base",
            &train,
            &val,
            Collaborators::new(&eval, &mutator, &merger),
        )
        .await
        .unwrap();

        assert!(matches!(controller.step().await.unwrap(), RolloutOutcome::Accepted { .. }));
        loop {
            match controller.step().await.unwrap() {
                RolloutOutcome::MergeSkipped { reason: MergeSkip::SameParent(_) } => {
                    // Same-parent draws leave the gate open.
                    assert!(controller.state().last_mutation_ok);
                }
                RolloutOutcome::MergeSkipped { reason: MergeSkip::NoMerge { .. } } => break,
                other => panic!("unexpected outcome {:?}", other),
            }
        }

        assert!(!controller.state().last_mutation_ok);
        assert_eq!(controller.state().merges_scheduled, 1);
        assert_eq!(merger.calls().len(), 1);

        let calls_before = mutator.calls().len();
        let next = controller.step().await.unwrap();
        assert!(matches!(next, RolloutOutcome::Rejected { .. }));
        assert_eq!(mutator.calls().len(), calls_before + 1);
    }

    #[tokio::test]
    async fn rejected_child_leaves_no_trace() {
        let train = sentences("train", 8);
        let val = sentences("val", 3);
        let eval = ScriptedEvaluator::new(0.5).with_candidate_score("worse", 0.1);
        let mutator = ScriptedMutator::new(["worse"]);
        let merger = ScriptedMerger::new([]);
        let mut controller = EvolutionaryController::setup(
            OptimizerConfig::default(),
            "base",
            &train,
            &val,
            Collaborators::new(&eval, &mutator, &merger),
        )
        .await
        .unwrap();

        let outcome = controller.step().await.unwrap();
        assert!(matches!(outcome, RolloutOutcome::Rejected { .. }));
        assert_eq!(controller.pool().len(), 1);
        assert!(!controller.state().last_mutation_ok);
        assert_eq!(controller.state().merges_scheduled, 0);
        assert_eq!(eval.calls_on(&val).len(), 1);
    }

    #[tokio::test]
    async fn equal_minibatch_total_is_rejected() {
        let train = sentences("train", 4);
        let val = sentences("val", 2);
        let eval = ScriptedEvaluator::new(0.5);
        let mutator = ScriptedMutator::new(["same score"]);
        let merger = ScriptedMerger::new([]);
        let mut controller = EvolutionaryController::setup(
            OptimizerConfig::default(),
            "base",
            &train,
            &val,
            Collaborators::new(&eval, &mutator, &merger),
        )
        .await
        .unwrap();

        assert!(matches!(controller.step().await.unwrap(), RolloutOutcome::Rejected { .. }));
    }

    #[tokio::test]
    async fn step_past_budget_errors() {
        let data = sentences("s", 3);
        let eval = ScriptedEvaluator::new(0.5);
        let mutator = ScriptedMutator::new(Vec::<String>::new());
        let merger = ScriptedMerger::new([]);
        let mut controller = EvolutionaryController::setup(
            OptimizerConfig::default().with_rollout_budget(1),
            "base",
            &data,
            &data,
            Collaborators::new(&eval, &mutator, &merger),
        )
        .await
        .unwrap();

        controller.step().await.unwrap();
        assert!(controller.is_exhausted());
        assert!(matches!(
            controller.step().await,
            Err(EngineError::BudgetExhausted(1))
        ));
    }

    #[tokio::test]
    async fn mutator_failure_aborts_run() {
        let data = sentences("s", 3);
        let eval = ScriptedEvaluator::new(0.5);
        let merger = ScriptedMerger::new([]);
        let result = optimize(
            "base",
            &data,
            &data,
            Collaborators::new(&eval, &FailingMutator, &merger),
            OptimizerConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(EngineError::Mutation(_))));
    }

    #[tokio::test]
    async fn no_improvement_returns_base() {
        let data = sentences("s", 6);
        let eval = ScriptedEvaluator::new(0.9).with_candidate_score("base", 0.9);
        let mutator = ScriptedMutator::new(Vec::<String>::new());
        let merger = ScriptedMerger::new([]);
        let best = optimize(
            "base",
            &data,
            &data,
            Collaborators::new(&eval, &mutator, &merger),
            OptimizerConfig::default().with_rollout_budget(4),
        )
        .await
        .unwrap();
        assert_eq!(best, "base");
        assert_eq!(mutator.calls().len(), 4);
    }
}
