#![deny(unsafe_code)]
//! # gepa-engine
//!
//! The evolutionary controller that drives candidate instructions through a
//! fixed rollout budget.
//!
//! Each rollout either merges two frontier members or reflects on a parent's
//! minibatch traces to produce a mutated child. Children only reach the
//! (expensive) validation set after beating their parent on the (cheap)
//! minibatch; everything that does reach it is folded into the
//! [`FrontierPool`](gepa_frontier::FrontierPool).
//!
//! Generation, execution, and judging are delegated to the [`Evaluator`],
//! [`Mutator`], and [`Merger`] contracts.

pub mod config;
pub mod contracts;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod minibatch;
pub mod report;
pub mod simulated;

pub use config::OptimizerConfig;
pub use contracts::{Collaborators, Evaluation, Evaluator, Finding, Merger, Mutator, Trace};
pub use controller::{
    optimize, optimize_with_report, ControllerState, EvolutionaryController, MergeSkip, RolloutOutcome,
};
pub use error::EngineError;
pub use gepa_frontier::{CandidateId, FrontierPool, Score};
pub use metrics::RunMetrics;
pub use report::{CandidateOrigin, CandidateRecord, OptimizationReport};
pub use simulated::{FailingMutator, ScriptedEvaluator, ScriptedMerger, ScriptedMutator};
