use gepa_frontier::FrontierError;

/// Errors from the evolutionary controller and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid optimizer config: {0}")]
    InvalidConfig(String),
    #[error("training pool is empty; cannot draw a minibatch")]
    EmptyTrainingPool,
    #[error("rollout budget of {0} already spent")]
    BudgetExhausted(usize),
    #[error("validation set is empty")]
    EmptyValidationSet,
    #[error("evaluator returned {actual} scores for {expected} instances")]
    ScoreLengthMismatch { expected: usize, actual: usize },
    #[error("frontier error: {0}")]
    Frontier(#[from] FrontierError),
    #[error("evaluation failed: {0}")]
    Evaluation(String),
    #[error("mutation failed: {0}")]
    Mutation(String),
    #[error("merge failed: {0}")]
    Merge(String),
}
