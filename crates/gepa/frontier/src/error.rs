/// Errors from the Frontier Pool.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrontierError {
    #[error("score vector length mismatch: expected {expected} instances, got {actual}")]
    ScoreLengthMismatch { expected: usize, actual: usize },
    #[error("non-finite score {value} for instance {instance}")]
    NonFiniteScore { instance: usize, value: f64 },
    #[error("validation set must contain at least one instance")]
    NoInstances,
    #[error("no candidate carries frontier weight")]
    NoSelectableCandidate,
    #[error("unknown candidate: {0}")]
    UnknownCandidate(usize),
}
