use serde::{Deserialize, Serialize};

/// Quality of one candidate's output on one instance. Higher is better.
pub type Score = f64;

/// Position of a candidate in the append-only population.
///
/// Indices are handed out in insertion order and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub usize);

impl CandidateId {
    /// The base candidate every pool is seeded with.
    pub const BASE: CandidateId = CandidateId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arithmetic mean of a score vector. An empty vector aggregates to 0.
pub fn aggregate(scores: &[Score]) -> Score {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<Score>() / scores.len() as Score
}
