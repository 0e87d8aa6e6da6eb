#![deny(unsafe_code)]
//! # gepa-frontier
//!
//! The Frontier Pool: an append-only population of candidates together with
//! per-instance Pareto bookkeeping.
//!
//! For every instance of the validation set the pool remembers the highest
//! score observed so far and the set of candidates that achieved it (ties
//! included). Parent selection is weighted by how many of those sets a
//! candidate belongs to, so specialists that win a handful of instances stay
//! in play next to candidates that are merely good on average.

pub mod error;
pub mod pool;
pub mod types;

pub use error::FrontierError;
pub use pool::FrontierPool;
pub use types::{aggregate, CandidateId, Score};
