//! Sentence datasets stored as JSON arrays of strings.

use crate::error::{CliError, CliResult};
use std::path::Path;
use tracing::debug;

/// Load a JSON array of sentences, keeping at most `limit` of them.
pub fn load_sentences(path: &Path, limit: Option<usize>) -> CliResult<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("cannot read dataset {}: {}", path.display(), e))
    })?;
    let mut sentences: Vec<String> = serde_json::from_str(&contents)?;
    if let Some(limit) = limit {
        sentences.truncate(limit);
    }
    debug!(path = %path.display(), count = sentences.len(), "Dataset loaded");
    Ok(sentences)
}
