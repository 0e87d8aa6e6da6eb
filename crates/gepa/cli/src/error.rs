//! CLI error types

use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Language-model backend error
    #[error("LLM error: {0}")]
    Llm(#[from] gepa_llm::LlmError),

    /// Optimization run error
    #[error("Optimization error: {0}")]
    Engine(#[from] gepa_engine::EngineError),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
