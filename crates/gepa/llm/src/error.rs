use gepa_engine::EngineError;
use thiserror::Error;

/// Errors raised while talking to a text-generation backend.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("missing api key: environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("backend response did not include any choices")]
    NoChoices,

    #[error("scripted generator has no reply for prompt: {0}")]
    NoScriptedReply(String),
}

impl LlmError {
    pub(crate) fn during_evaluation(self) -> EngineError {
        EngineError::Evaluation(self.to_string())
    }

    pub(crate) fn during_mutation(self) -> EngineError {
        EngineError::Mutation(self.to_string())
    }

    pub(crate) fn during_merge(self) -> EngineError {
        EngineError::Merge(self.to_string())
    }
}
