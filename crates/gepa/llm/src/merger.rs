use crate::error::LlmError;
use crate::generator::TextGenerator;
use crate::parse::extract_instruction;
use crate::prompts::merge_prompt;
use async_trait::async_trait;
use gepa_engine::{EngineError, Merger};
use std::sync::Arc;
use tracing::debug;

/// Asks a model to synthesise two frontier instructions into one.
pub struct PromptMerger {
    generator: Arc<dyn TextGenerator>,
}

impl PromptMerger {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Merger for PromptMerger {
    async fn merge(&self, first: &str, second: &str) -> Result<Option<String>, EngineError> {
        if first == second {
            return Ok(None);
        }

        let reply = self
            .generator
            .generate(&merge_prompt(first, second))
            .await
            .map_err(LlmError::during_merge)?;
        let merged = extract_instruction(&reply);
        if merged.is_empty() {
            debug!("Merge reply contained no instruction");
            return Ok(None);
        }
        Ok(Some(merged))
    }
}
