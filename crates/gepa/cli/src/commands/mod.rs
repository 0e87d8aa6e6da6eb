//! Subcommand implementations

pub mod apply;
pub mod optimize;

use crate::config::CliConfig;
use crate::error::CliResult;
use gepa_llm::{OpenAiChatGenerator, TextGenerator};
use std::sync::Arc;
use tracing::info;

/// Build the chat backend described by the `[llm]` table.
fn backend(config: &CliConfig) -> CliResult<Arc<dyn TextGenerator>> {
    let generator = OpenAiChatGenerator::from_env(&config.llm)?;
    info!(model = generator.model(), url = generator.url(), "LLM backend ready");
    Ok(Arc::new(generator))
}
