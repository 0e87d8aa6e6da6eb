use crate::error::LlmError;
use crate::generator::TextGenerator;
use crate::parse::extract_instruction;
use crate::prompts::mutation_prompt;
use async_trait::async_trait;
use gepa_engine::{EngineError, Mutator, Trace};
use std::sync::Arc;
use tracing::debug;

/// Rewrites an instruction by reflecting on how it fared on a minibatch.
pub struct ReflectiveMutator {
    generator: Arc<dyn TextGenerator>,
}

impl ReflectiveMutator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

/// Render traces as numbered examples for the reflection prompt.
pub fn format_examples(traces: &[Trace]) -> String {
    traces
        .iter()
        .enumerate()
        .map(|(i, trace)| {
            let mut example = format!(
                "# Example {}\n\n## Input\n{}\n\n## Assistant's Output\n{}\n\n## Score\n{}\n\n## Feedback\n{}\n",
                i + 1,
                trace.input,
                trace.output,
                trace.score,
                trace.feedback
            );
            for finding in &trace.findings {
                let items = if finding.items.is_empty() {
                    "None".to_string()
                } else {
                    finding.items.join(", ")
                };
                example.push_str(&format!("\n## {}\n{}\n", finding.label, items));
            }
            example
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Mutator for ReflectiveMutator {
    async fn mutate(&self, parent: &str, traces: &[Trace]) -> Result<String, EngineError> {
        let prompt = mutation_prompt(parent, &format_examples(traces));
        let reply = self
            .generator
            .generate(&prompt)
            .await
            .map_err(LlmError::during_mutation)?;
        let child = extract_instruction(&reply);
        debug!(examples = traces.len(), chars = child.len(), "Reflective mutation produced");
        Ok(child)
    }
}
