use crate::error::LlmError;
use crate::generator::TextGenerator;
use crate::parse::extract_json_object;
use crate::prompts::task_prompt;
use std::sync::Arc;

/// Runs a candidate instruction on a single input sentence.
#[derive(Clone)]
pub struct TaskRunner {
    generator: Arc<dyn TextGenerator>,
}

impl TaskRunner {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// The sanitised sentence: the reply's `"text"` field, or the raw reply
    /// when no JSON object can be read from it.
    pub async fn run(&self, instruction: &str, input: &str) -> Result<String, LlmError> {
        let reply = self.generator.generate(&task_prompt(instruction, input)).await?;
        Ok(match extract_json_object(&reply) {
            Some(object) => object
                .get("text")
                .and_then(|t| t.as_str())
                .unwrap_or_default()
                .to_string(),
            None => reply,
        })
    }
}
