//! LLM-as-judge evaluator.

use crate::error::LlmError;
use crate::generator::TextGenerator;
use crate::parse::extract_json_object;
use crate::prompts::{judge_prompt, UNPARSEABLE_VERDICT};
use crate::task::TaskRunner;
use async_trait::async_trait;
use gepa_engine::{EngineError, Evaluation, Evaluator, Score, Trace};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const REMOVED_LABEL: &str = "Removed PII";
pub const MISSED_LABEL: &str = "Missed PII";

/// What the judge said about one sanitised sentence.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Verdict {
    pub score: Score,
    pub removed_pii: Vec<String>,
    pub missed_pii: Vec<String>,
    pub feedback: String,
}

impl Verdict {
    /// Read a verdict from a judge reply, clamping the score to `[0, 1]`.
    pub fn parse(reply: &str) -> Option<Self> {
        let object = extract_json_object(reply)?;
        let mut verdict: Verdict = serde_json::from_value(object).ok()?;
        verdict.score = if verdict.score.is_nan() {
            0.0
        } else {
            verdict.score.clamp(0.0, 1.0)
        };
        Some(verdict)
    }

    fn unparseable() -> Self {
        Self {
            feedback: UNPARSEABLE_VERDICT.to_string(),
            ..Self::default()
        }
    }
}

/// Scores an instruction by running it on each sentence and asking a judge
/// model how well the output was sanitised.
pub struct JudgeEvaluator {
    runner: TaskRunner,
    judge: Arc<dyn TextGenerator>,
}

impl JudgeEvaluator {
    pub fn new(task: Arc<dyn TextGenerator>, judge: Arc<dyn TextGenerator>) -> Self {
        Self {
            runner: TaskRunner::new(task),
            judge,
        }
    }

    /// Task and judge served by the same backend.
    pub fn shared(generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(generator.clone(), generator)
    }

    async fn judge(&self, original: &str, sanitized: &str) -> Result<Verdict, LlmError> {
        let reply = self.judge.generate(&judge_prompt(original, sanitized)).await?;
        Ok(Verdict::parse(&reply).unwrap_or_else(|| {
            warn!(reply = %reply, "Judge reply could not be parsed; scoring 0");
            Verdict::unparseable()
        }))
    }

    async fn trace_one(&self, instruction: &str, sentence: &str) -> Result<Trace, LlmError> {
        let sanitized = self.runner.run(instruction, sentence).await?;
        let verdict = self.judge(sentence, &sanitized).await?;
        debug!(score = verdict.score, missed = verdict.missed_pii.len(), "Sentence judged");

        Ok(Trace::new(sentence, sanitized, verdict.score)
            .with_feedback(verdict.feedback)
            .with_finding(REMOVED_LABEL, verdict.removed_pii)
            .with_finding(MISSED_LABEL, verdict.missed_pii))
    }
}

#[async_trait]
impl Evaluator<String> for JudgeEvaluator {
    async fn evaluate_with_traces(
        &self,
        candidate: &str,
        instances: &[String],
    ) -> Result<Evaluation, EngineError> {
        let mut traces = Vec::with_capacity(instances.len());
        for sentence in instances {
            traces.push(
                self.trace_one(candidate, sentence)
                    .await
                    .map_err(LlmError::during_evaluation)?,
            );
        }
        Ok(Evaluation::from_traces(traces))
    }
}
