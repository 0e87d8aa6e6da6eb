//! Text-generation backends.

use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const AUTH_ENV_VAR: &str = "OPENAI_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Turns a prompt into a reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Settings for an OpenAI-compatible chat backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub model: String,
    /// Full `/chat/completions` URL or an API base such as `https://host/v1`.
    pub endpoint: String,
    pub temperature: f64,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            api_key_env: AUTH_ENV_VAR.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Single-message chat completion client.
#[derive(Clone)]
pub struct OpenAiChatGenerator {
    client: Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl std::fmt::Debug for OpenAiChatGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatGenerator")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiChatGenerator {
    pub fn new(api_key: impl Into<String>, settings: &ChatSettings) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: resolve_chat_endpoint(&settings.endpoint),
            api_key: api_key.into(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    /// Build a client whose key is read from `settings.api_key_env`.
    pub fn from_env(settings: &ChatSettings) -> Result<Self, LlmError> {
        let api_key = std::env::var(&settings.api_key_env)
            .map_err(|_| LlmError::MissingApiKey(settings.api_key_env.clone()))?;
        Self::new(api_key, settings)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let payload = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status,
                body: truncate(&body, 320),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        let choice = body.choices.into_iter().next().ok_or(LlmError::NoChoices)?;
        let text = choice.message.content.unwrap_or_default();

        debug!(model = %self.model, chars = text.len(), "Chat completion received");
        Ok(text)
    }
}

fn resolve_chat_endpoint(endpoint: &str) -> String {
    if endpoint.contains("/chat/completions") {
        endpoint.to_string()
    } else {
        format!("{}/chat/completions", endpoint.trim_end_matches('/'))
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

/// Offline generator for tests and dry runs.
///
/// Replies come from the queue first, then from the first rule whose needle
/// occurs in the prompt, then from the fallback.
#[derive(Default)]
pub struct ScriptedGenerator {
    queue: Mutex<VecDeque<String>>,
    rules: Vec<(String, String)>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            queue: Mutex::new(replies.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn with_rule(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push((needle.into(), reply.into()));
        self
    }

    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let queued = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        queued
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|(needle, _)| prompt.contains(needle.as_str()))
                    .map(|(_, reply)| reply.clone())
            })
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| LlmError::NoScriptedReply(truncate(prompt, 80)))
    }
}
