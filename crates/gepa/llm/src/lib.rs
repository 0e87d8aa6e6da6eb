#![deny(unsafe_code)]
//! # gepa-llm
//!
//! Language-model collaborators for the GEPA engine, specialised for the
//! PII-stripping task: a task runner, a judge-backed [`Evaluator`], a
//! reflective [`Mutator`], and a synthesising [`Merger`].
//!
//! All of them talk to a [`TextGenerator`]. [`OpenAiChatGenerator`] speaks
//! the OpenAI chat-completions protocol; [`ScriptedGenerator`] replays canned
//! replies offline.
//!
//! [`Evaluator`]: gepa_engine::Evaluator
//! [`Mutator`]: gepa_engine::Mutator
//! [`Merger`]: gepa_engine::Merger

pub mod error;
pub mod evaluator;
pub mod generator;
pub mod merger;
pub mod mutator;
pub mod parse;
pub mod prompts;
pub mod task;

pub use error::LlmError;
pub use evaluator::{JudgeEvaluator, Verdict};
pub use generator::{ChatSettings, OpenAiChatGenerator, ScriptedGenerator, TextGenerator};
pub use merger::PromptMerger;
pub use mutator::ReflectiveMutator;
pub use prompts::BASE_INSTRUCTION;
pub use task::TaskRunner;
