//! Scripted language model for tests.
//!
//! Completions are chosen by substring match on the prompt, most recently
//! added rule first. Every prompt is recorded so tests can assert on what
//! was sent and how often.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{Error, Result};
use super::{LanguageModel, MIN_TEMPERATURE};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
    Unreachable(String),
}

/// Deterministic [`LanguageModel`] driven by rules.
#[derive(Clone)]
pub struct ScriptedModel {
    name: String,
    temperature: f32,
    rules: Arc<Mutex<Vec<(String, Reply)>>>,
    default: Arc<Mutex<Reply>>,
    delay: Option<Duration>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedModel {
    /// Answers every prompt with an empty completion until rules are added.
    pub fn new() -> Self {
        Self {
            name: "scripted".to_string(),
            temperature: MIN_TEMPERATURE,
            rules: Arc::new(Mutex::new(Vec::new())),
            default: Arc::new(Mutex::new(Reply::Text(String::new()))),
            delay: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply `completion` to prompts containing `needle`.
    pub fn with_completion(self, needle: impl Into<String>, completion: impl Into<String>) -> Self {
        self.rules.lock().push((needle.into(), Reply::Text(completion.into())));
        self
    }

    /// Reply to prompts that end by asking `question` in `dialect`.
    pub fn with_translation(self, question: &str, dialect: &str, completion: impl Into<String>) -> Self {
        self.with_completion(format!("Question: {question}\n{dialect}:"), completion)
    }

    /// Fail prompts containing `needle` with a model error.
    pub fn with_failure(self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.lock().push((needle.into(), Reply::Fail(message.into())));
        self
    }

    /// Reply to unmatched prompts with `completion`.
    pub fn with_default(self, completion: impl Into<String>) -> Self {
        *self.default.lock() = Reply::Text(completion.into());
        self
    }

    /// Fail every unmatched prompt as if the provider were down.
    pub fn unreachable(self, message: impl Into<String>) -> Self {
        *self.default.lock() = Reply::Unreachable(message.into());
        self
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .rules
            .lock()
            .iter()
            .rev()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default.lock().clone());

        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail(msg) => Err(Error::Model(msg)),
            Reply::Unreachable(msg) => Err(Error::Connection(msg)),
        }
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn name(&self) -> &str {
        &self.name
    }
}
