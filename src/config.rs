//! Runtime configuration.
//!
//! Credentials are collected by the host (UI, CLI, service) and passed in
//! explicitly; nothing here reads global state except [`Config::from_env`].

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::llm::MIN_TEMPERATURE;
use crate::{Error, Result};

/// Graph database connection settings.
///
/// The crate does not open connections itself: the host reads these when it
/// builds its driver-backed [`GraphStore`](crate::storage::GraphStore).
/// [`Config::validate`] still checks them so a missing credential fails
/// before the first question.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
}

impl Default for GraphConfig {
    /// Public read-only movie demo database.
    fn default() -> Self {
        Self {
            uri: "neo4j+s://demo.neo4jlabs.com".into(),
            username: "movies".into(),
            password: "movies".into(),
        }
    }
}

impl fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Hosted language model settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    /// OpenAI-compatible chat completions endpoint.
    pub endpoint: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "mixtral-8x7b-32768".into(),
            temperature: MIN_TEMPERATURE,
            endpoint: "https://api.groq.com/openai/v1/chat/completions".into(),
        }
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Pipeline limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rows fetched for visualization.
    pub result_cap: usize,
    /// Rows the QA chain feeds the model as context.
    pub qa_top_k: usize,
    pub translate_timeout_secs: u64,
    pub execute_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            result_cap: 50,
            qa_top_k: 10,
            translate_timeout_secs: 60,
            execute_timeout_secs: 60,
        }
    }
}

impl PipelineConfig {
    pub fn translate_timeout(&self) -> Duration {
        Duration::from_secs(self.translate_timeout_secs)
    }

    pub fn execute_timeout(&self) -> Duration {
        Duration::from_secs(self.execute_timeout_secs)
    }
}

/// Full configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub model: ModelConfig,
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Defaults overridden by `NEO4J_URI`, `NEO4J_USERNAME`, `NEO4J_PASSWORD`,
    /// `GROQ_API_KEY`, `GROQ_MODEL` and `RESULT_CAP`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(v) = lookup("NEO4J_URI") { config.graph.uri = v; }
        if let Some(v) = lookup("NEO4J_USERNAME") { config.graph.username = v; }
        if let Some(v) = lookup("NEO4J_PASSWORD") { config.graph.password = v; }
        if let Some(v) = lookup("GROQ_API_KEY") { config.model.api_key = v; }
        if let Some(v) = lookup("GROQ_MODEL") { config.model.model = v; }
        if let Some(v) = lookup("RESULT_CAP") {
            config.pipeline.result_cap = v.trim().parse().map_err(|_| {
                Error::Config(format!("RESULT_CAP must be a positive integer, got {v:?}"))
            })?;
        }
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Missing credentials are connection errors; bad limits are config errors.
    pub fn validate(&self) -> Result<()> {
        if self.graph.uri.trim().is_empty() {
            return Err(Error::Connection("graph store URI is not set".into()));
        }
        if self.graph.username.is_empty() || self.graph.password.is_empty() {
            return Err(Error::Connection("graph store credentials are not set".into()));
        }
        if self.model.api_key.trim().is_empty() {
            return Err(Error::Connection("language model API key is not set".into()));
        }
        if self.model.temperature > MIN_TEMPERATURE {
            return Err(Error::Config(format!(
                "temperature must be {MIN_TEMPERATURE} for reproducible translation, got {}",
                self.model.temperature
            )));
        }
        if self.pipeline.result_cap == 0 {
            return Err(Error::Config("result_cap must be at least 1".into()));
        }
        if self.pipeline.qa_top_k == 0 {
            return Err(Error::Config("qa_top_k must be at least 1".into()));
        }
        Ok(())
    }
}
