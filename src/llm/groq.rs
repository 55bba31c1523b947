//! Groq chat-completions client (OpenAI-compatible wire format).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::ModelConfig;
use crate::{Error, Result};
use super::LanguageModel;

/// Hosted model behind an OpenAI-compatible `/chat/completions` endpoint.
pub struct GroqClient {
    api_key: String,
    model: String,
    temperature: f32,
    endpoint: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl GroqClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Connection("GROQ_API_KEY is not set".into()));
        }
        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            endpoint: config.endpoint.clone(),
            client: Client::new(),
        })
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": self.temperature
        })
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self.client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| Error::Connection(format!("Groq API unreachable: {e}")))?;

        let status = response.status();
        let body = response.text().await
            .map_err(|e| Error::Model(format!("Failed to read Groq response: {e}")))?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Connection(format!("Groq rejected credentials ({status}): {body}")));
        }
        if !status.is_success() {
            return Err(Error::Model(format!("Groq API error {status}: {body}")));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Model(format!("Failed to parse Groq response: {e}")))?;

        Ok(parsed.choices.into_iter().next()
            .ok_or_else(|| Error::Model("No choices in Groq response".into()))?
            .message.content)
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn name(&self) -> &str {
        &self.model
    }
}
