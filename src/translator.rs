//! Natural language → Cypher translation.
//!
//! Prompt = instruction prefix, exemplars in order, then the user's question
//! with an empty completion slot. The statement is whatever the model puts
//! in that slot; grammar is the store's concern.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cypher;
use crate::fewshot::{ExampleStore, Exemplar, TranslationRequest};
use crate::llm::{LanguageModel, MIN_TEMPERATURE};
use crate::{Error, Result};

/// A non-empty statement in the target query language. Opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslatedQuery {
    statement: String,
}

impl TranslatedQuery {
    pub fn new(statement: impl Into<String>) -> Result<Self> {
        let statement = statement.into();
        if statement.trim().is_empty() {
            return Err(Error::Translation {
                message: "translated statement is empty".into(),
                completion: Some(statement),
            });
        }
        Ok(Self { statement })
    }

    pub fn as_str(&self) -> &str {
        &self.statement
    }

    pub fn into_string(self) -> String {
        self.statement
    }
}

impl fmt::Display for TranslatedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.statement)
    }
}

/// Few-shot translator over a [`LanguageModel`].
pub struct Translator<M> {
    model: M,
    examples: Arc<ExampleStore>,
    timeout: Duration,
}

impl<M: LanguageModel> Translator<M> {
    /// Fails with `Error::Config` unless the model runs at [`MIN_TEMPERATURE`].
    pub fn new(model: M, examples: Arc<ExampleStore>) -> Result<Self> {
        if model.temperature() > MIN_TEMPERATURE {
            return Err(Error::Config(format!(
                "model `{}` must run at temperature {MIN_TEMPERATURE}, configured {}",
                model.name(),
                model.temperature()
            )));
        }
        Ok(Self { model, examples, timeout: Duration::from_secs(60) })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn examples(&self) -> &Arc<ExampleStore> {
        &self.examples
    }

    /// Translate `question`, steering with `exemplars` and the store's
    /// prefix and dialect.
    pub async fn translate(&self, question: &str, exemplars: &[Exemplar]) -> Result<TranslatedQuery> {
        if question.trim().is_empty() {
            return Err(Error::Translation {
                message: "question is empty".into(),
                completion: None,
            });
        }

        let request = TranslationRequest {
            user_question: question.trim().to_string(),
            exemplars,
        };
        let prompt = self.examples.render_prompt(&request);
        debug!(model = self.model.name(), exemplars = exemplars.len(), prompt_len = prompt.len(), "translating question");

        let completion = match tokio::time::timeout(self.timeout, self.model.complete(&prompt)).await {
            Ok(Ok(completion)) => completion,
            Ok(Err(Error::Connection(msg))) => return Err(Error::Connection(msg)),
            Ok(Err(e)) => {
                warn!(error = %e, "language model call failed");
                return Err(Error::Translation { message: e.to_string(), completion: None });
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "language model timed out");
                return Err(Error::Translation {
                    message: format!("language model timed out after {:?}", self.timeout),
                    completion: None,
                });
            }
        };

        let dialect = self.examples.dialect();
        match cypher::extract_statement(&completion, dialect) {
            Some(statement) => {
                debug!(%statement, "extracted statement");
                TranslatedQuery::new(statement)
            }
            None => Err(Error::Translation {
                message: format!("no {dialect} statement found in model completion"),
                completion: Some(completion),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedModel;

    fn translator(model: ScriptedModel) -> Translator<ScriptedModel> {
        Translator::new(model, Arc::new(ExampleStore::default())).unwrap()
    }

    #[tokio::test]
    async fn test_translate_extracts_statement() {
        let model = ScriptedModel::new().with_translation(
            "Who directed Heat?",
            "Cypher",
            " MATCH (m:Movie {title: 'Heat'})<-[:DIRECTED]-(d) RETURN d.name",
        );
        let t = translator(model.clone());
        let examples = t.examples().clone();

        let query = t.translate("Who directed Heat?", examples.exemplars()).await.unwrap();
        assert_eq!(query.as_str(), "MATCH (m:Movie {title: 'Heat'})<-[:DIRECTED]-(d) RETURN d.name");

        let prompt = &model.prompts()[0];
        assert!(prompt.starts_with(examples.prefix()));
        assert!(prompt.contains("Question: Who directed The Matrix?\nCypher: MATCH"));
        assert!(prompt.ends_with("Question: Who directed Heat?\nCypher:"));
    }

    #[tokio::test]
    async fn test_empty_completion_is_translation_error() {
        let t = translator(ScriptedModel::new().with_default("   "));
        let err = t.translate("Who directed Heat?", &[]).await.unwrap_err();
        match err {
            Error::Translation { completion, .. } => assert_eq!(completion.as_deref(), Some("   ")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_prose_completion_keeps_raw_text() {
        let t = translator(ScriptedModel::new().with_default("Sorry, I can't help with that."));
        let err = t.translate("Who directed Heat?", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Translation { completion: Some(ref c), .. } if c == "Sorry, I can't help with that."
        ));
    }

    #[tokio::test]
    async fn test_model_failure_is_translation_error() {
        let t = translator(ScriptedModel::new().with_failure("Heat", "503 Service Unavailable"));
        let err = t.translate("Who directed Heat?", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Translation { completion: None, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_model_is_connection_error() {
        let t = translator(ScriptedModel::new().unreachable("connection refused"));
        let err = t.translate("Who directed Heat?", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_translation_error() {
        let model = ScriptedModel::new()
            .with_default("MATCH (n) RETURN n")
            .with_delay(Duration::from_secs(120));
        let t = translator(model).with_timeout(Duration::from_secs(5));
        let err = t.translate("Who directed Heat?", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Translation { ref message, .. } if message.contains("timed out")));
    }

    #[tokio::test]
    async fn test_empty_question_skips_model() {
        let model = ScriptedModel::new();
        let t = translator(model.clone());
        assert!(t.translate("  ", &[]).await.is_err());
        assert_eq!(model.call_count(), 0);
    }

    #[test]
    fn test_rejects_sampling_temperature() {
        let model = ScriptedModel::new().with_temperature(0.3);
        let result = Translator::new(model, Arc::new(ExampleStore::default()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_translated_query_must_be_non_empty() {
        assert!(TranslatedQuery::new("").is_err());
        assert_eq!(TranslatedQuery::new("RETURN 1").unwrap().to_string(), "RETURN 1");
    }
}
