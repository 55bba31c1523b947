//! Question-answering delegate.
//!
//! The executor gets its natural-language answer from a [`QaDelegate`]: a
//! chain that translates, executes and summarizes on its own. Its statement
//! may differ from the translator's; both come from the same question.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cypher;
use crate::fewshot::ExampleStore;
use crate::llm::LanguageModel;
use crate::storage::{GraphStore, QueryRows};
use crate::{Error, Result};

/// The delegate's summarized answer and the statement it ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaAnswer {
    pub answer_text: String,
    pub translated_query_text: String,
}

/// Translate + execute + summarize in one call.
#[async_trait]
pub trait QaDelegate: Send + Sync {
    async fn answer(&self, question: &str, store: &dyn GraphStore, prompt: &ExampleStore) -> Result<QaAnswer>;
}

#[async_trait]
impl<T: QaDelegate + ?Sized> QaDelegate for Arc<T> {
    async fn answer(&self, question: &str, store: &dyn GraphStore, prompt: &ExampleStore) -> Result<QaAnswer> {
        (**self).answer(question, store, prompt).await
    }
}

/// Marks the completion slot of the answer prompt.
pub const ANSWER_SLOT: &str = "Helpful Answer:";

const QA_PREFIX: &str = "You are an assistant that turns graph query results into clear, \
human-readable answers. Use only the information below and do not mention the query. \
If the information is empty, say that you don't know the answer.";

/// Default delegate: few-shot Cypher generation, execution, then a second
/// model call that summarizes the first `top_k` rows.
pub struct CypherQaChain<M> {
    model: M,
    top_k: usize,
}

impl<M: LanguageModel> CypherQaChain<M> {
    pub fn new(model: M) -> Self {
        Self { model, top_k: 10 }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    fn answer_prompt(&self, question: &str, rows: &QueryRows) -> String {
        let context = render_context(rows, self.top_k);
        format!("{QA_PREFIX}\n\nInformation:\n{context}\n\nQuestion: {question}\n{ANSWER_SLOT}")
    }
}

#[async_trait]
impl<M: LanguageModel> QaDelegate for CypherQaChain<M> {
    async fn answer(&self, question: &str, store: &dyn GraphStore, prompt: &ExampleStore) -> Result<QaAnswer> {
        let request = prompt.request(question.trim());
        let completion = self.model.complete(&prompt.render_prompt(&request)).await.map_err(|e| match e {
            Error::Connection(msg) => Error::Connection(msg),
            other => Error::Translation { message: other.to_string(), completion: None },
        })?;
        let statement = cypher::extract_statement(&completion, prompt.dialect()).ok_or_else(|| {
            Error::Translation {
                message: format!("no {} statement found in model completion", prompt.dialect()),
                completion: Some(completion.clone()),
            }
        })?;

        let rows = store.query(&statement).await.map_err(|e| match e {
            Error::Connection(msg) => Error::Connection(msg),
            other => Error::Execution { message: other.to_string(), statement: statement.clone() },
        })?;
        debug!(%statement, rows = rows.len(), "qa chain executed statement");

        let answer = self.model.complete(&self.answer_prompt(question, &rows)).await.map_err(|e| match e {
            Error::Connection(msg) => Error::Connection(msg),
            other => Error::Execution {
                message: format!("answer summarization failed: {other}"),
                statement: statement.clone(),
            },
        })?;

        Ok(QaAnswer {
            answer_text: answer.trim().to_string(),
            translated_query_text: statement,
        })
    }
}

/// One line per row, `column: value` pairs, at most `top_k` rows.
fn render_context(rows: &QueryRows, top_k: usize) -> String {
    if rows.is_empty() {
        return "(no results)".to_string();
    }
    rows.rows
        .iter()
        .take(top_k)
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, value)| match rows.columns.get(i) {
                    Some(column) => format!("{column}: {value}"),
                    None => value.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedModel;
    use crate::model::Value;
    use crate::storage::FixtureStore;

    const HEAT: &str = "MATCH (m:Movie {title: 'Heat'})<-[:DIRECTED]-(d) RETURN d.name";

    #[tokio::test]
    async fn test_chain_translates_runs_and_summarizes() {
        let model = ScriptedModel::new()
            .with_translation("Who directed Heat?", "Cypher", HEAT)
            .with_completion(ANSWER_SLOT, " Michael Mann directed Heat. ");
        let store = FixtureStore::new()
            .with_rows(HEAT, QueryRows::new(["d.name"]).with_row([Value::from("Michael Mann")]));

        let chain = CypherQaChain::new(model.clone());
        let answer = chain.answer("Who directed Heat?", &store, &ExampleStore::default()).await.unwrap();

        assert_eq!(answer.answer_text, "Michael Mann directed Heat.");
        assert_eq!(answer.translated_query_text, HEAT);
        assert_eq!(store.statements(), vec![HEAT.to_string()]);

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("d.name: \"Michael Mann\""));
        assert!(prompts[1].ends_with("Question: Who directed Heat?\nHelpful Answer:"));
    }

    #[tokio::test]
    async fn test_chain_rejected_statement_is_execution_error() {
        let model = ScriptedModel::new().with_default("MATCH (m:Film) RETURN m");
        let store = FixtureStore::new().with_rejection("MATCH (m:Film) RETURN m", "Unknown label Film");

        let err = CypherQaChain::new(model)
            .answer("List films", &store, &ExampleStore::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Execution { ref statement, .. } if statement == "MATCH (m:Film) RETURN m"));
    }

    #[test]
    fn test_context_respects_top_k() {
        let mut rows = QueryRows::new(["title"]);
        for i in 0..20 {
            rows = rows.with_row([Value::from(format!("Movie {i}"))]);
        }
        let context = render_context(&rows, 3);
        assert_eq!(context.lines().count(), 3);
        assert_eq!(render_context(&QueryRows::default(), 3), "(no results)");
    }
}
