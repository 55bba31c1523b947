//! Query execution: the delegate's answer plus capped visualization rows.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cypher;
use crate::fewshot::ExampleStore;
use crate::model::Row;
use crate::qa::QaDelegate;
use crate::storage::GraphStore;
use crate::translator::TranslatedQuery;
use crate::{Error, Result};

/// Default visualization row cap.
pub const DEFAULT_RESULT_CAP: usize = 50;

/// Everything one execution produced. Owned by a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub answer_text: String,
    pub translated_query: TranslatedQuery,
    /// The statement the delegate ran for its answer.
    pub qa_query_text: String,
    /// The translated statement with the result cap injected.
    pub capped_statement: String,
    pub rows: Vec<Row>,
}

/// Runs both execution steps against one store.
pub struct Executor<S, D> {
    store: S,
    delegate: D,
    examples: Arc<ExampleStore>,
    result_cap: usize,
    timeout: Duration,
}

impl<S: GraphStore, D: QaDelegate> Executor<S, D> {
    pub fn new(store: S, delegate: D, examples: Arc<ExampleStore>) -> Self {
        Self {
            store,
            delegate,
            examples,
            result_cap: DEFAULT_RESULT_CAP,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = cap.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Answer `question` through the delegate, then re-run `translated` with
    /// the result cap for visualization.
    pub async fn execute(&self, question: &str, translated: &TranslatedQuery) -> Result<ExecutionResult> {
        let answer = tokio::time::timeout(
            self.timeout,
            self.delegate.answer(question, &self.store, &self.examples),
        )
        .await
        .map_err(|_| Error::Execution {
            message: format!("question-answering chain timed out after {:?}", self.timeout),
            statement: translated.as_str().to_string(),
        })?
        .map_err(|e| normalize(e, translated.as_str()))?;

        let capped = cypher::inject_limit(translated.as_str(), self.result_cap)
            .map_err(|e| normalize(e, translated.as_str()))?;
        debug!(statement = %capped, cap = self.result_cap, "fetching visualization rows");

        let raw = tokio::time::timeout(self.timeout, self.store.query(&capped))
            .await
            .map_err(|_| Error::Execution {
                message: format!("graph store timed out after {:?}", self.timeout),
                statement: capped.clone(),
            })?
            .map_err(|e| normalize(e, &capped))?;
        debug!(rows = raw.len(), "visualization rows fetched");

        Ok(ExecutionResult {
            answer_text: answer.answer_text,
            translated_query: translated.clone(),
            qa_query_text: answer.translated_query_text,
            capped_statement: capped,
            rows: raw.into_rows(),
        })
    }
}

/// Raw store/scanner errors become `Execution` with the attempted statement;
/// typed pipeline errors pass through.
fn normalize(err: Error, statement: &str) -> Error {
    match err {
        Error::Store(message) => Error::Execution { message, statement: statement.to_string() },
        e @ Error::SyntaxError { .. } => Error::Execution {
            message: e.to_string(),
            statement: statement.to_string(),
        },
        Error::Model(message) => Error::Translation { message, completion: None },
        other => other,
    }
}
