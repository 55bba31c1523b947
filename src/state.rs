//! Query lifecycle states and progress reporting.
//!
//! ```text
//! Received → Translating → Executing → Classifying → Presented
//!                 │             │
//!                 └─────────────┴──→ Failed { stage, error }
//! ```

use serde::{Deserialize, Serialize};

use crate::Error;

/// Pipeline stage that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Translating,
    Executing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Translating => f.write_str("translating"),
            Stage::Executing => f.write_str("executing"),
        }
    }
}

/// Where one question's lifecycle is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum QueryState {
    Received,
    Translating,
    Executing,
    Classifying,
    Presented,
    Failed { stage: Stage, error: ErrorInfo },
}

impl QueryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryState::Presented | QueryState::Failed { .. })
    }
}

/// Error category surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Connection,
    Translation,
    Execution,
    Config,
}

/// Serializable projection of an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
    /// Raw completion for translation failures, attempted statement for
    /// execution failures.
    pub detail: Option<String>,
}

impl ErrorInfo {
    pub fn new(stage: Stage, error: &Error) -> Self {
        let (kind, detail) = match error {
            Error::Connection(_) | Error::Io(_) => (ErrorKind::Connection, None),
            Error::Translation { completion, .. } => (ErrorKind::Translation, completion.clone()),
            Error::Model(_) => (ErrorKind::Translation, None),
            Error::Execution { statement, .. } => (ErrorKind::Execution, Some(statement.clone())),
            Error::Store(_) | Error::SyntaxError { .. } => (ErrorKind::Execution, None),
            Error::Config(_) | Error::Json(_) => (ErrorKind::Config, None),
        };
        Self { stage, kind, message: error.to_string(), detail }
    }
}

/// Receives every state transition of a query, in order.
pub trait ProgressObserver: Send + Sync {
    fn on_transition(&self, state: &QueryState);
}

impl<F> ProgressObserver for F
where
    F: Fn(&QueryState) + Send + Sync,
{
    fn on_transition(&self, state: &QueryState) {
        self(state)
    }
}
