//! Scripted in-memory graph store.
//!
//! Maps exact statement text to a canned response and records every
//! statement it receives. Statements without a script entry are rejected
//! the way a real store rejects an unknown query, unless a fallback is set.
//!
//! Use this store for:
//! - Testing the pipeline without a database
//! - Replaying recorded result sets
//! - Counting store calls per question

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use parking_lot::RwLock;
use async_trait::async_trait;

use crate::{Error, Result};
use super::{GraphStore, QueryRows};

#[derive(Debug, Clone)]
enum Response {
    Rows(QueryRows),
    Reject(String),
    Unreachable(String),
}

impl Response {
    fn resolve(&self) -> Result<QueryRows> {
        match self {
            Response::Rows(rows) => Ok(rows.clone()),
            Response::Reject(msg) => Err(Error::Store(msg.clone())),
            Response::Unreachable(msg) => Err(Error::Connection(msg.clone())),
        }
    }
}

/// In-memory scripted store. Clones share the same script and log.
#[derive(Clone, Default)]
pub struct FixtureStore {
    inner: Arc<FixtureInner>,
}

#[derive(Default)]
struct FixtureInner {
    script: RwLock<HashMap<String, Response>>,
    fallback: RwLock<Option<Response>>,
    log: RwLock<Vec<String>>,
    delay: RwLock<Option<Duration>>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `statement` with `rows`.
    pub fn with_rows(self, statement: impl Into<String>, rows: QueryRows) -> Self {
        self.inner.script.write().insert(statement.into(), Response::Rows(rows));
        self
    }

    /// Reject `statement` with a store error.
    pub fn with_rejection(self, statement: impl Into<String>, message: impl Into<String>) -> Self {
        self.inner.script.write().insert(statement.into(), Response::Reject(message.into()));
        self
    }

    /// Answer every unscripted statement with `rows`.
    pub fn with_fallback_rows(self, rows: QueryRows) -> Self {
        *self.inner.fallback.write() = Some(Response::Rows(rows));
        self
    }

    /// Fail every unscripted statement as if the store were down.
    pub fn unreachable(self, message: impl Into<String>) -> Self {
        *self.inner.fallback.write() = Some(Response::Unreachable(message.into()));
        self
    }

    /// Sleep before answering each statement, to exercise timeouts.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.inner.delay.write() = Some(delay);
        self
    }

    /// Statements received so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.inner.log.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.log.read().len()
    }
}

#[async_trait]
impl GraphStore for FixtureStore {
    async fn query(&self, statement: &str) -> Result<QueryRows> {
        self.inner.log.write().push(statement.to_string());
        let delay = *self.inner.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(response) = self.inner.script.read().get(statement) {
            return response.resolve();
        }
        match &*self.inner.fallback.read() {
            Some(response) => response.resolve(),
            None => Err(Error::Store(format!(
                "Invalid input: no result scripted for statement `{statement}`"
            ))),
        }
    }
}
