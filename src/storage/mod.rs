//! # Graph Store Contract
//!
//! The pipeline never talks to a database driver directly. Anything that can
//! run a Cypher statement and hand back raw values implements [`GraphStore`].
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `FixtureStore` | `memory` | Scripted in-memory store for tests/embedding |
//!
//! Driver-backed stores (Bolt, HTTP) live with the host application.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Row, Value};
use crate::Result;

pub use memory::FixtureStore;

// ============================================================================
// Raw results
// ============================================================================

/// Raw result of one statement: column names and positional values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryRows {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve every value into typed items. This is the only place raw
    /// values are inspected.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows.into_iter().map(Row::from_values).collect()
    }
}

// ============================================================================
// GraphStore Trait
// ============================================================================

/// Executes Cypher against a property graph.
///
/// Implementations report an unreachable or misconfigured store with
/// `Error::Connection` and a rejected statement with `Error::Store`.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn query(&self, statement: &str) -> Result<QueryRows>;
}

#[async_trait]
impl<T: GraphStore + ?Sized> GraphStore for Arc<T> {
    async fn query(&self, statement: &str) -> Result<QueryRows> {
        (**self).query(statement).await
    }
}
