//! Typed relationship as returned by the store.

use serde::{Deserialize, Serialize};
use super::{NodeId, PropertyMap, Value};

/// Opaque relationship identity assigned by the graph store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelId(pub u64);

impl std::fmt::Display for RelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed, typed edge between two nodes.
///
/// Only the endpoint identities travel with the relationship; the endpoint
/// nodes themselves arrive as separate row values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelId,
    pub element_id: Option<String>,
    pub start_node_id: NodeId,
    pub end_node_id: NodeId,
    pub rel_type: String,
    pub properties: PropertyMap,
}

impl Relationship {
    pub fn new(id: u64, start: u64, end: u64, rel_type: impl Into<String>) -> Self {
        Self {
            id: RelId(id),
            element_id: None,
            start_node_id: NodeId(start),
            end_node_id: NodeId(end),
            rel_type: rel_type.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
