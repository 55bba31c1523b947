//! Path values: alternating nodes and relationships.

use serde::{Deserialize, Serialize};
use super::{Node, Relationship};

/// `(n0)-[r0]-(n1)-[r1]-(n2) ...` as returned for `RETURN p` on a path variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// One more element than `relationships`.
    pub nodes: Vec<Node>,
    pub relationships: Vec<Relationship>,
}

impl Path {
    pub fn single(node: Node) -> Self {
        Self { nodes: vec![node], relationships: Vec::new() }
    }

    /// Number of hops.
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn append(mut self, rel: Relationship, node: Node) -> Self {
        self.relationships.push(rel);
        self.nodes.push(node);
        self
    }
}
