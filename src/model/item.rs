//! Typed row items.
//!
//! Raw store values are resolved into [`Item`]s exactly once, when rows
//! leave the graph store. Everything downstream matches on the tag.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Node, Relationship, Value};

/// One result cell, classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item")]
pub enum Item {
    Node(Node),
    Edge(Relationship),
    /// Text, number, date, collection. Opaque to the visual model.
    Scalar(Value),
}

impl Item {
    pub fn is_graph_element(&self) -> bool {
        !matches!(self, Item::Scalar(_))
    }
}

/// An ordered sequence of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub items: SmallVec<[Item; 4]>,
}

impl Row {
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        Self { items: items.into_iter().collect() }
    }

    /// Resolve raw store values. Paths expand in place into their nodes
    /// and relationships in path order; every other value maps to one item.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut items = SmallVec::new();
        for value in values {
            match value {
                Value::Node(n) => items.push(Item::Node(*n)),
                Value::Relationship(r) => items.push(Item::Edge(*r)),
                Value::Path(p) => {
                    let path = *p;
                    let mut rels = path.relationships.into_iter();
                    for node in path.nodes {
                        items.push(Item::Node(node));
                        if let Some(rel) = rels.next() {
                            items.push(Item::Edge(rel));
                        }
                    }
                }
                scalar => items.push(Item::Scalar(scalar)),
            }
        }
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}

impl FromIterator<Item> for Row {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::new(iter)
    }
}
