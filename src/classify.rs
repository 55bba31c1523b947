//! Result classification into a deduplicated visual graph.
//!
//! Nodes are keyed by identity, edges by `(from, to, caption)`. Both live in
//! sorted containers, so the finished model does not depend on the order
//! rows or items arrived in.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{Item, Node, NodeId, Relationship, Row};

/// Display attributes of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualNode {
    pub label: String,
    pub group: String,
}

/// A captioned, directed edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VisualEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub caption: String,
}

/// Node/edge structure handed to a renderer.
///
/// Every edge endpoint is a key in `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualGraphModel {
    nodes: BTreeMap<NodeId, VisualNode>,
    edges: BTreeSet<VisualEdge>,
}

impl VisualGraphModel {
    pub fn nodes(&self) -> &BTreeMap<NodeId, VisualNode> {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeSet<VisualEdge> {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&VisualNode> {
        self.nodes.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Display label: `title`, then `name`, then the first label, then the
/// identity for an unlabelled node.
pub fn display_label(node: &Node) -> String {
    node.get("title")
        .and_then(|v| v.display_text())
        .or_else(|| node.get("name").and_then(|v| v.display_text()))
        .or_else(|| node.primary_label().map(str::to_string))
        .unwrap_or_else(|| node.id.to_string())
}

/// Accumulates items into a [`VisualGraphModel`].
#[derive(Debug, Default)]
pub struct GraphModelBuilder {
    model: VisualGraphModel,
    has_graph_elements: bool,
}

impl GraphModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// First insertion of an identity wins; repeats are ignored.
    pub fn add_node(&mut self, node: &Node) {
        self.has_graph_elements = true;
        self.model.nodes.entry(node.id).or_insert_with(|| VisualNode {
            label: display_label(node),
            group: node.primary_label().unwrap_or_default().to_string(),
        });
    }

    pub fn add_edge(&mut self, rel: &Relationship) {
        self.has_graph_elements = true;
        self.model.edges.insert(VisualEdge {
            from: rel.start_node_id,
            to: rel.end_node_id,
            caption: rel.rel_type.clone(),
        });
    }

    pub fn add_item(&mut self, item: &Item) {
        match item {
            Item::Node(node) => self.add_node(node),
            Item::Edge(rel) => self.add_edge(rel),
            Item::Scalar(_) => {}
        }
    }

    /// Give every edge endpoint that never arrived as a node a placeholder
    /// (label = identity, group = `""`), then hand back the model and
    /// whether any node or relationship was seen.
    pub fn finish(mut self) -> (VisualGraphModel, bool) {
        let missing: BTreeSet<NodeId> = self
            .model
            .edges
            .iter()
            .flat_map(|e| [e.from, e.to])
            .filter(|id| !self.model.nodes.contains_key(id))
            .collect();
        if !missing.is_empty() {
            warn!(placeholders = missing.len(), "edge endpoints missing from results, adding placeholder nodes");
        }
        for id in missing {
            self.model.nodes.insert(id, VisualNode { label: id.to_string(), group: String::new() });
        }
        (self.model, self.has_graph_elements)
    }
}

/// Visit every item of every row once and build the visual model.
pub fn classify(rows: &[Row]) -> (VisualGraphModel, bool) {
    let mut builder = GraphModelBuilder::new();
    for item in rows.iter().flat_map(Row::iter) {
        builder.add_item(item);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use pretty_assertions::assert_eq;

    fn movie(id: u64, title: &str) -> Node {
        Node::new(id).with_labels(["Movie"]).with_property("title", title)
    }

    fn person(id: u64, name: &str) -> Node {
        Node::new(id).with_labels(["Person"]).with_property("name", name)
    }

    #[test]
    fn test_title_beats_name() {
        let node = movie(1, "Inception").with_property("name", "ignored");
        assert_eq!(display_label(&node), "Inception");
    }

    #[test]
    fn test_name_then_label_then_id() {
        assert_eq!(display_label(&person(2, "Tom Hanks")), "Tom Hanks");
        assert_eq!(display_label(&Node::new(3).with_labels(["Person"])), "Person");
        assert_eq!(display_label(&Node::new(4)), "4");
        let blank_title = person(5, "Sigourney Weaver").with_property("title", "");
        assert_eq!(display_label(&blank_title), "Sigourney Weaver");
    }

    #[test]
    fn test_group_is_first_label() {
        let (model, _) = classify(&[Row::new([Item::Node(
            Node::new(1).with_labels(["Person", "Director"]),
        )])]);
        assert_eq!(model.node(NodeId(1)).unwrap().group, "Person");
    }

    #[test]
    fn test_first_insertion_wins() {
        let rows = [
            Row::new([Item::Node(movie(1, "Inception"))]),
            Row::new([Item::Node(movie(1, "Inception (re-fetched)"))]),
        ];
        let (model, has) = classify(&rows);
        assert!(has);
        assert_eq!(model.node_count(), 1);
        assert_eq!(model.node(NodeId(1)).unwrap().label, "Inception");
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let rows = [
            Row::new([
                Item::Node(person(1, "Christopher Nolan")),
                Item::Edge(Relationship::new(10, 1, 2, "DIRECTED")),
                Item::Node(movie(2, "Inception")),
            ]),
            Row::new([
                Item::Node(person(1, "Christopher Nolan")),
                Item::Edge(Relationship::new(10, 1, 2, "DIRECTED")),
                Item::Node(movie(2, "Inception")),
            ]),
        ];
        let (model, _) = classify(&rows);
        assert_eq!(model.edge_count(), 1);
        assert_eq!(
            model.edges().iter().next().unwrap(),
            &VisualEdge { from: NodeId(1), to: NodeId(2), caption: "DIRECTED".into() }
        );
    }

    #[test]
    fn test_scalars_are_ignored() {
        let rows = [Row::new([Item::Scalar(Value::from("Christopher Nolan"))])];
        let (model, has) = classify(&rows);
        assert!(!has);
        assert!(model.is_empty());
    }

    #[test]
    fn test_missing_endpoint_gets_placeholder() {
        let rows = [Row::new([
            Item::Node(person(1, "Keanu Reeves")),
            Item::Edge(Relationship::new(20, 1, 99, "ACTED_IN")),
        ])];
        let (model, has) = classify(&rows);
        assert!(has);
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.edge_count(), 1);
        assert_eq!(model.node(NodeId(1)).unwrap().label, "Keanu Reeves");
        assert_eq!(model.node(NodeId(99)), Some(&VisualNode { label: "99".into(), group: String::new() }));
    }

    #[test]
    fn test_placeholder_does_not_shadow_later_node() {
        let rows = [
            Row::new([Item::Edge(Relationship::new(20, 1, 2, "ACTED_IN"))]),
            Row::new([Item::Node(movie(2, "The Matrix"))]),
        ];
        let (model, _) = classify(&rows);
        assert_eq!(model.node(NodeId(2)).unwrap().label, "The Matrix");
        assert_eq!(model.node(NodeId(1)).unwrap().label, "1");
    }

    #[test]
    fn test_edge_before_its_nodes_is_kept() {
        let rows = [
            Row::new([Item::Edge(Relationship::new(30, 1, 2, "ACTED_IN"))]),
            Row::new([Item::Node(person(1, "Keanu Reeves")), Item::Node(movie(2, "The Matrix"))]),
        ];
        let (model, _) = classify(&rows);
        assert_eq!(model.edge_count(), 1);
    }

    #[test]
    fn test_empty_rows() {
        let (model, has) = classify(&[]);
        assert!(!has);
        assert_eq!(model, VisualGraphModel::default());
    }
}
