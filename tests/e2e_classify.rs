//! End-to-end tests for result classification: store rows in, visual model out.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use cypher_lens::{
    classify, Item, Node, NodeId, Path, QueryRows, Relationship, Row, Value, VisualEdge,
};

// ============================================================================
// Helpers
// ============================================================================

/// Node whose attributes depend only on its id, as within one result set.
fn movie_node(id: u64) -> Node {
    let label = if id % 2 == 0 { "Movie" } else { "Person" };
    let key = if label == "Movie" { "title" } else { "name" };
    Node::new(id).with_labels([label]).with_property(key, format!("{label} {id}"))
}

fn rows(values: Vec<Vec<Value>>) -> Vec<Row> {
    values.into_iter().map(Row::from_values).collect()
}

// ============================================================================
// Fixed scenarios
// ============================================================================

#[test]
fn test_director_graph() {
    let nolan = Node::new(1).with_labels(["Person"]).with_property("name", "Christopher Nolan");
    let inception = Node::new(2).with_labels(["Movie"]).with_property("title", "Inception");
    let tenet = Node::new(3).with_labels(["Movie"]).with_property("title", "Tenet");

    let result = QueryRows::new(["d", "r", "m"])
        .with_row([
            Value::from(nolan.clone()),
            Value::from(Relationship::new(10, 1, 2, "DIRECTED")),
            Value::from(inception),
        ])
        .with_row([
            Value::from(nolan),
            Value::from(Relationship::new(11, 1, 3, "DIRECTED")),
            Value::from(tenet),
        ]);

    let (model, has) = classify(&result.into_rows());
    assert!(has);
    assert_eq!(model.node_count(), 3);
    assert_eq!(model.node(NodeId(1)).unwrap().label, "Christopher Nolan");
    assert_eq!(model.node(NodeId(3)).unwrap().group, "Movie");
    let edges: Vec<_> = model.edges().iter().cloned().collect();
    assert_eq!(
        edges,
        vec![
            VisualEdge { from: NodeId(1), to: NodeId(2), caption: "DIRECTED".into() },
            VisualEdge { from: NodeId(1), to: NodeId(3), caption: "DIRECTED".into() },
        ]
    );
}

#[test]
fn test_path_values_are_flattened() {
    let path = Path::single(movie_node(1))
        .append(Relationship::new(10, 1, 2, "ACTED_IN"), movie_node(2))
        .append(Relationship::new(11, 3, 2, "ACTED_IN"), movie_node(3));

    let (model, has) = classify(&rows(vec![vec![Value::from(path)]]));
    assert!(has);
    assert_eq!(model.node_count(), 3);
    assert_eq!(model.edge_count(), 2);
}

#[test]
fn test_mixed_row_keeps_only_graph_items() {
    let row = Row::new([
        Item::Node(movie_node(2)),
        Item::Scalar(Value::Float(8.8)),
        Item::Scalar(Value::from(vec!["Action", "Sci-Fi"])),
    ]);
    let (model, has) = classify(&[row]);
    assert!(has);
    assert_eq!(model.node_count(), 1);
    assert_eq!(model.edge_count(), 0);
}

#[test]
fn test_scalar_rows_have_no_graph_elements() {
    let result = QueryRows::new(["m.title", "m.imdbRating"])
        .with_row([Value::from("Inception"), Value::Float(8.8)])
        .with_row([Value::from("Tenet"), Value::Null]);
    let (model, has) = classify(&result.into_rows());
    assert!(!has);
    assert!(model.is_empty());
}

#[test]
fn test_node_without_title_or_name_uses_label() {
    let genre = Node::new(5).with_labels(["Genre"]);
    let bare = Node::new(6);
    let (model, _) = classify(&rows(vec![vec![Value::from(genre), Value::from(bare)]]));
    assert_eq!(model.node(NodeId(5)).unwrap().label, "Genre");
    assert_eq!(model.node(NodeId(6)).unwrap().label, "6");
    assert_eq!(model.node(NodeId(6)).unwrap().group, "");
}

#[test]
fn test_relationships_only_keeps_edges() {
    let result = QueryRows::new(["r"]).with_row([Value::from(Relationship::new(10, 1, 2, "DIRECTED"))]);
    let (model, has) = classify(&result.into_rows());
    assert!(has);
    assert_eq!(model.edge_count(), 1);
    assert_eq!(model.node_count(), 2);
    assert_eq!(model.node(NodeId(1)).unwrap().label, "1");
    assert_eq!(model.node(NodeId(2)).unwrap().group, "");
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Debug, Clone)]
enum Cell {
    Node(u64),
    Edge(u64, u64, &'static str),
    Scalar(i64),
}

impl Cell {
    fn value(&self) -> Value {
        match *self {
            Cell::Node(id) => Value::from(movie_node(id)),
            Cell::Edge(from, to, rel_type) => {
                Value::from(Relationship::new(from * 100 + to, from, to, rel_type))
            }
            Cell::Scalar(n) => Value::Int(n),
        }
    }
}

fn cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        (0u64..8).prop_map(Cell::Node),
        (0u64..8, 0u64..8, prop::sample::select(vec!["DIRECTED", "ACTED_IN", "IN_GENRE"]))
            .prop_map(|(a, b, t)| Cell::Edge(a, b, t)),
        any::<i64>().prop_map(Cell::Scalar),
    ]
}

fn result_set() -> impl Strategy<Value = Vec<Vec<Cell>>> {
    prop::collection::vec(prop::collection::vec(cell(), 0..4), 0..12)
}

fn to_rows(cells: &[Vec<Cell>]) -> Vec<Row> {
    cells
        .iter()
        .map(|row| Row::from_values(row.iter().map(Cell::value)))
        .collect()
}

proptest! {
    #[test]
    fn classify_is_idempotent(cells in result_set()) {
        let rows = to_rows(&cells);
        prop_assert_eq!(classify(&rows), classify(&rows));
    }

    #[test]
    fn classify_ignores_row_and_item_order(cells in result_set(), seed in any::<u64>()) {
        let mut shuffled = cells.clone();
        shuffled.reverse();
        for row in shuffled.iter_mut() {
            if !row.is_empty() {
                let k = (seed as usize) % row.len();
                row.rotate_left(k);
            }
        }
        prop_assert_eq!(classify(&to_rows(&cells)), classify(&to_rows(&shuffled)));
    }

    #[test]
    fn each_node_identity_appears_once(cells in result_set()) {
        let (model, _) = classify(&to_rows(&cells));
        let mut ids: Vec<u64> = cells
            .iter()
            .flatten()
            .flat_map(|c| match *c {
                Cell::Node(id) => vec![id],
                Cell::Edge(from, to, _) => vec![from, to],
                Cell::Scalar(_) => vec![],
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(model.node_count(), ids.len());
    }

    #[test]
    fn edges_connect_returned_nodes(cells in result_set()) {
        let (model, has) = classify(&to_rows(&cells));
        for edge in model.edges() {
            prop_assert!(model.node(edge.from).is_some());
            prop_assert!(model.node(edge.to).is_some());
        }
        let any_graph = cells.iter().flatten().any(|c| !matches!(c, Cell::Scalar(_)));
        prop_assert_eq!(has, any_graph);
    }

    #[test]
    fn edge_identity_is_endpoints_and_type(cells in result_set()) {
        let (model, _) = classify(&to_rows(&cells));
        let mut edges: Vec<(u64, u64, &str)> = cells
            .iter()
            .flatten()
            .filter_map(|c| match *c { Cell::Edge(a, b, t) => Some((a, b, t)), _ => None })
            .collect();
        edges.sort_unstable();
        edges.dedup();
        prop_assert_eq!(model.edge_count(), edges.len());
    }
}
