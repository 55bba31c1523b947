//! Renderer hand-off: serialize a visual graph as a vis-network document.
//!
//! ```text
//! VisualGraphModel → to_vis_data() → {"nodes": [...], "edges": [...]}
//!   → vis-network / pyvis / any renderer that groups by `group` and
//!     labels edges by `title`
//! ```
//!
//! Producing HTML is the renderer's job.

use std::io::Write;

use serde_json::{json, Value as Json};

use crate::classify::VisualGraphModel;
use crate::Result;

impl VisualGraphModel {
    /// Nodes as `{id, label, group}`, edges as `{from, to, title}`, both in
    /// identity order.
    pub fn to_vis_data(&self) -> Json {
        let nodes: Vec<Json> = self
            .nodes()
            .iter()
            .map(|(id, node)| json!({"id": id.0, "label": node.label, "group": node.group}))
            .collect();
        let edges: Vec<Json> = self
            .edges()
            .iter()
            .map(|edge| json!({"from": edge.from.0, "to": edge.to.0, "title": edge.caption}))
            .collect();
        json!({"nodes": nodes, "edges": edges})
    }
}

/// Write the vis-network document for `model` as pretty JSON.
pub fn export_vis_json(model: &VisualGraphModel, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &model.to_vis_data())?;
    writeln!(writer)?;
    Ok(())
}
