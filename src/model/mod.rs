//! # Property Graph Model
//!
//! DTOs for what a graph store hands back: nodes, relationships, paths and
//! scalar values, plus the typed [`Item`]/[`Row`] view the pipeline works on.
//!
//! Pure data: no I/O and no async.

pub mod node;
pub mod relationship;
pub mod path;
pub mod value;
pub mod property_map;
pub mod item;

pub use node::{Node, NodeId};
pub use relationship::{Relationship, RelId};
pub use path::Path;
pub use value::Value;
pub use property_map::{PropertyMap, props};
pub use item::{Item, Row};
