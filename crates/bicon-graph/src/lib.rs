//! Bicon Graph - Biconnected component decomposition
//!
//! This crate holds an undirected simple graph whose vertices are addressed
//! by caller-chosen integer indices, and the depth-first search that splits
//! it into biconnected components at its articulation points.
//!
//! # Architecture
//!
//! Vertices live in a dense arena and refer to each other by slot. The graph
//! keeps two indexes on top of the arena:
//! - Caller index to slot (insertion ordered, drives traversal order)
//! - Slot to caller index (translates neighbor sets back for queries and export)
//!
//! Graphs round-trip through the `{vertices, connections}` JSON notation.
//!
//! # Example
//!
//! ```
//! use bicon_graph::Graph;
//!
//! let mut graph = Graph::new();
//! for v in 0..5 {
//!     graph.add_vertex(v).unwrap();
//! }
//! // two triangles sharing vertex 2
//! for (a, b) in [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)] {
//!     graph.add_edge(a, b).unwrap();
//! }
//!
//! let components = graph.biconnected_components().unwrap();
//! assert_eq!(components.len(), 2);
//! assert_eq!(graph.articulation_points(), vec![2]);
//! ```

pub mod dfs;
mod error;
mod graph;
mod notation;
mod vertex;

pub use dfs::{
    articulation_points, biconnected_component_edges, biconnected_components, walk_depth_first,
};
pub use error::{GraphError, NotationError, Result};
pub use graph::{Graph, GraphStats, VertexIndex};
pub use notation::{Connection, Notation};
