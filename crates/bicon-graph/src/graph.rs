//! Core graph data structure.
//!
//! The Graph owns every vertex in an arena and addresses them by
//! caller-chosen integer indices. It's the central data structure that the
//! traversals and the notation import/export work with.

use crate::error::{GraphError, Result};
use crate::notation::{Connection, Notation};
use crate::vertex::{Vertex, VertexArena, VertexKey};
use indexmap::{IndexMap, IndexSet};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Caller-visible identifier of a vertex.
pub type VertexIndex = i64;

/// An undirected simple graph.
///
/// No self-loops, at most one edge per unordered pair, and the neighbor
/// relation is always symmetric.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Vertex storage.
    arena: VertexArena,

    /// Maps caller indices to arena slots, in insertion order.
    by_index: IndexMap<VertexIndex, VertexKey>,

    /// Maps arena slots back to caller indices.
    by_key: HashMap<VertexKey, VertexIndex>,
}

impl Graph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a vertex bound to `index`.
    pub fn add_vertex(&mut self, index: VertexIndex) -> Result<()> {
        if self.by_index.contains_key(&index) {
            return Err(GraphError::VertexAlreadyExists(index));
        }
        let key = self.arena.insert(Vertex::new());
        self.by_index.insert(index, key);
        self.by_key.insert(key, index);
        debug!(index, "added vertex");
        Ok(())
    }

    /// Removes a vertex together with every edge incident to it.
    pub fn remove_vertex(&mut self, index: VertexIndex) -> Result<()> {
        let key = self.key_of(index)?;
        let former = self.arena.isolate(key);
        self.arena.remove(key);
        self.by_index.shift_remove(&index);
        self.by_key.remove(&key);
        debug!(index, edges = former.len(), "removed vertex");
        Ok(())
    }

    /// Adds the undirected edge `{from, to}`.
    ///
    /// `add_edge(a, b)` and `add_edge(b, a)` are the same operation.
    pub fn add_edge(&mut self, from: VertexIndex, to: VertexIndex) -> Result<()> {
        let (from, to) = canonical(from, to);
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        let a = self.key_of(from)?;
        let b = self.key_of(to)?;
        self.arena
            .connect(a, b)
            .map_err(|_| GraphError::EdgeAlreadyExists { from, to })?;
        debug!(from, to, "added edge");
        Ok(())
    }

    /// Removes the undirected edge `{from, to}`.
    pub fn remove_edge(&mut self, from: VertexIndex, to: VertexIndex) -> Result<()> {
        let (from, to) = canonical(from, to);
        let a = self.key_of(from)?;
        let b = self.key_of(to)?;
        self.arena
            .disconnect(a, b)
            .map_err(|_| GraphError::EdgeNotFound { from, to })?;
        debug!(from, to, "removed edge");
        Ok(())
    }

    /// Iterates live vertex indices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexIndex> + '_ {
        self.by_index.keys().copied()
    }

    pub fn has_vertex(&self, index: VertexIndex) -> bool {
        self.by_index.contains_key(&index)
    }

    /// Returns true if both vertices exist and are adjacent.
    pub fn has_edge(&self, from: VertexIndex, to: VertexIndex) -> bool {
        match (self.by_index.get(&from), self.by_index.get(&to)) {
            (Some(&a), Some(&b)) => self.arena.get(a).is_some_and(|v| v.is_neighbor(b)),
            _ => false,
        }
    }

    /// Gets the indices adjacent to `index`, in the order the edges were added.
    pub fn neighbors_of(&self, index: VertexIndex) -> Result<IndexSet<VertexIndex>> {
        let vertex = self.vertex(self.key_of(index)?);
        Ok(vertex.neighbors().map(|k| self.index_of(k)).collect())
    }

    /// Number of edges incident to `index`.
    pub fn degree(&self, index: VertexIndex) -> Result<usize> {
        Ok(self.vertex(self.key_of(index)?).degree())
    }

    pub fn vertex_count(&self) -> usize {
        self.by_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.by_index
            .values()
            .map(|&k| self.vertex(k).degree())
            .sum::<usize>()
            / 2
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Iterates each edge once as a `(smaller, larger)` pair.
    pub fn edges(&self) -> impl Iterator<Item = (VertexIndex, VertexIndex)> + '_ {
        self.by_index.iter().flat_map(move |(&index, &key)| {
            self.vertex(key)
                .neighbors()
                .map(move |k| self.index_of(k))
                .filter(move |&other| index < other)
                .map(move |other| (index, other))
        })
    }

    /// Builds the subgraph induced by `indices`.
    ///
    /// The result holds exactly the given vertices and every edge of this
    /// graph whose endpoints are both among them. Requested indices that
    /// repeat are collapsed.
    pub fn subgraph_with<I>(&self, indices: I) -> Result<Graph>
    where
        I: IntoIterator<Item = VertexIndex>,
    {
        let mut wanted = IndexSet::new();
        for index in indices {
            self.key_of(index)?;
            wanted.insert(index);
        }

        let mut sub = Graph::new();
        for &index in &wanted {
            sub.add_vertex(index)?;
        }
        for &index in &wanted {
            let key = self.by_index[&index];
            for other in self.vertex(key).neighbors().map(|k| self.index_of(k)) {
                if wanted.contains(&other) && !sub.has_edge(index, other) {
                    sub.add_edge(index, other)?;
                }
            }
        }
        Ok(sub)
    }

    /// Builds a graph from untyped JSON in notation form.
    pub fn import(source: &Value) -> Result<Graph> {
        let notation = Notation::from_value(source).map_err(|e| GraphError::import(e.into()))?;
        Self::from_notation(&notation)
    }

    /// Builds a graph from JSON text in notation form.
    pub fn from_json_str(text: &str) -> Result<Graph> {
        let notation = Notation::from_json_str(text).map_err(|e| GraphError::import(e.into()))?;
        Self::from_notation(&notation)
    }

    /// Builds a graph from a typed notation: vertices first, in listed order,
    /// then edges.
    pub fn from_notation(notation: &Notation) -> Result<Graph> {
        let mut graph = Graph::new();
        for &index in &notation.vertices {
            graph.add_vertex(index).map_err(GraphError::import)?;
        }
        for connection in &notation.connections {
            graph
                .add_edge(connection.from, connection.to)
                .map_err(GraphError::import)?;
        }
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "imported graph"
        );
        Ok(graph)
    }

    /// Exports to notation form.
    ///
    /// Connections are listed in depth-first discovery order, so the output
    /// re-imports to a graph with the same decomposition.
    pub fn export(&self) -> Notation {
        let connections: Vec<Connection> = self
            .walk_depth_first()
            .into_iter()
            .map(Connection::from)
            .collect();
        debug!(
            vertices = self.vertex_count(),
            edges = connections.len(),
            "exported graph"
        );
        Notation {
            vertices: self.vertices().collect(),
            connections,
        }
    }

    /// Exports to notation JSON text.
    pub fn to_json_string(&self, pretty: bool) -> String {
        self.export().to_json_string(pretty)
    }

    /// Converts to a petgraph graph whose node weights are the vertex indices.
    pub fn to_petgraph(&self) -> UnGraph<VertexIndex, ()> {
        let mut out = UnGraph::with_capacity(self.vertex_count(), self.edge_count());
        let nodes: HashMap<VertexIndex, NodeIndex> =
            self.vertices().map(|index| (index, out.add_node(index))).collect();
        for (from, to) in self.edges() {
            out.add_edge(nodes[&from], nodes[&to], ());
        }
        out
    }

    /// Number of connected components, isolated vertices included.
    pub fn connected_components(&self) -> usize {
        petgraph::algo::connected_components(&self.to_petgraph())
    }

    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            vertex_count: self.vertex_count(),
            edge_count: self.edge_count(),
            connected_components: self.connected_components(),
        }
    }

    // Arena access for the traversals.

    pub(crate) fn arena_capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.by_index.values().copied()
    }

    pub(crate) fn vertex(&self, key: VertexKey) -> &Vertex {
        // Keys come from `by_index`, which only holds live slots.
        self.arena
            .get(key)
            .unwrap_or_else(|| unreachable!("stale vertex key {key:?}"))
    }

    pub(crate) fn index_of(&self, key: VertexKey) -> VertexIndex {
        self.by_key[&key]
    }

    fn key_of(&self, index: VertexIndex) -> Result<VertexKey> {
        self.by_index
            .get(&index)
            .copied()
            .ok_or(GraphError::VertexNotFound(index))
    }
}

impl TryFrom<&Notation> for Graph {
    type Error = GraphError;

    fn try_from(notation: &Notation) -> Result<Self> {
        Graph::from_notation(notation)
    }
}

fn canonical(a: VertexIndex, b: VertexIndex) -> (VertexIndex, VertexIndex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Graph statistics for the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub connected_components: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use std::error::Error as _;

    fn graph_from(vertices: &[VertexIndex], edges: &[(VertexIndex, VertexIndex)]) -> Graph {
        let mut g = Graph::new();
        for &v in vertices {
            g.add_vertex(v).unwrap();
        }
        for &(a, b) in edges {
            g.add_edge(a, b).unwrap();
        }
        g
    }

    fn sorted(set: IndexSet<VertexIndex>) -> Vec<VertexIndex> {
        let mut v: Vec<_> = set.into_iter().collect();
        v.sort();
        v
    }

    #[test]
    fn test_add_vertex_twice() {
        let mut g = Graph::new();
        g.add_vertex(5).unwrap();
        assert!(matches!(
            g.add_vertex(5),
            Err(GraphError::VertexAlreadyExists(5))
        ));
        assert_eq!(g.vertex_count(), 1);
    }

    #[test]
    fn test_edge_is_symmetric() {
        let g = graph_from(&[1, 2, 3], &[(2, 1), (3, 2)]);

        for a in g.vertices() {
            for b in g.neighbors_of(a).unwrap() {
                assert!(g.neighbors_of(b).unwrap().contains(&a));
            }
        }
        assert!(g.has_edge(1, 2));
        assert!(g.has_edge(2, 1));
        assert!(!g.has_edge(1, 3));
    }

    #[test]
    fn test_duplicate_edge_is_order_independent() {
        let mut g = graph_from(&[1, 2], &[(1, 2)]);
        assert!(matches!(
            g.add_edge(2, 1),
            Err(GraphError::EdgeAlreadyExists { from: 1, to: 2 })
        ));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut g = graph_from(&[4], &[]);
        assert!(matches!(g.add_edge(4, 4), Err(GraphError::SelfLoop(4))));
        assert_eq!(g.degree(4).unwrap(), 0);
    }

    #[test]
    fn test_missing_vertices() {
        let mut g = graph_from(&[1], &[]);
        assert!(matches!(g.add_edge(1, 9), Err(GraphError::VertexNotFound(9))));
        assert!(matches!(g.remove_vertex(9), Err(GraphError::VertexNotFound(9))));
        assert!(matches!(g.neighbors_of(9), Err(GraphError::VertexNotFound(9))));
        assert!(matches!(g.remove_edge(9, 1), Err(GraphError::VertexNotFound(9))));
    }

    #[test]
    fn test_remove_edge() {
        let mut g = graph_from(&[1, 2, 3], &[(1, 2), (2, 3)]);

        g.remove_edge(2, 1).unwrap();
        assert!(!g.has_edge(1, 2));
        assert_eq!(g.edge_count(), 1);
        assert!(matches!(
            g.remove_edge(1, 2),
            Err(GraphError::EdgeNotFound { from: 1, to: 2 })
        ));
    }

    #[test]
    fn test_remove_vertex_cascades() {
        let mut g = graph_from(&[0, 1, 2, 3], &[(0, 1), (0, 2), (0, 3), (1, 2)]);

        g.remove_vertex(0).unwrap();

        assert!(!g.has_vertex(0));
        assert_eq!(g.edge_count(), 1);
        for v in [1, 2, 3] {
            assert!(!g.neighbors_of(v).unwrap().contains(&0));
        }
        assert_eq!(sorted(g.neighbors_of(1).unwrap()), vec![2]);
    }

    #[test]
    fn test_index_reused_after_removal() {
        let mut g = graph_from(&[0, 1], &[(0, 1)]);
        g.remove_vertex(1).unwrap();
        g.add_vertex(1).unwrap();
        g.add_vertex(2).unwrap();

        assert_eq!(g.degree(1).unwrap(), 0);
        g.add_edge(0, 2).unwrap();
        assert_eq!(sorted(g.neighbors_of(0).unwrap()), vec![2]);
    }

    #[test]
    fn test_vertices_keep_insertion_order() {
        let mut g = graph_from(&[7, -1, 3, 0], &[]);
        g.remove_vertex(-1).unwrap();
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![7, 3, 0]);
    }

    #[test]
    fn test_edges_listed_once() {
        let g = graph_from(&[0, 1, 2], &[(0, 1), (1, 2), (2, 0)]);
        let edges: HashSet<_> = g.edges().collect();
        assert_eq!(edges, HashSet::from([(0, 1), (1, 2), (0, 2)]));
        assert_eq!(g.edges().count(), 3);
    }

    #[test]
    fn test_subgraph_with() {
        let g = graph_from(&[0, 1, 2, 3], &[(0, 1), (1, 2), (2, 0), (2, 3)]);

        let sub = g.subgraph_with([2, 0, 1, 0]).unwrap();

        assert_eq!(sub.vertex_count(), 3);
        let edges: HashSet<_> = sub.edges().collect();
        assert_eq!(edges, HashSet::from([(0, 1), (1, 2), (0, 2)]));
        assert!(matches!(
            g.subgraph_with([0, 8]),
            Err(GraphError::VertexNotFound(8))
        ));
    }

    #[test]
    fn test_import_export_round_trip() {
        let source = json!({
            "vertices": [10, 20, 30, 40, 50],
            "connections": [
                {"from": 10, "to": 20},
                {"from": 30, "to": 20},
                {"from": 30, "to": 10},
                {"from": 40, "to": 50}
            ]
        });
        let original = Notation::from_value(&source).unwrap();

        let exported = Graph::import(&source).unwrap().export();

        assert_eq!(exported.vertex_set(), original.vertex_set());
        assert_eq!(exported.edge_set(), original.edge_set());
        assert_eq!(exported.connections.len(), 4);
    }

    #[test]
    fn test_export_is_depth_first() {
        let g = graph_from(&[0, 1, 2, 3], &[(0, 1), (0, 2), (1, 3)]);
        let exported = g.export();
        assert_eq!(
            exported.connections,
            vec![
                Connection::new(0, 1),
                Connection::new(1, 3),
                Connection::new(0, 2)
            ]
        );
    }

    #[test]
    fn test_import_unknown_vertex_wraps_cause() {
        let err = Graph::import(&json!({
            "vertices": [0, 1],
            "connections": [{"from": 0, "to": 2}]
        }))
        .unwrap_err();

        assert!(matches!(err, GraphError::Import { .. }));
        let cause = err.source().unwrap();
        assert_eq!(cause.to_string(), "vertex 2 does not exist");
    }

    #[test]
    fn test_import_duplicate_edge() {
        let err = Graph::import(&json!({
            "vertices": [0, 1],
            "connections": [{"from": 0, "to": 1}, {"from": 1, "to": 0}]
        }))
        .unwrap_err();

        match err {
            GraphError::Import { source } => {
                assert!(matches!(*source, GraphError::EdgeAlreadyExists { .. }))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_import_bad_type() {
        let err = Graph::from_json_str(r#"{"vertices": ["a"], "connections": []}"#).unwrap_err();
        assert!(err.to_string().starts_with("unable to import"));
        assert!(err.source().unwrap().to_string().contains("vertices[0]"));
    }

    #[test]
    fn test_petgraph_conversion() {
        let g = graph_from(&[0, 1, 2, 5, 6, 9], &[(0, 1), (1, 2), (5, 6)]);

        let pg = g.to_petgraph();
        assert_eq!(pg.node_count(), 6);
        assert_eq!(pg.edge_count(), 3);
        assert_eq!(g.connected_components(), 3);
        assert_eq!(
            g.stats(),
            GraphStats {
                vertex_count: 6,
                edge_count: 3,
                connected_components: 3,
            }
        );
    }
}
