//! Depth-first traversal and biconnected components.
//!
//! Components are found with the edge-stack formulation of
//! Hopcroft, J.; Tarjan, R.
//! "Algorithm 447: efficient algorithms for graph manipulation".
//! Communications of the ACM. 16 (6): 372–378.
//! [doi:10.1145/362248.362272](https://doi.org/10.1145%2F362248.362272).
//!
//! The search runs on an explicit frame stack, so its depth is not limited
//! by the thread's call stack. All traversal state lives on `DepthFirst`
//! and is dropped when the search finishes.

use crate::error::Result;
use crate::graph::{Graph, VertexIndex};
use crate::vertex::VertexKey;
use indexmap::IndexSet;
use std::cmp::min;
use tracing::{debug, trace};

type KeyEdge = (VertexKey, VertexKey);

/// Returns every edge in depth-first discovery order.
///
/// Roots are taken in vertex insertion order. Each undirected edge appears
/// exactly once, oriented the way it was first traversed.
pub fn walk_depth_first(graph: &Graph) -> Vec<(VertexIndex, VertexIndex)> {
    let search = DepthFirst::run(graph);
    search.order.iter().map(|&e| search.indices(e)).collect()
}

/// Returns the edges of each biconnected component, in the order the
/// components were closed off.
pub fn biconnected_component_edges(graph: &Graph) -> Vec<Vec<(VertexIndex, VertexIndex)>> {
    let search = DepthFirst::run(graph);
    search
        .components
        .iter()
        .map(|component| component.iter().map(|&e| search.indices(e)).collect())
        .collect()
}

/// Returns each biconnected component as an induced subgraph of `graph`.
///
/// Isolated vertices belong to no component.
pub fn biconnected_components(graph: &Graph) -> Result<Vec<Graph>> {
    let components = biconnected_component_edges(graph)
        .into_iter()
        .map(|edges| {
            let touched: IndexSet<VertexIndex> =
                edges.iter().flat_map(|&(a, b)| [a, b]).collect();
            graph.subgraph_with(touched)
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(count = components.len(), "found biconnected components");
    Ok(components)
}

/// Returns the articulation points of `graph`, each once, in the order the
/// search confirmed them.
pub fn articulation_points(graph: &Graph) -> Vec<VertexIndex> {
    let search = DepthFirst::run(graph);
    search
        .articulation
        .iter()
        .map(|&k| graph.index_of(k))
        .collect()
}

struct Frame {
    key: VertexKey,
    /// Position of the next neighbor to examine.
    cursor: usize,
    is_root: bool,
    children: usize,
}

/// State of one depth-first search over a graph.
///
/// Per-vertex data is kept in arrays indexed by arena slot.
struct DepthFirst<'g> {
    graph: &'g Graph,
    time: usize,
    discovery: Vec<Option<usize>>,
    lowpoint: Vec<usize>,
    parent: Vec<Option<VertexKey>>,
    /// Edges of components that are still open.
    stack: Vec<KeyEdge>,
    /// Every traversed edge, tree and back, in order.
    order: Vec<KeyEdge>,
    components: Vec<Vec<KeyEdge>>,
    articulation: IndexSet<VertexKey>,
}

impl<'g> DepthFirst<'g> {
    fn new(graph: &'g Graph) -> Self {
        let n = graph.arena_capacity();
        Self {
            graph,
            time: 0,
            discovery: vec![None; n],
            lowpoint: vec![0; n],
            parent: vec![None; n],
            stack: Vec::new(),
            order: Vec::new(),
            components: Vec::new(),
            articulation: IndexSet::new(),
        }
    }

    /// Searches from every undiscovered vertex in insertion order.
    fn run(graph: &'g Graph) -> Self {
        let mut search = Self::new(graph);
        for root in graph.keys() {
            if search.discovery[root.as_usize()].is_none() {
                search.search_from(root);
                search.flush();
            }
        }
        search
    }

    fn search_from(&mut self, root: VertexKey) {
        self.discover(root);
        let mut frames = vec![Frame {
            key: root,
            cursor: 0,
            is_root: true,
            children: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            let v = frame.key;
            let next = self.graph.vertex(v).neighbor_at(frame.cursor);
            frame.cursor += 1;

            match next {
                Some(w) => match self.discovery[w.as_usize()] {
                    None => {
                        frame.children += 1;
                        self.parent[w.as_usize()] = Some(v);
                        self.push_edge(v, w);
                        self.discover(w);
                        frames.push(Frame {
                            key: w,
                            cursor: 0,
                            is_root: false,
                            children: 0,
                        });
                    }
                    Some(dw) => {
                        if self.parent[v.as_usize()] != Some(w) && dw < self.disc(v) {
                            self.lowpoint[v.as_usize()] = min(self.lowpoint[v.as_usize()], dw);
                            self.push_edge(v, w);
                        }
                    }
                },
                None => {
                    frames.pop();
                    if let Some(up) = frames.last() {
                        self.finish_child(up, v);
                    }
                }
            }
        }
    }

    /// Called when the subtree under `w` is exhausted and control returns
    /// to its parent frame `up`.
    fn finish_child(&mut self, up: &Frame, w: VertexKey) {
        let u = up.key;
        self.lowpoint[u.as_usize()] = min(self.lowpoint[u.as_usize()], self.lowpoint[w.as_usize()]);

        let separates = if up.is_root {
            up.children > 1
        } else {
            self.lowpoint[w.as_usize()] >= self.disc(u)
        };
        if separates {
            self.articulation.insert(u);
            self.close_component((u, w));
        }
    }

    fn discover(&mut self, key: VertexKey) {
        self.time += 1;
        self.discovery[key.as_usize()] = Some(self.time);
        self.lowpoint[key.as_usize()] = self.time;
    }

    fn disc(&self, key: VertexKey) -> usize {
        self.discovery[key.as_usize()].unwrap_or(usize::MAX)
    }

    fn push_edge(&mut self, from: VertexKey, to: VertexKey) {
        trace!(from = ?from, to = ?to, "traverse edge");
        self.stack.push((from, to));
        self.order.push((from, to));
    }

    /// Pops edges down to and including `last` as one component.
    fn close_component(&mut self, last: KeyEdge) {
        let mut component = Vec::new();
        while let Some(edge) = self.stack.pop() {
            component.push(edge);
            if edge == last {
                break;
            }
        }
        component.reverse();
        self.components.push(component);
    }

    /// Whatever is left after a root finishes forms the root's own block.
    fn flush(&mut self) {
        if !self.stack.is_empty() {
            let component = std::mem::take(&mut self.stack);
            self.components.push(component);
        }
    }

    fn indices(&self, (from, to): KeyEdge) -> (VertexIndex, VertexIndex) {
        (self.graph.index_of(from), self.graph.index_of(to))
    }
}

impl Graph {
    /// See [`biconnected_components`].
    pub fn biconnected_components(&self) -> Result<Vec<Graph>> {
        biconnected_components(self)
    }

    /// See [`walk_depth_first`].
    pub fn walk_depth_first(&self) -> Vec<(VertexIndex, VertexIndex)> {
        walk_depth_first(self)
    }

    /// See [`articulation_points`].
    pub fn articulation_points(&self) -> Vec<VertexIndex> {
        articulation_points(self)
    }
}
