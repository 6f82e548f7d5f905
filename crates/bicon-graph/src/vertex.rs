//! Vertex storage.
//!
//! Vertices carry no payload beyond their neighbor set. They live in a dense
//! arena owned by the [`Graph`](crate::Graph) and refer to each other by
//! [`VertexKey`] slots, never by the caller-visible index.

use crate::error::{GraphError, Result};
use indexmap::IndexSet;

/// Slot of a vertex inside the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey(usize);

impl VertexKey {
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

/// A graph node holding the set of its neighbors.
///
/// The neighbor set is insertion ordered so traversals are reproducible
/// for the same sequence of edge insertions.
#[derive(Debug, Clone, Default)]
pub struct Vertex {
    neighbors: IndexSet<VertexKey>,
}

impl Vertex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `other` is in this vertex's neighbor set.
    pub fn is_neighbor(&self, other: VertexKey) -> bool {
        self.neighbors.contains(&other)
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Iterates neighbors in the order they were connected.
    pub fn neighbors(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.neighbors.iter().copied()
    }

    /// Neighbor at position `i` in connection order.
    pub(crate) fn neighbor_at(&self, i: usize) -> Option<VertexKey> {
        self.neighbors.get_index(i).copied()
    }
}

/// Dense vertex storage with slot reuse.
#[derive(Debug, Clone, Default)]
pub(crate) struct VertexArena {
    slots: Vec<Option<Vertex>>,
    free: Vec<usize>,
}

impl VertexArena {
    /// Number of slots, live or free. Parallel per-vertex arrays use this length.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn insert(&mut self, vertex: Vertex) -> VertexKey {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(vertex);
                VertexKey(slot)
            }
            None => {
                self.slots.push(Some(vertex));
                VertexKey(self.slots.len() - 1)
            }
        }
    }

    /// Frees the slot. The vertex must already be disconnected.
    pub fn remove(&mut self, key: VertexKey) -> Option<Vertex> {
        let vertex = self.slots.get_mut(key.0)?.take()?;
        debug_assert_eq!(vertex.degree(), 0, "removed vertex still has edges");
        self.free.push(key.0);
        Some(vertex)
    }

    pub fn get(&self, key: VertexKey) -> Option<&Vertex> {
        self.slots.get(key.0)?.as_ref()
    }

    fn get_mut(&mut self, key: VertexKey) -> Option<&mut Vertex> {
        self.slots.get_mut(key.0)?.as_mut()
    }

    /// Adds each vertex to the other's neighbor set.
    ///
    /// Fails with [`GraphError::DuplicateConnection`] if either side already
    /// lists the other; nothing is modified in that case.
    pub fn connect(&mut self, a: VertexKey, b: VertexKey) -> Result<()> {
        if a == b {
            return Err(GraphError::DuplicateConnection);
        }
        let (va, vb) = self.pair(a, b)?;
        if va.is_neighbor(b) || vb.is_neighbor(a) {
            return Err(GraphError::DuplicateConnection);
        }
        va.neighbors.insert(b);
        vb.neighbors.insert(a);
        Ok(())
    }

    /// Removes the mutual reference between two vertices.
    pub fn disconnect(&mut self, a: VertexKey, b: VertexKey) -> Result<()> {
        if a == b {
            return Err(GraphError::ConnectionMissing);
        }
        let (va, vb) = self.pair(a, b)?;
        if !va.is_neighbor(b) || !vb.is_neighbor(a) {
            return Err(GraphError::ConnectionMissing);
        }
        va.neighbors.shift_remove(&b);
        vb.neighbors.shift_remove(&a);
        Ok(())
    }

    /// Mutable access to two distinct live vertices.
    fn pair(&mut self, a: VertexKey, b: VertexKey) -> Result<(&mut Vertex, &mut Vertex)> {
        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        if hi >= self.slots.len() {
            return Err(GraphError::ConnectionMissing);
        }
        let (head, tail) = self.slots.split_at_mut(hi);
        let (Some(l), Some(h)) = (head[lo].as_mut(), tail[0].as_mut()) else {
            return Err(GraphError::ConnectionMissing);
        };
        Ok(if a.0 < b.0 { (l, h) } else { (h, l) })
    }

    /// Disconnects `key` from every neighbor and returns the former neighbors.
    pub fn isolate(&mut self, key: VertexKey) -> Vec<VertexKey> {
        let former: Vec<VertexKey> = match self.get(key) {
            Some(v) => v.neighbors().collect(),
            None => return Vec::new(),
        };
        for &other in &former {
            if let Some(v) = self.get_mut(other) {
                v.neighbors.shift_remove(&key);
            }
        }
        if let Some(v) = self.get_mut(key) {
            v.neighbors.clear();
        }
        former
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_is_symmetric() {
        let mut arena = VertexArena::default();
        let a = arena.insert(Vertex::new());
        let b = arena.insert(Vertex::new());

        arena.connect(a, b).unwrap();

        assert!(arena.get(a).unwrap().is_neighbor(b));
        assert!(arena.get(b).unwrap().is_neighbor(a));
        assert_eq!(arena.get(a).unwrap().degree(), 1);
    }

    #[test]
    fn test_duplicate_connection_rejected() {
        let mut arena = VertexArena::default();
        let a = arena.insert(Vertex::new());
        let b = arena.insert(Vertex::new());

        arena.connect(a, b).unwrap();
        assert!(matches!(
            arena.connect(b, a),
            Err(GraphError::DuplicateConnection)
        ));
        assert!(matches!(
            arena.connect(a, a),
            Err(GraphError::DuplicateConnection)
        ));
    }

    #[test]
    fn test_disconnect_missing() {
        let mut arena = VertexArena::default();
        let a = arena.insert(Vertex::new());
        let b = arena.insert(Vertex::new());

        assert!(matches!(
            arena.disconnect(a, b),
            Err(GraphError::ConnectionMissing)
        ));

        arena.connect(a, b).unwrap();
        arena.disconnect(b, a).unwrap();
        assert_eq!(arena.get(a).unwrap().degree(), 0);
        assert_eq!(arena.get(b).unwrap().degree(), 0);
    }

    #[test]
    fn test_neighbor_order_survives_removal() {
        let mut arena = VertexArena::default();
        let hub = arena.insert(Vertex::new());
        let keys: Vec<_> = (0..4).map(|_| arena.insert(Vertex::new())).collect();
        for &k in &keys {
            arena.connect(hub, k).unwrap();
        }

        arena.disconnect(hub, keys[1]).unwrap();

        let order: Vec<_> = arena.get(hub).unwrap().neighbors().collect();
        assert_eq!(order, vec![keys[0], keys[2], keys[3]]);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut arena = VertexArena::default();
        let a = arena.insert(Vertex::new());
        let b = arena.insert(Vertex::new());
        arena.connect(a, b).unwrap();

        assert_eq!(arena.isolate(a), vec![b]);
        arena.remove(a).unwrap();
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b).unwrap().degree(), 0);

        let c = arena.insert(Vertex::new());
        assert_eq!(c, a);
        assert_eq!(arena.capacity(), 2);
    }
}
