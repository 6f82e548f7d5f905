//! The `{vertices, connections}` wire format.
//!
//! Import validates untyped JSON field by field so that a malformed document
//! reports which field is wrong and what value it held, instead of a generic
//! deserialization failure.

use crate::error::NotationError;
use crate::graph::VertexIndex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// A single undirected edge in notation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: VertexIndex,
    pub to: VertexIndex,
}

impl Connection {
    pub fn new(from: VertexIndex, to: VertexIndex) -> Self {
        Self { from, to }
    }

    /// The pair with the smaller index first.
    pub fn canonical(&self) -> (VertexIndex, VertexIndex) {
        if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }
}

impl From<(VertexIndex, VertexIndex)> for Connection {
    fn from((from, to): (VertexIndex, VertexIndex)) -> Self {
        Self { from, to }
    }
}

/// Plain serialization of a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notation {
    pub vertices: Vec<VertexIndex>,
    pub connections: Vec<Connection>,
}

impl Notation {
    /// Parses JSON text and validates it against the notation schema.
    pub fn from_json_str(text: &str) -> Result<Self, NotationError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Validates an untyped JSON value against the notation schema.
    ///
    /// Vertex indices must be unique. Whether connections reference existing
    /// vertices is checked later, when the graph is built.
    pub fn from_value(value: &Value) -> Result<Self, NotationError> {
        let object = value
            .as_object()
            .ok_or_else(|| NotationError::NotAnObject(describe(value)))?;

        let vertices_field = object
            .get("vertices")
            .ok_or(NotationError::MissingField { field: "vertices" })?;
        let connections_field = object
            .get("connections")
            .ok_or(NotationError::MissingField {
                field: "connections",
            })?;

        let raw_vertices = vertices_field
            .as_array()
            .ok_or_else(|| NotationError::NotAnArray {
                field: "vertices",
                value: describe(vertices_field),
            })?;
        let raw_connections =
            connections_field
                .as_array()
                .ok_or_else(|| NotationError::NotAnArray {
                    field: "connections",
                    value: describe(connections_field),
                })?;

        let mut seen = HashSet::with_capacity(raw_vertices.len());
        let mut vertices = Vec::with_capacity(raw_vertices.len());
        for (i, raw) in raw_vertices.iter().enumerate() {
            let index = integer(raw, || format!("vertices[{i}]"))?;
            if !seen.insert(index) {
                return Err(NotationError::DuplicateVertex(index));
            }
            vertices.push(index);
        }

        let mut connections = Vec::with_capacity(raw_connections.len());
        for (i, raw) in raw_connections.iter().enumerate() {
            let entry = raw.as_object().ok_or_else(|| NotationError::NotAnEntry {
                field: "connections",
                value: describe(raw),
            })?;
            let from = entry.get("from").ok_or(NotationError::MissingField { field: "from" })?;
            let to = entry.get("to").ok_or(NotationError::MissingField { field: "to" })?;
            connections.push(Connection {
                from: integer(from, || format!("connections[{i}].from"))?,
                to: integer(to, || format!("connections[{i}].to"))?,
            });
        }

        Ok(Self {
            vertices,
            connections,
        })
    }

    /// Serializes to JSON text.
    pub fn to_json_string(&self, pretty: bool) -> String {
        let result = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        // Plain integers and vectors always serialize.
        result.unwrap_or_default()
    }

    /// Edges as canonical pairs, for order-independent comparison.
    pub fn edge_set(&self) -> HashSet<(VertexIndex, VertexIndex)> {
        self.connections.iter().map(Connection::canonical).collect()
    }

    pub fn vertex_set(&self) -> HashSet<VertexIndex> {
        self.vertices.iter().copied().collect()
    }
}

fn integer(value: &Value, field: impl FnOnce() -> String) -> Result<VertexIndex, NotationError> {
    value.as_i64().ok_or_else(|| NotationError::NotAnInteger {
        field: field(),
        value: describe(value),
    })
}

fn describe(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() > 40 {
        format!("{}...", text.chars().take(37).collect::<String>())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_accepts_sparse_indices() {
        let value = json!({
            "vertices": [10, -3, 42],
            "connections": [{"from": 10, "to": 42}, {"from": -3, "to": 10}]
        });

        let notation = Notation::from_value(&value).unwrap();
        assert_eq!(notation.vertices, vec![10, -3, 42]);
        assert_eq!(
            notation.connections,
            vec![Connection::new(10, 42), Connection::new(-3, 10)]
        );
    }

    #[test]
    fn test_rejects_non_object() {
        let err = Notation::from_value(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, NotationError::NotAnObject(_)));
    }

    #[test]
    fn test_rejects_missing_fields() {
        let err = Notation::from_value(&json!({"vertices": []})).unwrap_err();
        assert!(matches!(
            err,
            NotationError::MissingField {
                field: "connections"
            }
        ));

        let err = Notation::from_value(&json!({
            "vertices": [1, 2],
            "connections": [{"from": 1}]
        }))
        .unwrap_err();
        assert!(matches!(err, NotationError::MissingField { field: "to" }));
    }

    #[test]
    fn test_rejects_non_integer_index() {
        let err = Notation::from_value(&json!({
            "vertices": [0, 1.5],
            "connections": []
        }))
        .unwrap_err();

        match err {
            NotationError::NotAnInteger { field, value } => {
                assert_eq!(field, "vertices[1]");
                assert_eq!(value, "1.5");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = Notation::from_value(&json!({
            "vertices": [0, 1],
            "connections": [{"from": 0, "to": "1"}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("connections[0].to"));
    }

    #[test]
    fn test_rejects_wrong_container_types() {
        let err = Notation::from_value(&json!({
            "vertices": {"0": 0},
            "connections": []
        }))
        .unwrap_err();
        assert!(matches!(err, NotationError::NotAnArray { field: "vertices", .. }));

        let err = Notation::from_value(&json!({
            "vertices": [0],
            "connections": [[0, 1]]
        }))
        .unwrap_err();
        assert!(matches!(err, NotationError::NotAnEntry { .. }));
    }

    #[test]
    fn test_rejects_duplicate_vertex() {
        let err = Notation::from_value(&json!({
            "vertices": [3, 4, 3],
            "connections": []
        }))
        .unwrap_err();
        assert!(matches!(err, NotationError::DuplicateVertex(3)));
    }

    #[test]
    fn test_malformed_text() {
        let err = Notation::from_json_str("{\"vertices\": [").unwrap_err();
        assert!(matches!(err, NotationError::Json(_)));
    }

    #[test]
    fn test_serialized_shape() {
        let notation = Notation {
            vertices: vec![0, 1],
            connections: vec![Connection::new(0, 1)],
        };
        assert_eq!(
            notation.to_json_string(false),
            r#"{"vertices":[0,1],"connections":[{"from":0,"to":1}]}"#
        );
    }
}
