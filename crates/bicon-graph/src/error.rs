//! Error types for graph mutation, queries and notation import.

use crate::graph::VertexIndex;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("vertex {0} does not exist")]
    VertexNotFound(VertexIndex),

    #[error("vertex {0} already exists")]
    VertexAlreadyExists(VertexIndex),

    #[error("edge ({from}, {to}) already exists")]
    EdgeAlreadyExists { from: VertexIndex, to: VertexIndex },

    #[error("edge ({from}, {to}) does not exist")]
    EdgeNotFound { from: VertexIndex, to: VertexIndex },

    #[error("self-loop on vertex {0} is not allowed")]
    SelfLoop(VertexIndex),

    #[error("duplicate connection between vertices")]
    DuplicateConnection,

    #[error("connection between vertices is missing")]
    ConnectionMissing,

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error("unable to import graph notation due to type")]
    Import {
        #[source]
        source: Box<GraphError>,
    },
}

impl GraphError {
    /// Wraps any failure raised while building a graph from notation.
    pub(crate) fn import(source: GraphError) -> Self {
        GraphError::Import {
            source: Box::new(source),
        }
    }
}

/// Schema violations found while reading the `{vertices, connections}` notation.
#[derive(Error, Debug)]
pub enum NotationError {
    #[error("notation must be an object, got {0}")]
    NotAnObject(String),

    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` must be an array, got {value}")]
    NotAnArray { field: &'static str, value: String },

    #[error("field `{field}` must be an object, got {value}")]
    NotAnEntry { field: &'static str, value: String },

    #[error("field `{field}` must be an integer, got {value}")]
    NotAnInteger { field: String, value: String },

    #[error("vertex {0} is listed more than once")]
    DuplicateVertex(VertexIndex),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_import_keeps_cause() {
        let err = GraphError::import(GraphError::VertexNotFound(7));

        assert!(err.to_string().starts_with("unable to import"));
        let cause = err.source().unwrap();
        assert_eq!(cause.to_string(), "vertex 7 does not exist");
    }

    #[test]
    fn test_notation_error_is_transparent() {
        let err: GraphError = NotationError::MissingField { field: "vertices" }.into();
        assert_eq!(err.to_string(), "missing field `vertices`");
    }
}
