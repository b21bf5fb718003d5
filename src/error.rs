use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Errors surfaced by graph loading and the query engine.
///
/// An unreachable target is never an error: it is reported through
/// [`crate::path::PathResult::distance_to`] returning `None`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or truncated graph file. `line` is 1-based.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("node {id} out of range (graph has {node_count} nodes)")]
    InvalidNode { id: NodeId, node_count: usize },

    #[error("invalid position ({latitude}, {longitude})")]
    InvalidPosition { latitude: f64, longitude: f64 },

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("query cancelled")]
    Cancelled,

    #[error("query deadline exceeded")]
    DeadlineExceeded,

    /// Malformed line in a batch query file. `line` is 1-based.
    #[error("challenge line {line}: {message}")]
    Challenge { line: usize, message: String },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}

impl GraphError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        GraphError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
