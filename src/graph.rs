//! Immutable road graph in a compressed-sparse-row layout.
//!
//! Edges live in one array sorted by source id. Every node records the index
//! of its first outgoing edge, and the rest of its run follows contiguously.
//! The sort order is taken on trust from the input file: an edge that appears
//! outside its source's run is never visited.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{GraphError, Result};
use crate::geo::Position;

pub type NodeId = usize;
pub type Weight = u32;

/// Offset value of a node without outgoing edges.
pub const NO_EDGES: usize = usize::MAX;

/// Lines starting with this marker are skipped by the loader.
pub const COMMENT_MARKER: char = '#';

// Upper bound on up-front allocation; a bogus header count should fail as
// truncated input, not abort on allocation.
const PREALLOC_LIMIT: usize = 1 << 24;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    offset: usize,
}

impl Node {
    /// Index into the edge array of the first outgoing edge.
    pub fn adjacency_offset(&self) -> Option<usize> {
        (self.offset != NO_EDGES).then_some(self.offset)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: Weight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    NodeCount,
    EdgeCount,
    Nodes,
    Edges,
    Done,
}

#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    /// Load a graph file. Any malformed or missing record aborts the load.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file), path)
    }

    /// Same as [`GraphStore::load`] for an already opened source.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::parse(reader, Path::new("<reader>"))
    }

    fn parse<R: BufRead>(reader: R, origin: &Path) -> Result<Self> {
        let mut section = Section::NodeCount;
        let mut num_nodes = 0usize;
        let mut num_edges = 0usize;
        let mut nodes: Vec<Node> = Vec::new();
        let mut edges: Vec<Edge> = Vec::new();
        let mut line_no = 0usize;

        for line in reader.lines() {
            line_no += 1;
            let line = line.map_err(|source| GraphError::Io {
                path: origin.to_path_buf(),
                source,
            })?;
            let record = line.trim();
            if record.is_empty() || record.starts_with(COMMENT_MARKER) {
                continue;
            }

            match section {
                Section::NodeCount => {
                    num_nodes = parse_field(record, "node count", line_no)?;
                    nodes.reserve_exact(num_nodes.min(PREALLOC_LIMIT));
                    section = Section::EdgeCount;
                }
                Section::EdgeCount => {
                    num_edges = parse_field(record, "edge count", line_no)?;
                    edges.reserve_exact(num_edges.min(PREALLOC_LIMIT));
                    section = if num_nodes > 0 {
                        Section::Nodes
                    } else if num_edges > 0 {
                        Section::Edges
                    } else {
                        Section::Done
                    };
                }
                Section::Nodes => {
                    // <id> <osm id> <lat> <long> [<elevation> ...]
                    let mut fields = record.split_whitespace();
                    let (lat, lon) = match (fields.nth(2), fields.next()) {
                        (Some(lat), Some(lon)) => (lat, lon),
                        _ => {
                            return Err(GraphError::parse(
                                line_no,
                                "node record needs at least 4 fields",
                            ))
                        }
                    };
                    let position = Position::new(
                        parse_field(lat, "latitude", line_no)?,
                        parse_field(lon, "longitude", line_no)?,
                    );
                    nodes.push(Node {
                        id: nodes.len(),
                        position,
                        offset: NO_EDGES,
                    });
                    if nodes.len() == num_nodes {
                        section = if num_edges > 0 {
                            Section::Edges
                        } else {
                            Section::Done
                        };
                    }
                }
                Section::Edges => {
                    let mut fields = record.split_whitespace();
                    let (source, target, weight) =
                        match (fields.next(), fields.next(), fields.next()) {
                            (Some(s), Some(t), Some(w)) => (s, t, w),
                            _ => {
                                return Err(GraphError::parse(
                                    line_no,
                                    "edge record needs 3 fields",
                                ))
                            }
                        };
                    let edge = Edge {
                        source: parse_field(source, "edge source", line_no)?,
                        target: parse_field(target, "edge target", line_no)?,
                        weight: parse_field(weight, "edge weight", line_no)?,
                    };
                    for endpoint in [edge.source, edge.target] {
                        if endpoint >= num_nodes {
                            return Err(GraphError::parse(
                                line_no,
                                format!("edge endpoint {endpoint} not below {num_nodes}"),
                            ));
                        }
                    }
                    // Only the first edge of a source opens its run.
                    let node = &mut nodes[edge.source];
                    if node.offset == NO_EDGES {
                        node.offset = edges.len();
                    }
                    edges.push(edge);
                    if edges.len() == num_edges {
                        section = Section::Done;
                    }
                }
                Section::Done => {
                    return Err(GraphError::parse(
                        line_no,
                        format!("unexpected record after {num_edges} edges"),
                    ));
                }
            }
        }

        let missing = match section {
            Section::Done => None,
            Section::NodeCount => Some("missing node count".to_string()),
            Section::EdgeCount => Some("missing edge count".to_string()),
            Section::Nodes => Some(format!(
                "truncated: expected {num_nodes} nodes, found {}",
                nodes.len()
            )),
            Section::Edges => Some(format!(
                "truncated: expected {num_edges} edges, found {}",
                edges.len()
            )),
        };
        if let Some(message) = missing {
            return Err(GraphError::parse(line_no + 1, message));
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            "graph parsed"
        );
        Ok(Self { nodes, edges })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(GraphError::InvalidNode {
            id,
            node_count: self.nodes.len(),
        })
    }

    pub(crate) fn check_node(&self, id: NodeId) -> Result<()> {
        self.node(id).map(|_| ())
    }

    /// Outgoing edges of `id`: the run starting at its offset, up to the first
    /// edge with a different source. Panics if `id` is out of range.
    pub fn edges_from(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        let start = self.nodes[id].adjacency_offset().unwrap_or(self.edges.len());
        self.edges[start..]
            .iter()
            .take_while(move |edge| edge.source == id)
    }
}

fn parse_field<T: FromStr>(field: &str, what: &str, line: usize) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    field
        .parse()
        .map_err(|e| GraphError::parse(line, format!("bad {what} {field:?}: {e}")))
}
