//! Shortest paths on a static road graph.
//!
//! A [`GraphStore`] is loaded once from a text file and then only read.
//! [`ShortestPathEngine`] runs Dijkstra on it, one-to-all or with early exit
//! at a target, and returns a [`PathResult`] for distance lookups and route
//! reconstruction. [`NearestNodeIndex`] snaps a coordinate to the closest node.
//!
//! ```no_run
//! use routegraph::{GraphStore, NearestNodeIndex, Position, ShortestPathEngine};
//!
//! # fn main() -> routegraph::Result<()> {
//! let graph = GraphStore::load("germany.fmi")?;
//! let nearest = NearestNodeIndex::new(&graph);
//! let from = nearest.find_nearest(Position::new(48.78, 9.18))?.id;
//! let to = nearest.find_nearest(Position::new(52.52, 13.40))?.id;
//! let result = ShortestPathEngine::new(&graph).point_to_point(from, to)?;
//! println!("{:?}", result.distance_to(to)?);
//! # Ok(())
//! # }
//! ```

pub mod challenge;
pub mod dijkstra;
pub mod error;
pub mod geo;
pub mod graph;
pub mod indexed_heap;
pub mod nearest;
pub mod path;

pub use challenge::{run_challenge, run_challenge_files, ChallengeMode, ChallengeSummary};
pub use dijkstra::{SearchLimits, ShortestPathEngine};
pub use error::{GraphError, Result};
pub use geo::Position;
pub use graph::{Edge, GraphStore, Node, NodeId, Weight};
pub use indexed_heap::IndexedMinHeap;
pub use nearest::NearestNodeIndex;
pub use path::{Distance, PathResult, NO_PREDECESSOR, UNREACHABLE};
