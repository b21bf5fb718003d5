//! Brute-force nearest node search by great-circle distance.

use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::error::{GraphError, Result};
use crate::geo::Position;
use crate::graph::{GraphStore, Node};

/// Linear scan over all nodes, sharded across the rayon pool.
#[derive(Debug, Clone, Copy)]
pub struct NearestNodeIndex<'g> {
    nodes: &'g [Node],
}

impl<'g> NearestNodeIndex<'g> {
    pub fn new(graph: &'g GraphStore) -> Self {
        Self {
            nodes: graph.nodes(),
        }
    }

    /// Node closest to `target`; on equal distance the lowest id wins, so
    /// the answer does not depend on how the scan was split.
    pub fn find_nearest(&self, target: Position) -> Result<&'g Node> {
        if !target.is_finite() {
            return Err(GraphError::InvalidPosition {
                latitude: target.latitude,
                longitude: target.longitude,
            });
        }
        let (distance, id) = self
            .nodes
            .par_iter()
            .map(|node| (OrderedFloat(node.position.distance(&target)), node.id))
            .min()
            .ok_or(GraphError::EmptyGraph)?;
        tracing::debug!(
            latitude = target.latitude,
            longitude = target.longitude,
            id,
            distance = distance.0,
            "nearest node"
        );
        Ok(&self.nodes[id])
    }
}
