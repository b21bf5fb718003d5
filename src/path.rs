use crate::error::{GraphError, Result};
use crate::graph::{Node, NodeId};

pub type Distance = u64;

/// Distance of a node the search never reached.
pub const UNREACHABLE: Distance = Distance::MAX;

/// Predecessor of the start node and of nodes the search never reached.
pub const NO_PREDECESSOR: NodeId = NodeId::MAX;

/// Distances and shortest-path tree of one query.
///
/// Borrows the node array of the graph it was computed on; the search scratch
/// state is gone by the time this is handed out.
#[derive(Debug, Clone)]
pub struct PathResult<'g> {
    nodes: &'g [Node],
    start: NodeId,
    target: Option<NodeId>,
    distance: Vec<Distance>,
    predecessor: Vec<NodeId>,
}

impl<'g> PathResult<'g> {
    pub(crate) fn new(
        nodes: &'g [Node],
        start: NodeId,
        target: Option<NodeId>,
        distance: Vec<Distance>,
        predecessor: Vec<NodeId>,
    ) -> Self {
        debug_assert_eq!(distance.len(), nodes.len());
        debug_assert_eq!(predecessor.len(), nodes.len());
        Self {
            nodes,
            start,
            target,
            distance,
            predecessor,
        }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Target of a point-to-point query, `None` for one-to-all.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Raw distances, [`UNREACHABLE`] where no path was found.
    pub fn distances(&self) -> &[Distance] {
        &self.distance
    }

    /// Raw predecessors, [`NO_PREDECESSOR`] for the start and unreached nodes.
    pub fn predecessors(&self) -> &[NodeId] {
        &self.predecessor
    }

    pub fn reachable_count(&self) -> usize {
        self.distance.iter().filter(|&&d| d != UNREACHABLE).count()
    }

    /// `None` when `id` is unreachable from the start.
    pub fn distance_to(&self, id: NodeId) -> Result<Option<Distance>> {
        self.check(id)?;
        let d = self.distance[id];
        Ok((d != UNREACHABLE).then_some(d))
    }

    /// Nodes from `id` back to the start. An unreachable node yields just itself.
    pub fn path_backwards(&self, id: NodeId) -> Result<Vec<&'g Node>> {
        self.check(id)?;
        Ok(self.walk(id).collect())
    }

    /// Nodes from the start to `id`.
    pub fn path_forwards(&self, id: NodeId) -> Result<Vec<&'g Node>> {
        let mut path = self.path_backwards(id)?;
        path.reverse();
        Ok(path)
    }

    /// `(latitude, longitude)` of each node from `id` back to the start.
    pub fn path_as_coordinates_backwards(&self, id: NodeId) -> Result<Vec<(f64, f64)>> {
        self.check(id)?;
        Ok(self
            .walk(id)
            .map(|node| (node.position.latitude, node.position.longitude))
            .collect())
    }

    fn walk(&self, id: NodeId) -> impl Iterator<Item = &'g Node> + '_ {
        let nodes = self.nodes;
        std::iter::successors(Some(id), move |&current| {
            let previous = self.predecessor[current];
            (previous != NO_PREDECESSOR).then_some(previous)
        })
        .map(move |current| &nodes[current])
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::InvalidNode {
                id,
                node_count: self.nodes.len(),
            })
        }
    }
}
