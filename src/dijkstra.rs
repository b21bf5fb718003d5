use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::error::{GraphError, Result};
use crate::graph::{GraphStore, NodeId};
use crate::indexed_heap::{by_key_then_id, IndexedMinHeap};
use crate::path::{Distance, PathResult, NO_PREDECESSOR, UNREACHABLE};

/// Optional stop conditions checked before every heap pop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits<'a> {
    pub cancel: Option<&'a AtomicBool>,
    pub deadline: Option<Instant>,
}

impl<'a> SearchLimits<'a> {
    pub fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn check(&self) -> Result<()> {
        if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(GraphError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(GraphError::DeadlineExceeded);
        }
        Ok(())
    }
}

/// Dijkstra over a loaded graph. Holds no per-query state, so one engine can
/// serve any number of threads at once.
#[derive(Debug, Clone, Copy)]
pub struct ShortestPathEngine<'g> {
    graph: &'g GraphStore,
}

impl<'g> ShortestPathEngine<'g> {
    pub fn new(graph: &'g GraphStore) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g GraphStore {
        self.graph
    }

    /// Dijkstra from `start` to all nodes.
    pub fn one_to_all(&self, start: NodeId) -> Result<PathResult<'g>> {
        self.query(start, None)
    }

    /// Dijkstra from `start`, stopping once `target` is settled.
    pub fn point_to_point(&self, start: NodeId, target: NodeId) -> Result<PathResult<'g>> {
        self.query(start, Some(target))
    }

    pub fn query(&self, start: NodeId, target: Option<NodeId>) -> Result<PathResult<'g>> {
        self.query_with_limits(start, target, SearchLimits::default())
    }

    pub fn query_with_limits(
        &self,
        start: NodeId,
        target: Option<NodeId>,
        limits: SearchLimits<'_>,
    ) -> Result<PathResult<'g>> {
        self.graph.check_node(start)?;
        if let Some(target) = target {
            self.graph.check_node(target)?;
        }

        let n = self.graph.node_count();
        let mut distance: Vec<Distance> = vec![UNREACHABLE; n];
        let mut predecessor: Vec<NodeId> = vec![NO_PREDECESSOR; n];
        let mut settled = 0usize;

        {
            // The heap reads keys through these cells while the loop lowers them.
            let keys = Cell::from_mut(distance.as_mut_slice()).as_slice_of_cells();
            let mut heap = IndexedMinHeap::new(n, by_key_then_id(keys));

            keys[start].set(0);
            heap.insert(start);

            while !heap.is_empty() {
                limits.check()?;
                // Nodes leave the heap in non-decreasing distance order, so the
                // target's distance is final once it is the minimum.
                if target == Some(heap.peek()) {
                    break;
                }
                let node_id = heap.poll();
                settled += 1;

                let cost = keys[node_id].get();
                if cost == UNREACHABLE {
                    continue;
                }
                for edge in self.graph.edges_from(node_id) {
                    let next = edge.target;
                    let next_cost = cost + Distance::from(edge.weight);
                    if next_cost < keys[next].get() {
                        keys[next].set(next_cost);
                        predecessor[next] = node_id;
                        if heap.contains(next) {
                            heap.decrease_key(next);
                        } else {
                            heap.insert(next);
                        }
                    }
                }
            }
        }

        tracing::debug!(start, ?target, settled, "dijkstra finished");
        Ok(PathResult::new(
            self.graph.nodes(),
            start,
            target,
            distance,
            predecessor,
        ))
    }
}
