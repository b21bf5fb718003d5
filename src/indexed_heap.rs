/*
Binary min-heap over a dense id universe 0..n with a position index.

Ordering is read through a comparator over ids rather than stored keys, so the
caller keeps ownership of the key array and lowers keys in place; it then calls
decrease_key(id) to restore heap order from the id's current slot.

insert / poll / decrease_key: O(log n). contains / peek: O(1). Space: O(n).
*/

use std::cell::Cell;
use std::cmp::Ordering;

use crate::graph::NodeId;

// Slot 0 is padding, so a position of 0 means "not queued".
const ABSENT: usize = 0;

/// Comparator ordering ids by their current key, ties broken by ascending id.
pub fn by_key_then_id<K: Copy + Ord>(keys: &[Cell<K>]) -> impl Fn(NodeId, NodeId) -> Ordering + '_ {
    move |a, b| keys[a].get().cmp(&keys[b].get()).then(a.cmp(&b))
}

#[derive(Debug)]
pub struct IndexedMinHeap<C> {
    slots: Vec<NodeId>,
    position: Vec<usize>,
    compare: C,
}

impl<C> IndexedMinHeap<C>
where
    C: Fn(NodeId, NodeId) -> Ordering,
{
    /// Empty heap able to hold ids `0..universe`.
    pub fn new(universe: usize, compare: C) -> Self {
        let mut slots = Vec::with_capacity(universe + 1);
        slots.push(ABSENT);
        Self {
            slots,
            position: vec![ABSENT; universe],
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.position.get(id).is_some_and(|&slot| slot != ABSENT)
    }

    pub fn insert(&mut self, id: NodeId) {
        assert!(!self.contains(id), "node {} is already queued", id);
        self.slots.push(id);
        let slot = self.len();
        self.position[id] = slot;
        self.sift_up(slot);
    }

    /// Id with the smallest key. The heap must not be empty.
    pub fn peek(&self) -> NodeId {
        assert!(!self.is_empty(), "peek on empty heap");
        self.slots[1]
    }

    /// Remove and return the id with the smallest key. The heap must not be empty.
    pub fn poll(&mut self) -> NodeId {
        assert!(!self.is_empty(), "poll on empty heap");
        let root = self.slots[1];
        let last = self.len();
        self.slots.swap(1, last);
        self.slots.truncate(last);
        self.position[root] = ABSENT;
        if !self.is_empty() {
            self.position[self.slots[1]] = 1;
            self.sift_down(1);
        }
        root
    }

    /// Restore order after the key of `id` was lowered by the caller.
    /// Raising a key is not supported.
    pub fn decrease_key(&mut self, id: NodeId) {
        assert!(self.contains(id), "decrease_key on node {} not in heap", id);
        self.sift_up(self.position[id]);
    }

    fn less(&self, a: NodeId, b: NodeId) -> bool {
        (self.compare)(a, b) == Ordering::Less
    }

    fn place(&mut self, slot: usize, id: NodeId) {
        self.slots[slot] = id;
        self.position[id] = slot;
    }

    fn sift_up(&mut self, mut slot: usize) {
        let id = self.slots[slot];
        while slot > 1 {
            let parent = slot / 2;
            let parent_id = self.slots[parent];
            if !self.less(id, parent_id) {
                break;
            }
            self.place(slot, parent_id);
            slot = parent;
        }
        self.place(slot, id);
    }

    fn sift_down(&mut self, mut slot: usize) {
        let id = self.slots[slot];
        let len = self.len();
        loop {
            let left = 2 * slot;
            if left > len {
                break;
            }
            let right = left + 1;
            let child = if right <= len && self.less(self.slots[right], self.slots[left]) {
                right
            } else {
                left
            };
            let child_id = self.slots[child];
            if !self.less(child_id, id) {
                break;
            }
            self.place(slot, child_id);
            slot = child;
        }
        self.place(slot, id);
    }
}
