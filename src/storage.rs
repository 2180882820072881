//! Arena storage for heap nodes
//!
//! Every node of a [`FibonacciHeap`](crate::FibonacciHeap) lives in one
//! [`NodeArena`], a `slotmap` keyed by [`NodeKey`]. The tree and sibling
//! relations are plain key fields on [`Node`], so the arena is the only owner
//! of node memory and a parent reference can never keep a node alive.
//!
//! # Characteristics
//! - Contiguous node storage (better cache locality than one box per node)
//! - Generational keys: a key of a removed node never aliases a newer node
//! - Keys are arena-local; moving nodes between arenas rewrites them
//!   (see [`NodeArena::absorb`])

use std::ops::{Index, IndexMut};

use index_ring::{Direction, Ring, RingLinks, RingOps};
use slotmap::{new_key_type, SecondaryMap, SlotMap};

new_key_type! {
    /// Stable handle of a node inside its arena
    pub(crate) struct NodeKey;
}

/// A heap node.
///
/// `left`/`right` are siblings in whichever ring the node belongs to, the root
/// list or its parent's child list. A detached node is a ring of one.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    /// Number of nodes in the child ring
    pub(crate) degree: usize,
    /// Back-reference only; never used to reach a node that is not otherwise
    /// reachable from the root list.
    pub(crate) parent: Option<NodeKey>,
    /// Entry point into the child ring
    pub(crate) child: Option<NodeKey>,
    pub(crate) left: NodeKey,
    pub(crate) right: NodeKey,
}

/// Owner of all nodes of one heap
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T> NodeArena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Stores `value` in a fresh, detached singleton node.
    pub(crate) fn insert_detached(&mut self, value: T) -> NodeKey {
        self.nodes.insert_with_key(|key| Node {
            value,
            degree: 0,
            parent: None,
            child: None,
            left: key,
            right: key,
        })
    }

    /// Removes a node from the arena and returns it.
    ///
    /// The caller must already have unlinked it from every ring; its own link
    /// fields are discarded with it.
    ///
    /// # Panics
    /// Panics if `key` does not name a live node, which means the heap
    /// structure is corrupted.
    pub(crate) fn take(&mut self, key: NodeKey) -> Node<T> {
        match self.nodes.remove(key) {
            Some(node) => node,
            None => panic!("stale node key {key:?}"),
        }
    }

    pub(crate) fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Values of every stored node, in arena order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.nodes.values().map(|node| &node.value)
    }

    /// One lap around the ring containing `start`, in `right` order.
    #[inline]
    pub(crate) fn ring(&self, start: NodeKey) -> Ring<'_, Self, NodeKey> {
        RingOps.iter(self, start, Direction::Next)
    }

    /// Moves every node of `other` into this arena.
    ///
    /// Node keys are only meaningful inside their own arena, so each moved
    /// node gets a new key here and its `parent`/`child`/`left`/`right` fields
    /// are rewritten. The returned map translates `other`'s keys to the new
    /// ones. O(`other.len()`).
    pub(crate) fn absorb(&mut self, other: NodeArena<T>) -> SecondaryMap<NodeKey, NodeKey> {
        let mut remap = SecondaryMap::with_capacity(other.len());
        let mut moved = Vec::with_capacity(other.len());

        self.nodes.reserve(other.len());
        for (old, node) in other.nodes {
            let new = self.nodes.insert(node);
            remap.insert(old, new);
            moved.push(new);
        }

        for key in moved {
            let node = &mut self.nodes[key];
            node.left = remap[node.left];
            node.right = remap[node.right];
            node.parent = node.parent.map(|parent| remap[parent]);
            node.child = node.child.map(|child| remap[child]);
        }

        remap
    }
}

impl<T> Index<NodeKey> for NodeArena<T> {
    type Output = Node<T>;

    #[inline]
    fn index(&self, key: NodeKey) -> &Node<T> {
        &self.nodes[key]
    }
}

impl<T> IndexMut<NodeKey> for NodeArena<T> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut Node<T> {
        &mut self.nodes[key]
    }
}

impl<T> RingLinks<NodeKey> for NodeArena<T> {
    #[inline]
    fn next(&self, k: NodeKey) -> NodeKey {
        self.nodes[k].right
    }

    #[inline]
    fn prev(&self, k: NodeKey) -> NodeKey {
        self.nodes[k].left
    }

    #[inline]
    fn set_next(&mut self, k: NodeKey, next: NodeKey) {
        self.nodes[k].right = next;
    }

    #[inline]
    fn set_prev(&mut self, k: NodeKey, prev: NodeKey) {
        self.nodes[k].left = prev;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_values<T: Copy>(arena: &NodeArena<T>, start: NodeKey) -> Vec<T> {
        arena.ring(start).map(|k| arena[k].value).collect()
    }

    #[test]
    fn test_insert_detached_is_singleton() {
        let mut arena = NodeArena::default();
        let key = arena.insert_detached(42);

        assert_eq!(arena.len(), 1);
        assert_eq!(arena[key].left, key);
        assert_eq!(arena[key].right, key);
        assert_eq!(arena[key].degree, 0);
        assert!(arena[key].parent.is_none());
        assert!(arena[key].child.is_none());
        assert_eq!(ring_values(&arena, key), vec![42]);
    }

    #[test]
    fn test_take_removes_node() {
        let mut arena = NodeArena::default();
        let key = arena.insert_detached("a");
        let other = arena.insert_detached("b");

        let node = arena.take(key);
        assert_eq!(node.value, "a");
        assert!(!arena.contains(key));
        assert!(arena.contains(other));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    #[should_panic(expected = "stale node key")]
    fn test_take_twice_panics() {
        let mut arena = NodeArena::default();
        let key = arena.insert_detached(1);
        arena.take(key);
        arena.take(key);
    }

    #[test]
    fn test_absorb_rewrites_links() {
        let mut left = NodeArena::default();
        let a = left.insert_detached(1);
        let b = left.insert_detached(2);
        RingOps.insert_after(&mut left, a, b);

        let mut right = NodeArena::default();
        let parent = right.insert_detached(10);
        let child = right.insert_detached(20);
        let sibling = right.insert_detached(30);
        RingOps.insert_after(&mut right, parent, sibling);
        right[parent].child = Some(child);
        right[parent].degree = 1;
        right[child].parent = Some(parent);

        let remap = left.absorb(right);
        assert_eq!(left.len(), 5);

        let parent = remap[parent];
        let child = remap[child];
        let sibling = remap[sibling];

        assert_eq!(ring_values(&left, a), vec![1, 2]);
        assert_eq!(ring_values(&left, parent), vec![10, 30]);
        assert_eq!(left[parent].child, Some(child));
        assert_eq!(left[child].parent, Some(parent));
        assert_eq!(left[sibling].left, parent);
        assert_eq!(ring_values(&left, child), vec![20]);
    }

    #[test]
    fn test_values_and_clear() {
        let mut arena = NodeArena::with_capacity(4);
        for v in [3, 1, 2] {
            arena.insert_detached(v);
        }

        let mut values: Vec<_> = arena.values().copied().collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3]);

        arena.clear();
        assert_eq!(arena.len(), 0);
    }
}
