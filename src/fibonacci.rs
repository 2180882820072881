//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert and find-min
//! - O(log n) amortized extract-min
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list, and so are the children of every node. The
//! heap maintains a reference to the root holding the minimum value.
//!
//! Nodes live in a slot-map arena owned by the heap; every link between them
//! is a key, and all ring manipulation goes through [`index_ring`].
//!
//! # Tie-breaking
//!
//! Equal values are never reordered arbitrarily:
//! - building from a sequence, the first smallest value becomes the minimum
//! - `insert` keeps the current minimum when the new value is equal to it
//! - `merge` keeps the receiver's minimum when both minimums are equal
//! - consolidation keeps the root already waiting in the degree table as the
//!   parent unless the newly visited root is strictly smaller
//! - after consolidation the first smallest root, walking right from the root
//!   reference, becomes the minimum

use std::fmt;
use std::iter::FusedIterator;

use index_ring::RingOps;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::storage::{NodeArena, NodeKey};
use crate::traits::{Entry, Heap, HeapError, InvariantViolation};

/// Degree table kept inline for every heap below 2^31 nodes.
type DegreeTable = SmallVec<[Option<NodeKey>; 64]>;

/// Fibonacci Heap
///
/// A min-heap over any totally ordered `T`. Pair a key with associated data
/// through [`Entry`], which also gives access to the [`Heap`] trait.
///
/// # Example
///
/// ```rust
/// use arena_fibheap::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.insert(0);
/// heap.insert(-12);
/// heap.insert(88);
///
/// assert_eq!(heap.find_min(), Ok(&-12));
/// assert_eq!(heap.extract_min(), Ok(-12));
/// assert_eq!(heap.into_sorted_vec(), vec![0, 88]);
/// ```
#[derive(Clone)]
pub struct FibonacciHeap<T> {
    arena: NodeArena<T>,
    /// Entry point into the root list
    root: Option<NodeKey>,
    /// Root holding the smallest value
    min: Option<NodeKey>,
    len: usize,
}

impl<T: Ord> Default for FibonacciHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FibonacciHeap<T> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty heap with room for `capacity` elements before the
    /// node arena reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            root: None,
            min: None,
            len: 0,
        }
    }

    /// Builds a heap whose root list holds `values` in their given order.
    ///
    /// The first value becomes the root reference, and the first occurrence of
    /// the smallest value becomes the minimum. An empty sequence gives an empty
    /// heap. O(n).
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let values = values.into_iter();
        let mut heap = Self::with_capacity(values.size_hint().0);

        for value in values {
            let key = heap.arena.insert_detached(value);
            match heap.root {
                // Appending before the root keeps the input order going right
                Some(root) => RingOps.insert_before(&mut heap.arena, root, key),
                None => heap.root = Some(key),
            }
            heap.offer_min(key);
            heap.len += 1;
        }

        heap.assert_invariants();
        heap
    }

    /// Returns true if the heap holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Stores a new element. O(1), never fails.
    pub fn insert(&mut self, value: T) {
        let key = self.arena.insert_detached(value);
        self.merge_with_root_list(key);
        self.offer_min(key);
        self.len += 1;

        trace!(len = self.len, "inserted");
        self.assert_invariants();
    }

    /// Returns the smallest element. O(1).
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn find_min(&self) -> Result<&T, HeapError> {
        self.peek().ok_or(HeapError::EmptyHeap)
    }

    /// Returns the smallest element, or `None` on an empty heap.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.min.map(|min| &self.arena[min].value)
    }

    /// Moves every element of `other` into this heap.
    ///
    /// The root lists are joined with a single splice: `other`'s roots follow
    /// this heap's last root, and this heap's root reference is kept. On equal
    /// minimums this heap's minimum stays.
    ///
    /// Keys are local to an arena, so the nodes of the smaller heap are moved
    /// into the larger heap's arena first. That makes the merge
    /// O(min(n, m)); the list surgery itself is O(1).
    pub fn merge(&mut self, other: Self) {
        let FibonacciHeap {
            arena: other_arena,
            root: other_root,
            min: other_min,
            len: other_len,
        } = other;

        let (Some(other_root), Some(other_min)) = (other_root, other_min) else {
            return;
        };

        if self.is_empty() {
            self.arena = other_arena;
            self.root = Some(other_root);
            self.min = Some(other_min);
            self.len = other_len;
            return;
        }

        let (other_root, other_min) = if self.arena.len() >= other_arena.len() {
            let remap = self.arena.absorb(other_arena);
            (remap[other_root], remap[other_min])
        } else {
            let ours = std::mem::replace(&mut self.arena, other_arena);
            let remap = self.arena.absorb(ours);
            self.root = self.root.map(|root| remap[root]);
            self.min = self.min.map(|min| remap[min]);
            (other_root, other_min)
        };

        self.root = RingOps.splice(&mut self.arena, self.root, Some(other_root));
        self.offer_min(other_min);
        self.len += other_len;

        debug!(added = other_len, len = self.len, "merged heaps");
        self.assert_invariants();
    }

    /// Removes and returns the smallest element. O(log n) amortized.
    ///
    /// The children of the removed node become roots, and the root list is
    /// then consolidated so that no two roots share a degree.
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements; the heap is
    /// left untouched.
    pub fn extract_min(&mut self) -> Result<T, HeapError> {
        let result = self.min.ok_or(HeapError::EmptyHeap)?;

        if self.len == 1 {
            self.root = None;
            self.min = None;
            self.len = 0;
            let node = self.arena.take(result);
            trace!("extracted last element");
            return Ok(node.value);
        }

        if let Some(child) = self.arena[result].child {
            // Snapshot the child ring: promoting rewrites it
            let children: Vec<NodeKey> = self.arena.ring(child).collect();
            for child in children {
                self.remove_from_child_list(result, child);
                self.merge_with_root_list(child);
            }
        }

        self.remove_from_root_list(result);
        self.len -= 1;

        if self.root.is_some() {
            self.consolidate();
        } else {
            self.min = None;
        }

        let node = self.arena.take(result);
        debug_assert!(node.child.is_none() && node.degree == 0);

        trace!(len = self.len, "extracted min");
        self.assert_invariants();
        Ok(node.value)
    }

    /// Removes and returns the smallest element, or `None` on an empty heap.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.extract_min().ok()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.min = None;
        self.len = 0;
    }

    /// Iterates over every stored element in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.arena.values()
    }

    /// Iterates over the values of the root list, starting at the root
    /// reference and walking right.
    pub fn roots(&self) -> impl Iterator<Item = &T> + '_ {
        self.root_keys().map(move |key| &self.arena[key].value)
    }

    /// Degrees of the roots, in the same order as [`roots`](Self::roots).
    pub fn root_degrees(&self) -> Vec<usize> {
        self.root_keys().map(|key| self.arena[key].degree).collect()
    }

    /// Consumes the heap, yielding its elements in ascending order.
    pub fn drain_sorted(self) -> DrainSorted<T> {
        DrainSorted { heap: self }
    }

    /// Consumes the heap and returns its elements in ascending order.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len);
        sorted.extend(self.drain_sorted());
        sorted
    }

    /// Verifies every structural invariant of the heap. O(n).
    ///
    /// - sibling links are symmetric in every ring and every ring closes
    /// - roots have no parent, and every child's parent owns its ring
    /// - each degree equals the size of the child ring
    /// - no child is smaller than its parent
    /// - `min` names a root, and no root is smaller
    /// - `len` equals both the reachable and the stored node count
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let (root, min) = match (self.root, self.min) {
            (None, None) if self.len == 0 => {
                return if self.arena.len() == 0 {
                    Ok(())
                } else {
                    Err(InvariantViolation::CountMismatch {
                        len: 0,
                        reachable: 0,
                        stored: self.arena.len(),
                    })
                };
            }
            (Some(root), Some(min)) if self.len > 0 => (root, min),
            (root, min) => {
                return Err(InvariantViolation::Bookkeeping {
                    len: self.len,
                    root: root.is_some(),
                    min: min.is_some(),
                })
            }
        };

        if !self.arena.contains(root) || !self.arena.contains(min) {
            return Err(InvariantViolation::StaleMin);
        }

        let limit = self.arena.len();
        let roots = self.checked_ring(root, None, limit)?;

        if !roots.contains(&min) {
            return Err(InvariantViolation::StaleMin);
        }
        let min_value = &self.arena[min].value;
        if roots.iter().any(|&key| self.arena[key].value < *min_value) {
            return Err(InvariantViolation::StaleMin);
        }

        let mut reachable = roots.len();
        let mut pending = roots;
        while let Some(key) = pending.pop() {
            let node = &self.arena[key];
            let children = match node.child {
                Some(child) if self.arena.contains(child) => {
                    self.checked_ring(child, Some(key), limit)?
                }
                Some(_) => return Err(InvariantViolation::ParentMismatch),
                None => Vec::new(),
            };

            if children.len() != node.degree {
                return Err(InvariantViolation::DegreeMismatch {
                    degree: node.degree,
                    children: children.len(),
                });
            }
            if children.iter().any(|&child| self.arena[child].value < node.value) {
                return Err(InvariantViolation::HeapOrder);
            }

            reachable += children.len();
            if reachable > limit {
                return Err(InvariantViolation::UnboundedRing { limit });
            }
            pending.extend(children);
        }

        if reachable != self.len || self.arena.len() != self.len {
            return Err(InvariantViolation::CountMismatch {
                len: self.len,
                reachable,
                stored: self.arena.len(),
            });
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // List surgery
    // ------------------------------------------------------------------

    /// Splices a detached node into the root list, right of the root
    /// reference, or makes it the whole root list.
    fn merge_with_root_list(&mut self, key: NodeKey) {
        match self.root {
            Some(root) => RingOps.insert_after(&mut self.arena, root, key),
            None => {
                RingOps.make_circular(&mut self.arena, key);
                self.root = Some(key);
            }
        }
    }

    /// Unlinks a root. Leaves `min` alone; callers recompute it.
    fn remove_from_root_list(&mut self, key: NodeKey) {
        let next = RingOps.unlink(&mut self.arena, key);
        if self.root == Some(key) {
            self.root = next;
        } else {
            debug_assert!(next.is_some(), "sole root is not the root reference");
        }
    }

    /// Splices a detached node into `parent`'s child ring.
    fn merge_with_child_list(&mut self, parent: NodeKey, key: NodeKey) {
        match self.arena[parent].child {
            Some(child) => RingOps.insert_after(&mut self.arena, child, key),
            None => {
                RingOps.make_circular(&mut self.arena, key);
                self.arena[parent].child = Some(key);
            }
        }
        self.arena[parent].degree += 1;
        self.arena[key].parent = Some(parent);
    }

    /// Unlinks a node from `parent`'s child ring.
    fn remove_from_child_list(&mut self, parent: NodeKey, key: NodeKey) {
        debug_assert_eq!(self.arena[key].parent, Some(parent));

        let next = RingOps.unlink(&mut self.arena, key);
        let parent_node = &mut self.arena[parent];
        if parent_node.child == Some(key) {
            parent_node.child = next;
        }
        parent_node.degree -= 1;
        self.arena[key].parent = None;
    }

    // ------------------------------------------------------------------
    // Consolidation
    // ------------------------------------------------------------------

    /// Links roots of equal degree until every root degree is distinct, then
    /// recomputes `min` from the resulting root list.
    fn consolidate(&mut self) {
        let Some(root) = self.root else {
            self.min = None;
            return;
        };

        let mut table: DegreeTable = SmallVec::from_elem(None, degree_table_len(self.len));

        // Snapshot the root list: linking rewrites it
        let roots: Vec<NodeKey> = self.arena.ring(root).collect();
        let roots_before = roots.len();
        let mut links = 0usize;

        for mut node in roots {
            let mut degree = self.arena[node].degree;

            while let Some(base) = table[degree].take() {
                let (parent, child) = if self.arena[node].value < self.arena[base].value {
                    (node, base)
                } else {
                    (base, node)
                };
                self.heap_link(child, parent);
                links += 1;

                node = parent;
                degree += 1;
            }

            table[degree] = Some(node);
        }

        self.min = self.scan_min();

        debug!(
            roots_before,
            roots_after = roots_before - links,
            links,
            slots = table.len(),
            "consolidated root list"
        );
    }

    /// Moves the root `child` under the root `parent`.
    ///
    /// The caller guarantees `parent`'s value is not greater than `child`'s.
    fn heap_link(&mut self, child: NodeKey, parent: NodeKey) {
        debug_assert!(self.arena[parent].value <= self.arena[child].value);

        self.remove_from_root_list(child);
        self.merge_with_child_list(parent, child);
        trace!(degree = self.arena[parent].degree, "linked trees");
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Makes `key` the minimum if it is strictly smaller than the current one.
    #[inline]
    fn offer_min(&mut self, key: NodeKey) {
        let smaller = match self.min {
            Some(min) => self.arena[key].value < self.arena[min].value,
            None => true,
        };
        if smaller {
            self.min = Some(key);
        }
    }

    /// First smallest root walking right from the root reference.
    fn scan_min(&self) -> Option<NodeKey> {
        let mut roots = self.root_keys();
        let first = roots.next()?;
        Some(roots.fold(first, |best, key| {
            if self.arena[key].value < self.arena[best].value {
                key
            } else {
                best
            }
        }))
    }

    fn root_keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.root.into_iter().flat_map(move |root| self.arena.ring(root))
    }

    /// Collects one ring, checking link symmetry, the parent reference of
    /// every member and that the ring closes within `limit` steps.
    fn checked_ring(
        &self,
        start: NodeKey,
        parent: Option<NodeKey>,
        limit: usize,
    ) -> Result<Vec<NodeKey>, InvariantViolation> {
        let mut members = Vec::new();
        let mut key = start;

        loop {
            let node = &self.arena[key];
            if node.parent != parent {
                return Err(InvariantViolation::ParentMismatch);
            }
            if !self.arena.contains(node.right) || self.arena[node.right].left != key {
                return Err(InvariantViolation::BrokenRing);
            }

            members.push(key);
            if members.len() > limit {
                return Err(InvariantViolation::UnboundedRing { limit });
            }

            key = node.right;
            if key == start {
                return Ok(members);
            }
        }
    }

    #[inline]
    fn assert_invariants(&self) {
        #[cfg(feature = "check-invariants")]
        if let Err(violation) = self.check_invariants() {
            panic!("fibonacci heap invariant violated: {violation}");
        }
    }
}

/// Slots for a degree table over a heap of `len` nodes.
///
/// Root degrees stay below `log_phi(len) + 1`, which `2 * bits(len) + 1`
/// covers with room to spare. Never zero, so the table always has a slot for
/// degree-0 roots.
fn degree_table_len(len: usize) -> usize {
    let bits = (usize::BITS - len.leading_zeros()) as usize;
    2 * bits + 1
}

impl<T: Ord> FromIterator<T> for FibonacciHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl<T: Ord> From<Vec<T>> for FibonacciHeap<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_values(values)
    }
}

impl<T: Ord> Extend<T> for FibonacciHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for FibonacciHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("min", &self.peek())
            .field("roots", &RootList(self))
            .finish()
    }
}

/// Formats the root list as `a-b-c`, walking right from the root reference.
struct RootList<'a, T>(&'a FibonacciHeap<T>);

impl<T: Ord + fmt::Debug> fmt::Debug for RootList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.roots().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{value:?}")?;
        }
        Ok(())
    }
}

/// Iterator returned by [`FibonacciHeap::drain_sorted`]
pub struct DrainSorted<T: Ord> {
    heap: FibonacciHeap<T>,
}

impl<T: Ord> Iterator for DrainSorted<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.heap.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<T: Ord> ExactSizeIterator for DrainSorted<T> {}

impl<T: Ord> FusedIterator for DrainSorted<T> {}

impl<T, P: Ord> Heap<T, P> for FibonacciHeap<Entry<P, T>> {
    fn new() -> Self {
        FibonacciHeap::with_capacity(0)
    }

    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn push(&mut self, priority: P, item: T) {
        self.insert(Entry::new(priority, item));
    }

    fn peek(&self) -> Option<(&P, &T)> {
        FibonacciHeap::peek(self).map(|entry| (&entry.priority, &entry.item))
    }

    fn pop(&mut self) -> Option<(P, T)> {
        FibonacciHeap::pop(self).map(Entry::into_parts)
    }

    fn merge(&mut self, other: Self) {
        FibonacciHeap::merge(self, other);
    }
}
