//! Common traits and error types for heap data structures
//!
//! - [`Heap`]: a priority-queue interface over `(priority, item)` pairs
//! - [`Entry`]: a priority paired with an item, ordered by the priority alone
//! - [`HeapError`]: failures of the value-level heap operations
//! - [`InvariantViolation`]: what [`FibonacciHeap::check_invariants`] reports
//!
//! [`FibonacciHeap::check_invariants`]: crate::FibonacciHeap::check_invariants

use std::cmp::Ordering;

use thiserror::Error;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `find_min` or `extract_min` was called on a heap holding no elements
    #[error("heap is empty")]
    EmptyHeap,
}

/// A broken structural invariant, found by an explicit consistency check.
///
/// Heap operations never produce these; they indicate a bug in the heap
/// itself rather than misuse by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// `len`, the root reference and the min reference disagree about emptiness
    #[error("heap bookkeeping disagrees: len is {len}, root set: {root}, min set: {min}")]
    Bookkeeping { len: usize, root: bool, min: bool },
    /// A node's neighbour does not link back to it
    #[error("sibling links are not symmetric")]
    BrokenRing,
    /// Walking a ring did not return to its start
    #[error("ring does not close within {limit} steps")]
    UnboundedRing { limit: usize },
    /// A node's degree differs from the size of its child ring
    #[error("node degree {degree} does not match its {children} children")]
    DegreeMismatch { degree: usize, children: usize },
    /// A node's parent reference does not name the owner of its ring
    #[error("parent reference does not name the node owning the ring")]
    ParentMismatch,
    /// A child holds a smaller key than its parent
    #[error("child is smaller than its parent")]
    HeapOrder,
    /// The min reference is missing from the root list or is not the smallest root
    #[error("min does not reference the smallest root")]
    StaleMin,
    /// The stored element count differs from what the root list reaches
    #[error("len is {len} but {reachable} nodes are reachable and {stored} are stored")]
    CountMismatch {
        len: usize,
        reachable: usize,
        stored: usize,
    },
}

/// A priority paired with an item.
///
/// Comparisons look at `priority` only, so items need not be ordered and
/// entries with equal priorities compare equal whatever their items are.
#[derive(Debug, Clone, Copy)]
pub struct Entry<P, T> {
    pub priority: P,
    pub item: T,
}

impl<P, T> Entry<P, T> {
    pub fn new(priority: P, item: T) -> Self {
        Entry { priority, item }
    }

    pub fn into_parts(self) -> (P, T) {
        (self.priority, self.item)
    }
}

impl<P: Ord, T> PartialEq for Entry<P, T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl<P: Ord, T> Eq for Entry<P, T> {}

impl<P: Ord, T> PartialOrd for Entry<P, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: Ord, T> Ord for Entry<P, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

/// Base trait for heap/priority queue data structures
///
/// This trait provides a simple API similar to Rust's `BinaryHeap`:
/// - `push` inserts an element (returns `()`)
/// - `pop` removes and returns the minimum
/// - `peek` returns the minimum without removing it
///
/// Unlike `BinaryHeap` which stores values directly (using `Ord`), this trait
/// works on (priority, item) pairs to separate the ordering key from the data.
///
/// # Example
///
/// ```rust
/// use arena_fibheap::{Entry, FibonacciHeap, Heap};
///
/// let mut heap: FibonacciHeap<Entry<i32, &str>> = FibonacciHeap::new();
/// heap.push(3, "three");
/// heap.push(1, "one");
/// heap.push(2, "two");
///
/// assert_eq!(Heap::peek(&heap), Some((&1, &"one")));
/// assert_eq!(Heap::pop(&mut heap), Some((1, "one")));
/// ```
pub trait Heap<T, P: Ord> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority
    ///
    /// # Time Complexity
    /// O(1) for the Fibonacci heap.
    fn push(&mut self, priority: P, item: T);

    /// Returns the minimum priority and associated item without removing it
    ///
    /// Note that `BinaryHeap` is a max-heap, while these heaps are min-heaps.
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes and returns the minimum priority and associated item
    ///
    /// # Time Complexity
    /// O(log n) amortized for the Fibonacci heap.
    fn pop(&mut self) -> Option<(P, T)>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_orders_by_priority_only() {
        let a = Entry::new(1, "zebra");
        let b = Entry::new(2, "apple");
        let c = Entry::new(1, "mango");

        assert!(a < b);
        assert_eq!(a, c);
        assert_eq!(a.cmp(&c), Ordering::Equal);
        assert_eq!(b.into_parts(), (2, "apple"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(HeapError::EmptyHeap.to_string(), "heap is empty");
        assert_eq!(
            InvariantViolation::DegreeMismatch {
                degree: 2,
                children: 3
            }
            .to_string(),
            "node degree 2 does not match its 3 children"
        );
    }
}
