//! Circular doubly-linked lists over index-addressed arenas.
//!
//! The nodes of a ring live in some arena (a `Vec`, a slot map, ...) and refer
//! to their neighbours by key instead of by pointer. This crate only knows how
//! to read and rewrite those keys, through the [`RingLinks`] trait, so the
//! arena stays the single owner of every node and no reference cycles exist.
//!
//! # Circular vs Linear Lists
//!
//! In a circular list:
//! - A single node points to itself (both `next` and `prev`)
//! - There is no head or tail - any node can be the "entry point"
//! - Splicing two rings together is O(1)
//! - Iteration wraps around, so it must track its starting point
//!
//! # Example
//!
//! ```rust
//! use index_ring::{Direction, RingLinks, RingOps};
//!
//! struct Links(Vec<(usize, usize)>);
//!
//! impl RingLinks<usize> for Links {
//!     fn next(&self, k: usize) -> usize { self.0[k].1 }
//!     fn prev(&self, k: usize) -> usize { self.0[k].0 }
//!     fn set_next(&mut self, k: usize, next: usize) { self.0[k].1 = next; }
//!     fn set_prev(&mut self, k: usize, prev: usize) { self.0[k].0 = prev; }
//! }
//!
//! let mut links = Links(vec![(0, 0); 3]);
//! let ops = RingOps;
//!
//! ops.make_circular(&mut links, 0);
//! ops.insert_after(&mut links, 0, 1);
//! ops.insert_after(&mut links, 1, 2);
//!
//! let forward: Vec<_> = ops.iter(&links, 0, Direction::Next).collect();
//! assert_eq!(forward, vec![0, 1, 2]);
//! let backward: Vec<_> = ops.iter(&links, 0, Direction::Prev).collect();
//! assert_eq!(backward, vec![0, 2, 1]);
//! ```

#![no_std]

use core::iter::FusedIterator;

// =============================================================================
// RingLinks
// =============================================================================

/// Access to the sibling links of the nodes stored in an arena.
///
/// Implementors may panic on keys that do not name a live node; rings are
/// only ever walked through keys the arena itself handed out.
pub trait RingLinks<K: Copy + Eq> {
    /// The node after `k` (its `right` sibling).
    fn next(&self, k: K) -> K;

    /// The node before `k` (its `left` sibling).
    fn prev(&self, k: K) -> K;

    /// Sets the node after `k`.
    fn set_next(&mut self, k: K, next: K);

    /// Sets the node before `k`.
    fn set_prev(&mut self, k: K, prev: K);

    /// The neighbour of `k` in the given direction.
    #[inline]
    fn step(&self, k: K, direction: Direction) -> K {
        match direction {
            Direction::Next => self.next(k),
            Direction::Prev => self.prev(k),
        }
    }
}

/// Direction of travel around a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Follow `next` (right) links.
    #[default]
    Next,
    /// Follow `prev` (left) links.
    Prev,
}

// =============================================================================
// Ring iterator
// =============================================================================

/// One lap around a ring, starting (and ending just before) a given node.
///
/// The iterator borrows the arena, so the ring cannot be rewritten while it is
/// being walked. Callers that need to restructure the ring collect the keys
/// first and then mutate.
///
/// Cloning a `Ring` restarts nothing: the clone continues from the same
/// position. Use [`Ring::restart`] for a fresh lap.
pub struct Ring<'a, L: ?Sized, K> {
    links: &'a L,
    start: K,
    cursor: Option<K>,
    direction: Direction,
}

impl<'a, L, K> Ring<'a, L, K>
where
    L: RingLinks<K> + ?Sized,
    K: Copy + Eq,
{
    /// Creates a lap over the ring containing `start`.
    #[inline]
    pub fn new(links: &'a L, start: K, direction: Direction) -> Self {
        Ring {
            links,
            start,
            cursor: Some(start),
            direction,
        }
    }

    /// Returns a new lap beginning at the same start node.
    #[inline]
    pub fn restart(&self) -> Self {
        Ring::new(self.links, self.start, self.direction)
    }

    /// The node this lap started from.
    #[inline]
    pub fn start(&self) -> K {
        self.start
    }
}

impl<L: ?Sized, K: Copy> Clone for Ring<'_, L, K> {
    fn clone(&self) -> Self {
        Ring {
            links: self.links,
            start: self.start,
            cursor: self.cursor,
            direction: self.direction,
        }
    }
}

impl<L, K> Iterator for Ring<'_, L, K>
where
    L: RingLinks<K> + ?Sized,
    K: Copy + Eq,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        let current = self.cursor?;
        let following = self.links.step(current, self.direction);
        self.cursor = if following == self.start {
            None
        } else {
            Some(following)
        };
        Some(current)
    }
}

impl<L, K> FusedIterator for Ring<'_, L, K>
where
    L: RingLinks<K> + ?Sized,
    K: Copy + Eq,
{
}

// =============================================================================
// RingOps
// =============================================================================

/// Operations for manipulating circular doubly-linked lists.
///
/// Every operation except [`RingOps::count`] is O(1). The operations trust
/// their preconditions; debug builds assert the local link symmetry they rely
/// on, which catches most corruptions close to where they happen.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingOps;

impl RingOps {
    /// Creates a new `RingOps`.
    #[inline]
    pub const fn new() -> Self {
        RingOps
    }

    /// Makes `k` a ring of one element: `next(k) == k` and `prev(k) == k`.
    #[inline]
    pub fn make_circular<L, K>(&self, links: &mut L, k: K)
    where
        L: RingLinks<K> + ?Sized,
        K: Copy + Eq,
    {
        links.set_next(k, k);
        links.set_prev(k, k);
    }

    /// Inserts the detached node `new` after `at`.
    #[inline]
    pub fn insert_after<L, K>(&self, links: &mut L, at: K, new: K)
    where
        L: RingLinks<K> + ?Sized,
        K: Copy + Eq,
    {
        let next = links.next(at);
        debug_assert!(links.prev(next) == at, "ring is not symmetric at insert point");

        links.set_next(at, new);
        links.set_prev(new, at);
        links.set_next(new, next);
        links.set_prev(next, new);
    }

    /// Inserts the detached node `new` before `at`.
    #[inline]
    pub fn insert_before<L, K>(&self, links: &mut L, at: K, new: K)
    where
        L: RingLinks<K> + ?Sized,
        K: Copy + Eq,
    {
        let prev = links.prev(at);
        debug_assert!(links.next(prev) == at, "ring is not symmetric at insert point");

        links.set_prev(at, new);
        links.set_next(new, at);
        links.set_prev(new, prev);
        links.set_next(prev, new);
    }

    /// Removes `k` from its ring and leaves it as a detached singleton.
    ///
    /// Returns the node that followed `k`, or `None` if `k` was the only
    /// element (the ring is now empty).
    #[inline]
    pub fn unlink<L, K>(&self, links: &mut L, k: K) -> Option<K>
    where
        L: RingLinks<K> + ?Sized,
        K: Copy + Eq,
    {
        let next = links.next(k);
        let prev = links.prev(k);

        if next == k {
            debug_assert!(prev == k, "singleton ring with a foreign prev link");
            return None;
        }

        links.set_next(prev, next);
        links.set_prev(next, prev);
        self.make_circular(links, k);
        Some(next)
    }

    /// Splices two rings together.
    ///
    /// The ring containing `b` is placed immediately before `a`: the old last
    /// node of `a`'s ring now continues into `b`, and the last node of `b`'s
    /// ring continues into `a`. Returns an entry point into the merged ring
    /// (`a` when both are present), or `None` if both were empty.
    #[inline]
    pub fn splice<L, K>(&self, links: &mut L, a: Option<K>, b: Option<K>) -> Option<K>
    where
        L: RingLinks<K> + ?Sized,
        K: Copy + Eq,
    {
        match (a, b) {
            (None, None) => None,
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (Some(a), Some(b)) => {
                // Before:
                //   Ring A: ... <-> a_prev <-> a <-> ...
                //   Ring B: ... <-> b_prev <-> b <-> ...
                //
                // After:
                //   ... <-> a_prev <-> b <-> ... <-> b_prev <-> a <-> ...
                let a_prev = links.prev(a);
                let b_prev = links.prev(b);

                links.set_next(a_prev, b);
                links.set_prev(b, a_prev);

                links.set_next(b_prev, a);
                links.set_prev(a, b_prev);

                Some(a)
            }
        }
    }

    /// Counts the elements of the ring containing `start`. O(n).
    pub fn count<L, K>(&self, links: &L, start: K) -> usize
    where
        L: RingLinks<K> + ?Sized,
        K: Copy + Eq,
    {
        self.iter(links, start, Direction::Next).count()
    }

    /// One lap around the ring containing `start`.
    #[inline]
    pub fn iter<'a, L, K>(&self, links: &'a L, start: K, direction: Direction) -> Ring<'a, L, K>
    where
        L: RingLinks<K> + ?Sized,
        K: Copy + Eq,
    {
        Ring::new(links, start, direction)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec;
    use std::vec::Vec;

    /// `(prev, next)` per slot.
    struct TestLinks(Vec<(usize, usize)>);

    impl TestLinks {
        fn with_nodes(n: usize) -> Self {
            TestLinks((0..n).map(|i| (i, i)).collect())
        }

        /// Builds the ring `0 <-> 1 <-> ... <-> n-1 <-> 0`.
        fn ring(n: usize) -> Self {
            let mut links = TestLinks::with_nodes(n);
            for i in 1..n {
                RingOps.insert_after(&mut links, i - 1, i);
            }
            links
        }
    }

    impl RingLinks<usize> for TestLinks {
        fn next(&self, k: usize) -> usize {
            self.0[k].1
        }
        fn prev(&self, k: usize) -> usize {
            self.0[k].0
        }
        fn set_next(&mut self, k: usize, next: usize) {
            self.0[k].1 = next;
        }
        fn set_prev(&mut self, k: usize, prev: usize) {
            self.0[k].0 = prev;
        }
    }

    #[test]
    fn test_make_circular_single() {
        let mut links = TestLinks(vec![(7, 7)]);
        RingOps.make_circular(&mut links, 0);

        assert_eq!(links.next(0), 0);
        assert_eq!(links.prev(0), 0);
    }

    #[test]
    fn test_singleton_lap_yields_once() {
        let links = TestLinks::with_nodes(1);
        let lap: Vec<_> = RingOps.iter(&links, 0, Direction::Next).collect();
        assert_eq!(lap, vec![0]);
        let lap: Vec<_> = RingOps.iter(&links, 0, Direction::Prev).collect();
        assert_eq!(lap, vec![0]);
    }

    #[test]
    fn test_insert_after() {
        let mut links = TestLinks::with_nodes(2);
        RingOps.insert_after(&mut links, 0, 1);

        // 0 <-> 1 <-> 0
        assert_eq!(links.next(0), 1);
        assert_eq!(links.next(1), 0);
        assert_eq!(links.prev(0), 1);
        assert_eq!(links.prev(1), 0);
    }

    #[test]
    fn test_insert_before() {
        let mut links = TestLinks::with_nodes(4);
        RingOps.insert_after(&mut links, 0, 1);
        RingOps.insert_after(&mut links, 1, 2);

        RingOps.insert_before(&mut links, 0, 3);

        let lap: Vec<_> = RingOps.iter(&links, 0, Direction::Next).collect();
        assert_eq!(lap, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_lap_starts_anywhere() {
        let links = TestLinks::ring(4);

        let lap: Vec<_> = RingOps.iter(&links, 2, Direction::Next).collect();
        assert_eq!(lap, vec![2, 3, 0, 1]);

        let lap: Vec<_> = RingOps.iter(&links, 2, Direction::Prev).collect();
        assert_eq!(lap, vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_lap_is_restartable() {
        let links = TestLinks::ring(3);
        let mut lap = RingOps.iter(&links, 0, Direction::Next);
        assert_eq!(lap.next(), Some(0));

        let resumed: Vec<_> = lap.clone().collect();
        assert_eq!(resumed, vec![1, 2]);

        let fresh: Vec<_> = lap.restart().collect();
        assert_eq!(fresh, vec![0, 1, 2]);

        assert_eq!(lap.by_ref().count(), 2);
        assert_eq!(lap.next(), None);
    }

    #[test]
    fn test_unlink_single() {
        let mut links = TestLinks::with_nodes(1);
        assert_eq!(RingOps.unlink(&mut links, 0), None);
        assert_eq!(links.next(0), 0);
    }

    #[test]
    fn test_unlink_from_two() {
        let mut links = TestLinks::ring(2);

        assert_eq!(RingOps.unlink(&mut links, 0), Some(1));

        // Both nodes are singletons now
        assert_eq!(links.next(1), 1);
        assert_eq!(links.prev(1), 1);
        assert_eq!(links.next(0), 0);
        assert_eq!(links.prev(0), 0);
    }

    #[test]
    fn test_unlink_middle() {
        let mut links = TestLinks::ring(3);

        assert_eq!(RingOps.unlink(&mut links, 1), Some(2));

        // 0 <-> 2 <-> 0
        assert_eq!(links.next(0), 2);
        assert_eq!(links.next(2), 0);
        assert_eq!(links.prev(0), 2);
        assert_eq!(RingOps.count(&links, 0), 2);
    }

    #[test]
    fn test_splice_empty() {
        let mut links = TestLinks::with_nodes(1);
        assert_eq!(RingOps.splice(&mut links, None, None), None);
        assert_eq!(RingOps.splice(&mut links, Some(0), None), Some(0));
        assert_eq!(RingOps.splice(&mut links, None, Some(0)), Some(0));
    }

    #[test]
    fn test_splice_places_other_ring_before_entry() {
        // Ring A: 0 <-> 1 <-> 2, ring B: 3 <-> 4
        let mut links = TestLinks::with_nodes(5);
        RingOps.insert_after(&mut links, 0, 1);
        RingOps.insert_after(&mut links, 1, 2);
        RingOps.insert_after(&mut links, 3, 4);

        assert_eq!(RingOps.splice(&mut links, Some(0), Some(3)), Some(0));

        let lap: Vec<_> = RingOps.iter(&links, 0, Direction::Next).collect();
        assert_eq!(lap, vec![0, 1, 2, 3, 4]);
        let lap: Vec<_> = RingOps.iter(&links, 0, Direction::Prev).collect();
        assert_eq!(lap, vec![0, 4, 3, 2, 1]);
    }

    #[test]
    fn test_count() {
        let links = TestLinks::ring(5);
        assert_eq!(RingOps.count(&links, 0), 5);
        assert_eq!(RingOps.count(&links, 3), 5);
    }
}
