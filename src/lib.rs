//! Arena-backed Fibonacci heap
//!
//! This crate provides a Fibonacci heap, a priority queue with:
//!
//! - O(1) amortized insert and find-min
//! - O(log n) amortized extract-min
//! - merging of two heaps by splicing their root lists
//!
//! The heap is a forest of heap-ordered trees. Every node sits in exactly one
//! circular doubly-linked list: the root list, or the child list of its parent.
//! Nodes are stored in a `slotmap` arena and linked by key, with the ring
//! operations provided by the `index-ring` workspace crate.
//!
//! The structure is not thread-safe; share it behind a single lock (for
//! example `Mutex<FibonacciHeap<T>>`) when several threads need it.
//!
//! # Example
//!
//! ```rust
//! use arena_fibheap::{FibonacciHeap, HeapError};
//!
//! let mut heap: FibonacciHeap<i32> = [5, 5, 3, 3, 3].into_iter().collect();
//! assert_eq!(heap.find_min(), Ok(&3));
//!
//! let other = FibonacciHeap::from_values(vec![1, 8]);
//! heap.merge(other);
//! assert_eq!(heap.len(), 7);
//!
//! assert_eq!(heap.into_sorted_vec(), vec![1, 3, 3, 3, 5, 5, 8]);
//!
//! let mut empty = FibonacciHeap::<i32>::new();
//! assert_eq!(empty.extract_min(), Err(HeapError::EmptyHeap));
//! ```
//!
//! Keys paired with data go through [`Entry`], which is ordered by its key
//! alone and unlocks the [`Heap`] trait:
//!
//! ```rust
//! use arena_fibheap::{Entry, FibonacciHeap, Heap};
//!
//! let mut heap: FibonacciHeap<Entry<u32, &str>> = FibonacciHeap::new();
//! heap.push(2, "write report");
//! heap.push(1, "fix build");
//! assert_eq!(Heap::pop(&mut heap), Some((1, "fix build")));
//! ```

pub mod fibonacci;
mod storage;
pub mod traits;

// Re-export the main types for convenience
pub use fibonacci::{DrainSorted, FibonacciHeap};
pub use traits::{Entry, Heap, HeapError, InvariantViolation};
