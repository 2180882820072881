//! Kani verification proofs for heap operations
//!
//! Kani is AWS's model checker for Rust. It checks properties over all
//! possible inputs up to the given unwinding bounds. Outside of `cargo kani`
//! this file compiles to nothing.
//!
//! To run these proofs:
//!   cargo kani --tests

#[cfg(kani)]
use arena_fibheap::{FibonacciHeap, HeapError};

/// Proof that insert always increments the length
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(6)]
fn verify_insert_increments_len() {
    let mut heap: FibonacciHeap<u8> = FibonacciHeap::new();
    heap.insert(kani::any());
    let initial_len = heap.len();

    heap.insert(kani::any());

    assert!(heap.len() == initial_len + 1);
}

/// Proof that find_min returns the smallest of the inserted values
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(6)]
fn verify_find_min_is_smallest() {
    let a: u8 = kani::any();
    let b: u8 = kani::any();
    let c: u8 = kani::any();

    let heap = FibonacciHeap::from_values([a, b, c]);

    let expected = a.min(b).min(c);
    assert!(heap.find_min() == Ok(&expected));
}

/// Proof that extraction from three values yields them in order
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_extract_order_three() {
    let mut heap: FibonacciHeap<u8> = FibonacciHeap::new();
    heap.insert(kani::any());
    heap.insert(kani::any());
    heap.insert(kani::any());

    let first = heap.extract_min().unwrap();
    let second = heap.extract_min().unwrap();
    let third = heap.extract_min().unwrap();

    assert!(first <= second && second <= third);
    assert!(heap.extract_min() == Err(HeapError::EmptyHeap));
    assert!(heap.check_invariants().is_ok());
}

/// Proof that failed operations on an empty heap leave it empty
#[cfg(kani)]
#[kani::proof]
fn verify_empty_heap_errors() {
    let mut heap: FibonacciHeap<u8> = FibonacciHeap::new();

    assert!(heap.find_min() == Err(HeapError::EmptyHeap));
    assert!(heap.extract_min() == Err(HeapError::EmptyHeap));
    assert!(heap.is_empty());
}
