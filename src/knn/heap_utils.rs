//! This module contains utility structures for keeping the k nearest
//! candidates seen so far in a bounded binary heap.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use ordered_float::OrderedFloat; // For using f64 in BinaryHeap

/// Represents an element in the KBestNeighbors heap, pairing a distance with data.
///
/// `order` is the position in which the element was offered, so equal
/// distances rank by arrival and the result matches a stable sort.
#[derive(Debug)]
pub struct HeapElement<P> {
    pub distance: OrderedFloat<f64>,
    pub order: usize,
    pub data: P,
}

impl<P> HeapElement<P> {
    fn key(&self) -> (OrderedFloat<f64>, usize) {
        (self.distance, self.order)
    }
}

impl<P> PartialEq for HeapElement<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl<P> Eq for HeapElement<P> {}

impl<P> PartialOrd for HeapElement<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for HeapElement<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: the worst of the kept candidates sits on top.
        self.key().cmp(&other.key())
    }
}

/// Manages a collection of the K "best" (smallest distance) items seen so far.
#[derive(Debug)]
pub struct KBestNeighbors<P> {
    capacity: usize,
    offered: usize,
    heap: BinaryHeap<HeapElement<P>>,
}

impl<P> KBestNeighbors<P> {
    pub fn new(capacity: usize) -> Self {
        KBestNeighbors {
            capacity,
            offered: 0,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, distance: f64, point_data: P) {
        let item = HeapElement { distance: OrderedFloat(distance), order: self.offered, data: point_data };
        self.offered += 1;
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(item);
        } else if let Some(mut top) = self.heap.peek_mut() {
            // A later arrival at the same distance never displaces an earlier one.
            if item < *top {
                *top = item;
            }
        }
    }

    /// Kept elements, nearest first; ties stay in arrival order.
    pub fn into_sorted_elements(self) -> Vec<HeapElement<P>> {
        self.heap.into_sorted_vec()
    }
}
