//! Priority queues.
//!
//! Direct queues ([`PriorityQueue`]) own their elements. Indirect queues
//! ([`IndirectPriorityQueue`]) own a reference array and queue *indices* into it,
//! ordered by the referenced values; a value can be updated in place and the queue
//! told about it with `changed_index`.
//!
//! All queues are min-queues with respect to their [`Comparator`](crate::Comparator):
//! `dequeue` returns the least element.

use core::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::Result;

pub mod array_fifo_queue;
pub mod array_indirect_priority_queue;
pub mod array_priority_queue;
pub mod heap_indirect_priority_queue;
pub mod heap_priority_queue;
pub mod heaps;

pub use array_fifo_queue::ArrayFifoQueue;
pub use array_indirect_priority_queue::ArrayIndirectPriorityQueue;
pub use array_priority_queue::ArrayPriorityQueue;
pub use heap_indirect_priority_queue::HeapIndirectPriorityQueue;
pub use heap_priority_queue::HeapPriorityQueue;

/// A trait for abstraction over the direct priority queues (heap, array, FIFO).
pub trait PriorityQueue<T> {
    fn enqueue(&mut self, item: T);
    fn dequeue(&mut self) -> Option<T>;
    /// The element `dequeue` would return.
    fn first(&self) -> Option<&T>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn clear(&mut self);
    /// Restores the queue order after the first element was modified in place.
    fn changed(&mut self) {}
}

// Support the standard heap in min order
impl<T: Ord> PriorityQueue<T> for BinaryHeap<Reverse<T>> {
    fn enqueue(&mut self, item: T) {
        self.push(Reverse(item));
    }
    fn dequeue(&mut self) -> Option<T> {
        self.pop().map(|Reverse(v)| v)
    }
    fn first(&self) -> Option<&T> {
        self.peek().map(|r| &r.0)
    }
    fn len(&self) -> usize {
        BinaryHeap::len(self)
    }
    fn clear(&mut self) {
        BinaryHeap::clear(self);
    }
}

/// A priority queue of indices into a reference array it owns.
///
/// An index may be queued at most once. Indices must be smaller than the length
/// of the reference array.
pub trait IndirectPriorityQueue<T> {
    /// Queues `index`.
    ///
    /// # Errors
    /// [`CollectionError::IndexOutOfBounds`](crate::CollectionError::IndexOutOfBounds)
    /// if `index` is not a valid reference index.
    fn enqueue(&mut self, index: usize) -> Result<()>;
    /// Removes and returns the index of the least referenced value.
    fn dequeue(&mut self) -> Option<usize>;
    fn first(&self) -> Option<usize>;
    /// Index of the greatest referenced value.
    fn last(&self) -> Option<usize>;
    /// Restores the order after the value referenced by `first()` changed.
    fn changed(&mut self);
    /// Restores the order after the value referenced by `index` changed.
    fn changed_index(&mut self, index: usize) -> Result<()>;
    /// Restores the order after arbitrary reference changes.
    fn all_changed(&mut self);
    /// Removes `index` from the queue. Returns `false` if it was not queued.
    fn remove(&mut self, index: usize) -> bool;
    fn contains(&self, index: usize) -> bool;
    /// Replaces `out` with every queued index whose value equals the first one.
    /// Returns their number.
    fn front(&self, out: &mut Vec<usize>) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn clear(&mut self);
    /// The reference array.
    fn reference(&self) -> &[T];
    /// Overwrites a referenced value and updates the queue if `index` is queued.
    fn set_reference(&mut self, index: usize, value: T) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_all<Q: PriorityQueue<i32>>(q: &mut Q) -> Vec<i32> {
        std::iter::from_fn(|| q.dequeue()).collect()
    }

    #[test]
    fn test_queue_trait_std_heap_is_min_queue() {
        let mut heap: BinaryHeap<Reverse<i32>> = BinaryHeap::new();
        for v in [5, 1, 4] {
            PriorityQueue::enqueue(&mut heap, v);
        }
        assert_eq!(PriorityQueue::first(&heap), Some(&1));
        assert_eq!(PriorityQueue::len(&heap), 3);
        assert_eq!(drain_all(&mut heap), vec![1, 4, 5]);
    }

    #[test]
    fn test_queue_trait_every_backend_agrees() {
        let input = [7, 3, 9, 3, 0, 12, -4];
        let mut heap = HeapPriorityQueue::new();
        let mut array = ArrayPriorityQueue::new();
        let mut std_heap: BinaryHeap<Reverse<i32>> = BinaryHeap::new();
        for v in input {
            PriorityQueue::enqueue(&mut heap, v);
            PriorityQueue::enqueue(&mut array, v);
            PriorityQueue::enqueue(&mut std_heap, v);
        }
        let expected = drain_all(&mut std_heap);
        assert_eq!(drain_all(&mut heap), expected);
        assert_eq!(drain_all(&mut array), expected);

        let mut fifo = ArrayFifoQueue::new();
        for v in input {
            PriorityQueue::enqueue(&mut fifo, v);
        }
        assert_eq!(drain_all(&mut fifo), input.to_vec());
    }
}
