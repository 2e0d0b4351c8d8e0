use std::fmt::{self, Debug};
use std::iter::FromIterator;

use crate::comparator::{Comparator, NaturalOrder};
use crate::queues::heaps;
use crate::queues::PriorityQueue;

/// A priority queue backed by a binary heap in a `Vec`.
///
/// `enqueue` and `dequeue` are O(log n); `first` is O(1). The first element can be
/// modified in place through [`first_mut`](Self::first_mut), after which
/// [`changed`](Self::changed) must be called to restore the heap.
#[derive(Clone)]
pub struct HeapPriorityQueue<T, C = NaturalOrder> {
    heap: Vec<T>,
    comparator: C,
}

impl<T> HeapPriorityQueue<T, NaturalOrder> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            comparator: NaturalOrder,
        }
    }
}

impl<T, C> HeapPriorityQueue<T, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            heap: Vec::new(),
            comparator,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// The least element.
    pub fn first(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Mutable access to the least element. Call [`changed`](Self::changed) afterwards.
    pub fn first_mut(&mut self) -> Option<&mut T> {
        self.heap.first_mut()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Drops spare capacity.
    pub fn trim(&mut self) {
        self.heap.shrink_to_fit();
    }

    /// Iterates in heap (not sorted) order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.heap.iter()
    }

    /// The heap array.
    pub fn as_slice(&self) -> &[T] {
        &self.heap
    }
}

impl<T, C: Comparator<T>> HeapPriorityQueue<T, C> {
    /// Heapifies `items` in place, in linear time.
    pub fn from_vec_with_comparator(mut items: Vec<T>, comparator: C) -> Self {
        let size = items.len();
        heaps::make_heap(&mut items, size, &comparator);
        Self {
            heap: items,
            comparator,
        }
    }

    pub fn enqueue(&mut self, item: T) {
        self.heap.push(item);
        let last = self.heap.len() - 1;
        heaps::up_heap(&mut self.heap, last + 1, last, &self.comparator);
    }

    /// Removes and returns the least element.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let result = self.heap.swap_remove(0);
        let len = self.heap.len();
        if len != 0 {
            heaps::down_heap(&mut self.heap, len, 0, &self.comparator);
        }
        Some(result)
    }

    /// Restores the heap after the first element was modified.
    pub fn changed(&mut self) {
        let len = self.heap.len();
        if len != 0 {
            heaps::down_heap(&mut self.heap, len, 0, &self.comparator);
        }
    }

    /// Consumes the queue, returning its elements in ascending comparator order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        while let Some(v) = self.dequeue() {
            out.push(v);
        }
        out
    }
}

impl<T: Ord> HeapPriorityQueue<T, NaturalOrder> {
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_vec_with_comparator(items, NaturalOrder)
    }
}

impl<T, C: Comparator<T>> PriorityQueue<T> for HeapPriorityQueue<T, C> {
    fn enqueue(&mut self, item: T) {
        HeapPriorityQueue::enqueue(self, item);
    }
    fn dequeue(&mut self) -> Option<T> {
        HeapPriorityQueue::dequeue(self)
    }
    fn first(&self) -> Option<&T> {
        HeapPriorityQueue::first(self)
    }
    fn len(&self) -> usize {
        HeapPriorityQueue::len(self)
    }
    fn clear(&mut self) {
        HeapPriorityQueue::clear(self);
    }
    fn changed(&mut self) {
        HeapPriorityQueue::changed(self);
    }
}

impl<T, C: Default> Default for HeapPriorityQueue<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Debug, C> Debug for HeapPriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.heap.iter()).finish()
    }
}

impl<T, C: Comparator<T>> Extend<T> for HeapPriorityQueue<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T, C: Comparator<T> + Default> FromIterator<T> for HeapPriorityQueue<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec_with_comparator(iter.into_iter().collect(), C::default())
    }
}

impl<T, C> IntoIterator for HeapPriorityQueue<T, C> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    /// Yields the elements in heap order.
    fn into_iter(self) -> Self::IntoIter {
        self.heap.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{ByKey, FloatOrder, ReverseOrder};
    use rand::Rng;
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    #[test]
    fn test_heap_queue_basic_ops() {
        let mut q: HeapPriorityQueue<i32> = HeapPriorityQueue::new();
        assert_eq!(q.dequeue(), None);
        q.enqueue(5);
        q.enqueue(2);
        q.enqueue(8);
        assert_eq!(q.first(), Some(&2));
        assert_eq!(q.len(), 3);
        assert_eq!(q.dequeue(), Some(2));
        assert_eq!(q.dequeue(), Some(5));
        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn test_heap_queue_first_mut_changed() {
        let mut q: HeapPriorityQueue<i32> = [4, 1, 7, 3].into_iter().collect();
        if let Some(top) = q.first_mut() {
            *top = 10;
        }
        q.changed();
        assert_eq!(q.first(), Some(&3));
        assert_eq!(q.into_sorted_vec(), vec![3, 4, 7, 10]);
    }

    #[test]
    fn test_heap_queue_random_against_std() {
        let mut rng = rand::thread_rng();
        let mut q = HeapPriorityQueue::new();
        let mut model = BinaryHeap::new();
        for _ in 0..5000 {
            if rng.gen_bool(0.6) {
                let v: u32 = rng.gen_range(0..1000);
                q.enqueue(v);
                model.push(Reverse(v));
            } else {
                assert_eq!(q.dequeue(), model.pop().map(|r| r.0));
            }
            assert_eq!(q.first(), model.peek().map(|r| &r.0));
        }
    }

    #[test]
    fn test_heap_queue_from_vec_and_comparators() {
        let q = HeapPriorityQueue::from_vec(vec![9, 3, 6, 1]);
        assert_eq!(q.first(), Some(&1));
        assert_eq!(q.clone().into_sorted_vec(), vec![1, 3, 6, 9]);

        let max_first: HeapPriorityQueue<i32, ReverseOrder<NaturalOrder>> =
            [2, 11, 5].into_iter().collect();
        assert_eq!(max_first.into_sorted_vec(), vec![11, 5, 2]);

        let mut floats = HeapPriorityQueue::with_comparator(FloatOrder);
        floats.extend([0.5f32, f32::NAN, -3.0]);
        assert_eq!(floats.dequeue(), Some(-3.0));

        let mut by_len = HeapPriorityQueue::with_comparator(ByKey::new(|s: &&str| s.len()));
        by_len.extend(["ccc", "a", "bb"]);
        assert_eq!(by_len.into_sorted_vec(), vec!["a", "bb", "ccc"]);
    }

    #[test]
    fn test_heap_queue_trim_and_debug() {
        let mut q = HeapPriorityQueue::with_capacity(100);
        q.enqueue(1);
        q.trim();
        assert_eq!(format!("{:?}", q), "[1]");
        assert_eq!(q.iter().count(), 1);
        assert_eq!(q.as_slice(), &[1]);
    }
}
