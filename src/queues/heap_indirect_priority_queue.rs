use std::fmt::{self, Debug};

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::{CollectionError, Result};
use crate::queues::heaps;
use crate::queues::IndirectPriorityQueue;
use crate::utils::IndexType;

/// An indirect priority queue backed by a binary heap of indices.
///
/// Besides the heap it keeps the inverse array `inv` (reference index -> heap
/// position, `NONE` when not queued), so `contains` is O(1) and `remove` or
/// `changed_index` on an arbitrary index are O(log n).
pub struct HeapIndirectPriorityQueue<T, C = NaturalOrder> {
    refs: Vec<T>,
    heap: Vec<usize>,
    inv: Vec<usize>,
    comparator: C,
}

impl<T> HeapIndirectPriorityQueue<T, NaturalOrder> {
    /// An empty queue over `refs`, ordered by `T: Ord`.
    pub fn new(refs: Vec<T>) -> Self {
        Self::with_comparator(refs, NaturalOrder)
    }
}

impl<T, C> HeapIndirectPriorityQueue<T, C> {
    pub fn with_comparator(refs: Vec<T>, comparator: C) -> Self {
        let inv = vec![usize::NONE; refs.len()];
        Self {
            refs,
            heap: Vec::new(),
            inv,
            comparator,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Queued indices in heap order.
    pub fn indices(&self) -> &[usize] {
        &self.heap
    }

    /// Returns the reference array, dropping the queue.
    pub fn into_reference(self) -> Vec<T> {
        self.refs
    }

    pub fn trim(&mut self) {
        self.heap.shrink_to_fit();
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.refs.len() {
            return Err(CollectionError::out_of_bounds(index, self.refs.len()));
        }
        Ok(())
    }
}

impl<T, C: Comparator<T>> HeapIndirectPriorityQueue<T, C> {
    /// A queue over `refs` holding every index, heapified in linear time.
    pub fn with_all_indices(refs: Vec<T>, comparator: C) -> Self {
        let n = refs.len();
        let mut q = Self {
            refs,
            heap: (0..n).collect(),
            inv: (0..n).collect(),
            comparator,
        };
        q.all_changed();
        q
    }

    /// Moves the entry at heap position `pos` to where it belongs.
    fn fix(&mut self, pos: usize) {
        let size = self.heap.len();
        let pos = heaps::up_heap_indirect(&self.refs, &mut self.heap, &mut self.inv, size, pos, &self.comparator);
        heaps::down_heap_indirect(&self.refs, &mut self.heap, &mut self.inv, size, pos, &self.comparator);
    }
}

impl<T, C: Comparator<T>> IndirectPriorityQueue<T> for HeapIndirectPriorityQueue<T, C> {
    fn enqueue(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        if self.inv[index].is_some() {
            return Err(CollectionError::DuplicateIndex { index });
        }
        let pos = self.heap.len();
        self.heap.push(index);
        self.inv[index] = pos;
        heaps::up_heap_indirect(&self.refs, &mut self.heap, &mut self.inv, pos + 1, pos, &self.comparator);
        Ok(())
    }

    fn dequeue(&mut self) -> Option<usize> {
        if self.heap.is_empty() {
            return None;
        }
        let result = self.heap.swap_remove(0);
        self.inv[result] = usize::NONE;
        if let Some(&moved) = self.heap.first() {
            self.inv[moved] = 0;
            let size = self.heap.len();
            heaps::down_heap_indirect(&self.refs, &mut self.heap, &mut self.inv, size, 0, &self.comparator);
        }
        Some(result)
    }

    fn first(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    fn last(&self) -> Option<usize> {
        // The greatest element is a leaf, but any leaf may hold it.
        let start = self.heap.len() / 2;
        let mut it = self.heap[start..].iter().copied();
        let mut best = it.next()?;
        for i in it {
            if self.comparator.less(&self.refs[best], &self.refs[i]) {
                best = i;
            }
        }
        Some(best)
    }

    fn changed(&mut self) {
        if !self.heap.is_empty() {
            let size = self.heap.len();
            heaps::down_heap_indirect(&self.refs, &mut self.heap, &mut self.inv, size, 0, &self.comparator);
        }
    }

    fn changed_index(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        let pos = self.inv[index].get().ok_or(CollectionError::NoSuchElement)?;
        self.fix(pos);
        Ok(())
    }

    fn all_changed(&mut self) {
        let size = self.heap.len();
        heaps::make_heap_indirect(&self.refs, &mut self.heap, &mut self.inv, size, &self.comparator);
    }

    fn remove(&mut self, index: usize) -> bool {
        let Some(pos) = self.inv.get(index).and_then(|p| p.get()) else {
            return false;
        };
        self.inv[index] = usize::NONE;
        self.heap.swap_remove(pos);
        if pos < self.heap.len() {
            let moved = self.heap[pos];
            self.inv[moved] = pos;
            self.fix(pos);
        }
        true
    }

    fn contains(&self, index: usize) -> bool {
        self.inv.get(index).is_some_and(|p| p.is_some())
    }

    fn front(&self, out: &mut Vec<usize>) -> usize {
        heaps::front_indirect(&self.refs, &self.heap, self.heap.len(), out, &self.comparator)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn clear(&mut self) {
        for &i in &self.heap {
            self.inv[i] = usize::NONE;
        }
        self.heap.clear();
    }

    fn reference(&self) -> &[T] {
        &self.refs
    }

    fn set_reference(&mut self, index: usize, value: T) -> Result<()> {
        self.check(index)?;
        self.refs[index] = value;
        if let Some(pos) = self.inv[index].get() {
            self.fix(pos);
        }
        Ok(())
    }
}

impl<T: Debug, C> Debug for HeapIndirectPriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.heap.iter().map(|&i| &self.refs[i]))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queues::ArrayIndirectPriorityQueue;
    use rand::Rng;

    fn check_inverse<T, C>(q: &HeapIndirectPriorityQueue<T, C>) {
        for (pos, &i) in q.heap.iter().enumerate() {
            assert_eq!(q.inv[i], pos);
        }
        let queued = q.inv.iter().filter(|p| p.is_some()).count();
        assert_eq!(queued, q.heap.len());
    }

    #[test]
    fn test_heap_indirect_queue_basic() {
        let mut q = HeapIndirectPriorityQueue::new(vec![30, 10, 50, 20, 40]);
        for i in 0..5 {
            q.enqueue(i).unwrap();
        }
        check_inverse(&q);
        assert_eq!(q.first(), Some(1));
        assert_eq!(q.last(), Some(2));
        assert_eq!(q.dequeue(), Some(1));
        assert_eq!(q.dequeue(), Some(3));
        assert!(!q.contains(1));
        assert!(q.contains(0));
        check_inverse(&q);
        assert_eq!(q.enqueue(0), Err(CollectionError::DuplicateIndex { index: 0 }));
        assert_eq!(q.enqueue(9), Err(CollectionError::out_of_bounds(9, 5)));
    }

    #[test]
    fn test_heap_indirect_queue_changes() {
        let mut q = HeapIndirectPriorityQueue::with_all_indices(vec![5, 1, 4, 2, 3], NaturalOrder);
        check_inverse(&q);
        assert_eq!(q.first(), Some(1));

        q.set_reference(4, 0).unwrap();
        assert_eq!(q.first(), Some(4));
        q.set_reference(4, 9).unwrap();
        assert_eq!(q.first(), Some(1));
        assert_eq!(q.last(), Some(4));

        assert_eq!(q.changed_index(7), Err(CollectionError::out_of_bounds(7, 5)));
        q.remove(3);
        assert_eq!(q.changed_index(3), Err(CollectionError::NoSuchElement));
        check_inverse(&q);

        let mut out = Vec::new();
        q.set_reference(2, 1).unwrap();
        assert_eq!(q.front(&mut out), 2);
        out.sort_unstable();
        assert_eq!(out, vec![1, 2]);
        q.clear();
        assert!(q.is_empty());
        check_inverse(&q);
    }

    #[test]
    fn test_heap_indirect_queue_matches_array_queue() {
        let mut rng = rand::thread_rng();
        let refs: Vec<u32> = (0..64).map(|_| rng.gen_range(0..1000)).collect();
        let mut heap = HeapIndirectPriorityQueue::new(refs.clone());
        let mut array = ArrayIndirectPriorityQueue::new(refs);
        for _ in 0..4000 {
            let i = rng.gen_range(0..64);
            match rng.gen_range(0..4) {
                0 => assert_eq!(heap.enqueue(i).is_ok(), array.enqueue(i).is_ok()),
                1 => assert_eq!(heap.remove(i), array.remove(i)),
                2 => {
                    let v = rng.gen_range(0..1000);
                    heap.set_reference(i, v).unwrap();
                    array.set_reference(i, v).unwrap();
                }
                _ => {
                    let (a, b) = (heap.dequeue(), array.dequeue());
                    assert_eq!(a.map(|i| heap.reference()[i]), b.map(|i| array.reference()[i]));
                    // Ties may pick different indices; keep both queues in step.
                    if let (Some(a), Some(b)) = (a, b) {
                        if a != b {
                            heap.remove(b);
                            array.remove(a);
                        }
                    }
                }
            }
            check_inverse(&heap);
            assert_eq!(heap.len(), array.len());
        }
    }
}
