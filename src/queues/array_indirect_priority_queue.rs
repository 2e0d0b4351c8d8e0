use std::cell::Cell;
use std::fmt::{self, Debug};

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::{CollectionError, Result};
use crate::queues::IndirectPriorityQueue;

/// An indirect priority queue over an unsorted array of indices.
///
/// `enqueue` is O(n) only because it rejects duplicate indices; `dequeue`,
/// `remove` and `contains` scan the array. The position of the first index is
/// cached and invalidated by every change notification.
pub struct ArrayIndirectPriorityQueue<T, C = NaturalOrder> {
    refs: Vec<T>,
    array: Vec<usize>,
    comparator: C,
    first_index: Cell<Option<usize>>,
}

impl<T> ArrayIndirectPriorityQueue<T, NaturalOrder> {
    /// An empty queue over `refs`, ordered by `T: Ord`.
    pub fn new(refs: Vec<T>) -> Self {
        Self::with_comparator(refs, NaturalOrder)
    }
}

impl<T, C> ArrayIndirectPriorityQueue<T, C> {
    pub fn with_comparator(refs: Vec<T>, comparator: C) -> Self {
        Self {
            refs,
            array: Vec::new(),
            comparator,
            first_index: Cell::new(None),
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Queued indices in insertion order.
    pub fn indices(&self) -> &[usize] {
        &self.array
    }

    /// Returns the reference array, dropping the queue.
    pub fn into_reference(self) -> Vec<T> {
        self.refs
    }

    pub fn trim(&mut self) {
        self.array.shrink_to_fit();
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.refs.len() {
            return Err(CollectionError::out_of_bounds(index, self.refs.len()));
        }
        Ok(())
    }

    fn position(&self, index: usize) -> Option<usize> {
        self.array.iter().position(|&i| i == index)
    }
}

impl<T, C: Comparator<T>> ArrayIndirectPriorityQueue<T, C> {
    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.comparator.less(&self.refs[a], &self.refs[b])
    }

    fn find_first(&self) -> Option<usize> {
        if let Some(i) = self.first_index.get() {
            return Some(i);
        }
        if self.array.is_empty() {
            return None;
        }
        let mut best = 0;
        for i in 1..self.array.len() {
            if self.less(self.array[i], self.array[best]) {
                best = i;
            }
        }
        self.first_index.set(Some(best));
        Some(best)
    }
}

impl<T, C: Comparator<T>> IndirectPriorityQueue<T> for ArrayIndirectPriorityQueue<T, C> {
    fn enqueue(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        if self.position(index).is_some() {
            return Err(CollectionError::DuplicateIndex { index });
        }
        if let Some(first) = self.first_index.get() {
            if self.less(index, self.array[first]) {
                self.first_index.set(Some(self.array.len()));
            }
        }
        self.array.push(index);
        Ok(())
    }

    fn dequeue(&mut self) -> Option<usize> {
        let first = self.find_first()?;
        self.first_index.set(None);
        Some(self.array.remove(first))
    }

    fn first(&self) -> Option<usize> {
        self.find_first().map(|i| self.array[i])
    }

    fn last(&self) -> Option<usize> {
        let mut it = self.array.iter().copied();
        let mut best = it.next()?;
        for i in it {
            if self.less(best, i) {
                best = i;
            }
        }
        Some(best)
    }

    fn changed(&mut self) {
        self.first_index.set(None);
    }

    fn changed_index(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        if self.position(index).is_none() {
            return Err(CollectionError::NoSuchElement);
        }
        self.first_index.set(None);
        Ok(())
    }

    fn all_changed(&mut self) {
        self.first_index.set(None);
    }

    fn remove(&mut self, index: usize) -> bool {
        match self.position(index) {
            Some(pos) => {
                self.array.remove(pos);
                self.first_index.set(None);
                true
            }
            None => false,
        }
    }

    fn contains(&self, index: usize) -> bool {
        self.position(index).is_some()
    }

    fn front(&self, out: &mut Vec<usize>) -> usize {
        out.clear();
        if let Some(first) = self.first() {
            let top = &self.refs[first];
            out.extend(
                self.array
                    .iter()
                    .copied()
                    .filter(|&i| self.comparator.compare(&self.refs[i], top).is_eq()),
            );
        }
        out.len()
    }

    fn len(&self) -> usize {
        self.array.len()
    }

    fn clear(&mut self) {
        self.array.clear();
        self.first_index.set(None);
    }

    fn reference(&self) -> &[T] {
        &self.refs
    }

    fn set_reference(&mut self, index: usize, value: T) -> Result<()> {
        self.check(index)?;
        self.refs[index] = value;
        self.first_index.set(None);
        Ok(())
    }
}

impl<T: Debug, C> Debug for ArrayIndirectPriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.array.iter().map(|&i| &self.refs[i]))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::ReverseOrder;
    use crate::queues::HeapIndirectPriorityQueue;

    #[test]
    fn test_array_indirect_queue_basic() {
        let mut q = ArrayIndirectPriorityQueue::new(vec![30, 10, 50, 20]);
        for i in [0, 1, 2] {
            q.enqueue(i).unwrap();
        }
        assert_eq!(q.first(), Some(1));
        assert_eq!(q.last(), Some(2));
        q.enqueue(3).unwrap();
        assert_eq!(q.dequeue(), Some(1));
        assert_eq!(q.dequeue(), Some(3));
        assert_eq!(q.len(), 2);
        assert_eq!(format!("{:?}", q), "[30, 50]");
    }

    #[test]
    fn test_array_indirect_queue_rejects_bad_indices() {
        let mut q = ArrayIndirectPriorityQueue::new(vec!['a', 'b']);
        assert_eq!(q.enqueue(2), Err(CollectionError::out_of_bounds(2, 2)));
        q.enqueue(0).unwrap();
        assert_eq!(q.enqueue(0), Err(CollectionError::DuplicateIndex { index: 0 }));
        assert!(q.changed_index(5).is_err());
        assert!(!q.remove(1));
    }

    #[test]
    fn test_array_indirect_queue_reference_updates() {
        let mut q = ArrayIndirectPriorityQueue::new(vec![5, 6, 7]);
        for i in 0..3 {
            q.enqueue(i).unwrap();
        }
        assert_eq!(q.first(), Some(0));
        q.set_reference(2, 1).unwrap();
        assert_eq!(q.first(), Some(2));
        assert_eq!(q.reference(), &[5, 6, 1]);
        assert!(q.remove(2));
        assert!(!q.contains(2));
        assert_eq!(q.first(), Some(0));
        q.all_changed();
        assert_eq!(q.dequeue(), Some(0));
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.into_reference(), vec![5, 6, 1]);
    }

    #[test]
    fn test_array_indirect_queue_front_and_order() {
        let mut q = ArrayIndirectPriorityQueue::with_comparator(
            vec![4, 9, 9, 1, 9],
            ReverseOrder(NaturalOrder),
        );
        for i in 0..5 {
            q.enqueue(i).unwrap();
        }
        let mut out = Vec::new();
        assert_eq!(q.front(&mut out), 3);
        assert_eq!(out, vec![1, 2, 4]);
        assert_eq!(q.last(), Some(3));
        assert_eq!(q.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_array_indirect_queue_changed_index_requires_queued() {
        let mut array = ArrayIndirectPriorityQueue::new(vec![3, 1, 2]);
        let mut heap = HeapIndirectPriorityQueue::new(vec![3, 1, 2]);
        array.enqueue(0).unwrap();
        heap.enqueue(0).unwrap();
        assert_eq!(array.changed_index(1), Err(CollectionError::NoSuchElement));
        assert_eq!(heap.changed_index(1), Err(CollectionError::NoSuchElement));
        assert_eq!(array.changed_index(0), Ok(()));
        assert_eq!(heap.changed_index(0), Ok(()));
        assert_eq!(array.changed_index(3), Err(CollectionError::out_of_bounds(3, 3)));
    }
}
