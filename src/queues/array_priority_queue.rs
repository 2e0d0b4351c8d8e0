use std::cell::Cell;
use std::fmt::{self, Debug};
use std::iter::FromIterator;

use crate::comparator::{Comparator, NaturalOrder};
use crate::queues::PriorityQueue;

/// A priority queue over an unsorted array.
///
/// `enqueue` is O(1) and `dequeue` is O(n). The position of the least element is
/// cached: an enqueue of a smaller element updates the cache, and it is only
/// recomputed after a dequeue or [`changed`](Self::changed). Suited to very small
/// queues, where a scan beats heap maintenance.
pub struct ArrayPriorityQueue<T, C = NaturalOrder> {
    array: Vec<T>,
    comparator: C,
    first_index: Cell<Option<usize>>,
}

impl<T> ArrayPriorityQueue<T, NaturalOrder> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C> ArrayPriorityQueue<T, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            array: Vec::new(),
            comparator,
            first_index: Cell::new(None),
        }
    }

    /// Wraps `items` as they are. No reordering is needed.
    pub fn from_vec_with_comparator(items: Vec<T>, comparator: C) -> Self {
        Self {
            array: items,
            comparator,
            first_index: Cell::new(None),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn clear(&mut self) {
        self.array.clear();
        self.first_index.set(None);
    }

    pub fn trim(&mut self) {
        self.array.shrink_to_fit();
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.array.iter()
    }

    /// Marks the cached first position stale after the first element was modified.
    pub fn changed(&mut self) {
        self.first_index.set(None);
    }
}

impl<T, C: Comparator<T>> ArrayPriorityQueue<T, C> {
    fn find_first(&self) -> Option<usize> {
        if let Some(i) = self.first_index.get() {
            return Some(i);
        }
        if self.array.is_empty() {
            return None;
        }
        let mut best = 0;
        for i in 1..self.array.len() {
            if self.comparator.less(&self.array[i], &self.array[best]) {
                best = i;
            }
        }
        self.first_index.set(Some(best));
        Some(best)
    }

    fn find_last(&self) -> Option<usize> {
        if self.array.is_empty() {
            return None;
        }
        let mut best = 0;
        for i in 1..self.array.len() {
            if self.comparator.less(&self.array[best], &self.array[i]) {
                best = i;
            }
        }
        Some(best)
    }

    pub fn enqueue(&mut self, item: T) {
        if let Some(first) = self.first_index.get() {
            if self.comparator.less(&item, &self.array[first]) {
                self.first_index.set(Some(self.array.len()));
            }
        }
        self.array.push(item);
    }

    /// Removes and returns the least element. Equal elements leave in the order
    /// they were enqueued.
    pub fn dequeue(&mut self) -> Option<T> {
        let first = self.find_first()?;
        self.first_index.set(None);
        Some(self.array.remove(first))
    }

    /// The least element.
    pub fn first(&self) -> Option<&T> {
        self.find_first().map(|i| &self.array[i])
    }

    /// Mutable access to the least element. Call [`changed`](Self::changed) afterwards.
    pub fn first_mut(&mut self) -> Option<&mut T> {
        let i = self.find_first()?;
        self.array.get_mut(i)
    }

    /// The greatest element.
    pub fn last(&self) -> Option<&T> {
        self.find_last().map(|i| &self.array[i])
    }
}

impl<T: Ord> ArrayPriorityQueue<T, NaturalOrder> {
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_vec_with_comparator(items, NaturalOrder)
    }
}

impl<T, C: Comparator<T>> PriorityQueue<T> for ArrayPriorityQueue<T, C> {
    fn enqueue(&mut self, item: T) {
        ArrayPriorityQueue::enqueue(self, item);
    }
    fn dequeue(&mut self) -> Option<T> {
        ArrayPriorityQueue::dequeue(self)
    }
    fn first(&self) -> Option<&T> {
        ArrayPriorityQueue::first(self)
    }
    fn len(&self) -> usize {
        ArrayPriorityQueue::len(self)
    }
    fn clear(&mut self) {
        ArrayPriorityQueue::clear(self);
    }
    fn changed(&mut self) {
        ArrayPriorityQueue::changed(self);
    }
}

impl<T: Clone, C: Clone> Clone for ArrayPriorityQueue<T, C> {
    fn clone(&self) -> Self {
        Self {
            array: self.array.clone(),
            comparator: self.comparator.clone(),
            first_index: self.first_index.clone(),
        }
    }
}

impl<T, C: Default> Default for ArrayPriorityQueue<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Debug, C> Debug for ArrayPriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.array.iter()).finish()
    }
}

impl<T, C: Comparator<T>> Extend<T> for ArrayPriorityQueue<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T, C: Comparator<T> + Default> FromIterator<T> for ArrayPriorityQueue<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec_with_comparator(iter.into_iter().collect(), C::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::ByKey;
    use rand::Rng;
    use std::collections::BTreeMap;

    #[test]
    fn test_array_queue_basic_ops() {
        let mut q: ArrayPriorityQueue<i32> = ArrayPriorityQueue::new();
        assert_eq!(q.first(), None);
        assert_eq!(q.last(), None);
        q.extend([6, 2, 9, 4]);
        assert_eq!(q.first(), Some(&2));
        assert_eq!(q.last(), Some(&9));
        q.enqueue(1);
        assert_eq!(q.first(), Some(&1));
        assert_eq!(q.dequeue(), Some(1));
        assert_eq!(q.dequeue(), Some(2));
        // Remaining elements keep insertion order.
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![6, 9, 4]);
        assert_eq!(format!("{:?}", q), "[6, 9, 4]");
    }

    #[test]
    fn test_array_queue_cache_after_mutation() {
        let mut q = ArrayPriorityQueue::from_vec(vec![5, 3, 8]);
        assert_eq!(q.first(), Some(&3));
        if let Some(v) = q.first_mut() {
            *v = 10;
        }
        q.changed();
        assert_eq!(q.first(), Some(&5));
        assert_eq!(q.last(), Some(&10));
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn test_array_queue_ties_leave_in_position_order() {
        let mut q = ArrayPriorityQueue::with_comparator(ByKey::new(|p: &(u8, char)| p.0));
        q.extend([(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')]);
        let order: String = std::iter::from_fn(|| q.dequeue()).map(|p| p.1).collect();
        assert_eq!(order, "bdac");
    }

    #[test]
    fn test_array_queue_random_against_model() {
        let mut rng = rand::thread_rng();
        let mut q = ArrayPriorityQueue::new();
        let mut model: BTreeMap<i32, usize> = BTreeMap::new();
        for _ in 0..2000 {
            if rng.gen_bool(0.55) {
                let v = rng.gen_range(-100..100);
                q.enqueue(v);
                *model.entry(v).or_default() += 1;
            } else {
                let expected = model.keys().next().copied();
                if let Some(k) = expected {
                    let count = model.get_mut(&k).unwrap();
                    *count -= 1;
                    if *count == 0 {
                        model.remove(&k);
                    }
                }
                assert_eq!(q.dequeue(), expected);
            }
            assert_eq!(q.first(), model.keys().next());
            assert_eq!(q.last(), model.keys().next_back());
        }
    }
}
