use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::iter::{FromIterator, FusedIterator};
use std::ops::RangeBounds;

use crate::comparator::{Comparator, NaturalOrder};
use crate::maps::rb_tree_map::{self, RBTreeMap};
use crate::sets::AnySet;

/// A sorted set backed by [`RBTreeMap<K, (), C>`](RBTreeMap).
///
/// Iterates in comparator order and answers the navigation queries (`floor`,
/// `ceiling`, `lower`, `higher`) and key ranges of the underlying tree.
pub struct RBTreeSet<K, C = NaturalOrder> {
    map: RBTreeMap<K, (), C>,
}

impl<K> RBTreeSet<K, NaturalOrder> {
    pub fn new() -> Self {
        Self {
            map: RBTreeMap::new(),
        }
    }
}

impl<K: Ord> RBTreeSet<K, NaturalOrder> {
    /// Creates a set holding only `value`.
    pub fn singleton(value: K) -> Self {
        Self {
            map: RBTreeMap::singleton(value, ()),
        }
    }
}

impl<K, C> RBTreeSet<K, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            map: RBTreeMap::with_comparator(comparator),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn comparator(&self) -> &C {
        self.map.comparator()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Smallest element.
    pub fn first(&self) -> Option<&K> {
        self.map.first_key()
    }

    /// Greatest element.
    pub fn last(&self) -> Option<&K> {
        self.map.last_key()
    }

    pub fn pop_first(&mut self) -> Option<K> {
        self.map.pop_first().map(|(k, _)| k)
    }

    pub fn pop_last(&mut self) -> Option<K> {
        self.map.pop_last().map(|(k, _)| k)
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.map.iter(),
        }
    }
}

impl<K, C: Comparator<K>> RBTreeSet<K, C> {
    /// Adds `value` if absent. Returns `true` if it was newly inserted.
    pub fn insert(&mut self, value: K) -> bool {
        if self.map.contains_key(&value) {
            return false;
        }
        self.map.insert(value, ());
        true
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.contains_key(value)
    }

    pub fn get<Q>(&self, value: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.get_key_value(value).map(|(k, _)| k)
    }

    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.remove(value).is_some()
    }

    pub fn take<Q>(&mut self, value: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.remove_entry(value).map(|(k, _)| k)
    }

    /// Greatest element `<= value`.
    pub fn floor<Q>(&self, value: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.floor(value).map(|(k, _)| k)
    }

    /// Least element `>= value`.
    pub fn ceiling<Q>(&self, value: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.ceiling(value).map(|(k, _)| k)
    }

    /// Greatest element `< value`.
    pub fn lower<Q>(&self, value: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.lower(value).map(|(k, _)| k)
    }

    /// Least element `> value`.
    pub fn higher<Q>(&self, value: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.higher(value).map(|(k, _)| k)
    }

    /// Elements inside `range`: head set (`..to`), tail set (`from..`) or
    /// subset (`from..to`).
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
    {
        Range {
            inner: self.map.range(range),
        }
    }

    /// Elements strictly after `value`, which need not be present.
    pub fn iter_from<Q>(&self, value: &Q) -> Range<'_, K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Range {
            inner: self.map.iter_from(value),
        }
    }

    pub fn retain<F: FnMut(&K) -> bool>(&mut self, mut f: F) {
        self.map.retain(|k, _| f(k));
    }

    pub fn is_subset<O: AnySet<K>>(&self, other: &O) -> bool {
        self.iter().all(|v| other.contains(v))
    }

    pub fn is_disjoint<O: AnySet<K>>(&self, other: &O) -> bool {
        self.iter().all(|v| !other.contains(v))
    }

    /// Values in `self` but not in `other`, in sorted order.
    pub fn difference<'a, O: AnySet<K>>(&'a self, other: &'a O) -> impl Iterator<Item = &'a K> {
        self.iter().filter(move |v| !other.contains(v))
    }

    /// Values in both `self` and `other`, in sorted order.
    pub fn intersection<'a, O: AnySet<K>>(&'a self, other: &'a O) -> impl Iterator<Item = &'a K> {
        self.iter().filter(move |v| other.contains(v))
    }
}

// --- Iterators ---

/// Iterator over an [`RBTreeSet`] in sorted order.
pub struct Iter<'a, K> {
    inner: rb_tree_map::Iter<'a, K, ()>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

/// Iterator over a range of an [`RBTreeSet`].
pub struct Range<'a, K> {
    inner: rb_tree_map::Range<'a, K, ()>,
}

impl<'a, K> Iterator for Range<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<K> DoubleEndedIterator for Range<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K> FusedIterator for Range<'_, K> {}

impl<K, C> IntoIterator for RBTreeSet<K, C> {
    type Item = K;
    type IntoIter = std::iter::Map<rb_tree_map::IntoIter<K, ()>, fn((K, ())) -> K>;

    fn into_iter(self) -> Self::IntoIter {
        let key: fn((K, ())) -> K = |(k, _)| k;
        self.map.into_iter().map(key)
    }
}

impl<'a, K, C> IntoIterator for &'a RBTreeSet<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- Trait Implementations ---

impl<K, C: Comparator<K>> AnySet<K> for RBTreeSet<K, C> {
    fn contains(&self, value: &K) -> bool {
        RBTreeSet::contains(self, value)
    }
}

impl<K: Clone, C: Clone> Clone for RBTreeSet<K, C> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K, C: Default> Default for RBTreeSet<K, C> {
    fn default() -> Self {
        Self {
            map: RBTreeMap::default(),
        }
    }
}

impl<K: Debug, C> Debug for RBTreeSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, C: Comparator<K>> PartialEq for RBTreeSet<K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K, C: Comparator<K>> Extend<K> for RBTreeSet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.insert(k);
        }
    }
}

impl<K, C: Comparator<K> + Default> FromIterator<K> for RBTreeSet<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{FloatOrder, ReverseOrder};
    use rand::Rng;
    use std::collections::BTreeSet;
    use std::ops::Bound;

    #[test]
    fn test_rb_tree_set_sorted_order() {
        let mut set: RBTreeSet<i32> = [5, 1, 9, 3, 7].into_iter().collect();
        assert!(!set.insert(3));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5, 7, 9]);
        assert_eq!(set.first(), Some(&1));
        assert_eq!(set.last(), Some(&9));
        assert_eq!(set.iter().rev().next(), Some(&9));
        assert_eq!(set.pop_first(), Some(1));
        assert_eq!(set.pop_last(), Some(9));
        assert!(set.remove(&5));
        assert_eq!(set.take(&7), Some(7));
        assert_eq!(set.len(), 1);
        assert_eq!(format!("{:?}", set), "{3}");
    }

    #[test]
    fn test_rb_tree_set_navigation() {
        let set: RBTreeSet<u32> = (0..10).map(|x| x * 10).collect();
        assert_eq!(set.floor(&35), Some(&30));
        assert_eq!(set.floor(&30), Some(&30));
        assert_eq!(set.ceiling(&35), Some(&40));
        assert_eq!(set.lower(&30), Some(&20));
        assert_eq!(set.higher(&30), Some(&40));
        assert_eq!(set.lower(&0), None);
        assert_eq!(set.higher(&90), None);
    }

    #[test]
    fn test_rb_tree_set_ranges() {
        fn collect(r: Range<'_, u32>) -> Vec<u32> {
            r.copied().collect()
        }
        let set: RBTreeSet<u32> = (0..10).collect();
        assert_eq!(collect(set.range(3..6)), vec![3, 4, 5]);
        assert_eq!(collect(set.range(..2)), vec![0, 1]);
        assert_eq!(collect(set.range(8..)), vec![8, 9]);
        assert_eq!(
            collect(set.range::<u32, _>((Bound::Excluded(2), Bound::Included(4)))),
            vec![3, 4]
        );
        assert_eq!(collect(set.iter_from(&6)), vec![7, 8, 9]);
        assert_eq!(set.range(2..6).rev().next(), Some(&5));
        assert!(collect(set.range(20..30)).is_empty());
    }

    #[test]
    fn test_rb_tree_set_comparators() {
        let mut desc = RBTreeSet::with_comparator(ReverseOrder(NaturalOrder));
        desc.extend(["b", "c", "a"]);
        assert_eq!(desc.iter().copied().collect::<Vec<_>>(), vec!["c", "b", "a"]);
        assert_eq!(desc.first(), Some(&"c"));

        let mut floats = RBTreeSet::with_comparator(FloatOrder);
        floats.extend([2.5f64, f64::NAN, -1.0, 0.0]);
        assert_eq!(floats.first(), Some(&-1.0));
        assert!(floats.last().is_some_and(|v: &f64| v.is_nan()));
    }

    #[test]
    fn test_rb_tree_set_random_against_btree() {
        let mut rng = rand::thread_rng();
        let mut set = RBTreeSet::new();
        let mut model = BTreeSet::new();
        for _ in 0..5000 {
            let k: i16 = rng.gen_range(-300..300);
            if rng.gen_bool(0.6) {
                assert_eq!(set.insert(k), model.insert(k));
            } else {
                assert_eq!(set.remove(&k), model.remove(&k));
            }
        }
        assert!(set.iter().eq(model.iter()));
        assert!(set.is_subset(&model));
        let odd: BTreeSet<i16> = model.iter().copied().filter(|v| v % 2 != 0).collect();
        assert!(set.difference(&odd).all(|v| v % 2 == 0));
        assert_eq!(set.intersection(&odd).count(), odd.len());
    }

    #[test]
    fn test_rb_tree_set_retain_and_into_iter() {
        let mut set: RBTreeSet<i32> = (1..=10).collect();
        set.retain(|v| v % 3 == 0);
        assert_eq!(set.clone().into_iter().collect::<Vec<_>>(), vec![3, 6, 9]);
        let other: RBTreeSet<i32> = [9, 6, 3].into_iter().collect();
        assert_eq!(set, other);
        assert!(set.get(&6).is_some());
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_rb_tree_set_singleton() {
        let set = RBTreeSet::singleton(7);
        assert_eq!(set.len(), 1);
        assert_eq!(set.first(), Some(&7));
        assert!(set.contains(&7));
    }
}
