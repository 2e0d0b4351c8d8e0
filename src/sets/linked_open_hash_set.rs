use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::iter::{FromIterator, FusedIterator};

use crate::error::Result;
use crate::hash::{DefaultStrategy, HashConfig, Strategy};
use crate::maps::linked_open_hash_map::{self, LinkedOpenHashMap};
use crate::sets::AnySet;

/// An [`OpenHashSet`](crate::OpenHashSet) that iterates in insertion order.
///
/// Wraps `LinkedOpenHashMap<K, (), S>`. Besides the usual set operations it exposes
/// both ends of the order (`first`, `last`, `pop_first`, `pop_last`) and can splice
/// an element to either end, which makes it a compact LRU set.
pub struct LinkedOpenHashSet<K, S = DefaultStrategy> {
    map: LinkedOpenHashMap<K, (), S>,
}

impl<K> LinkedOpenHashSet<K, DefaultStrategy> {
    pub fn new() -> Self {
        Self {
            map: LinkedOpenHashMap::new(),
        }
    }

    pub fn with_capacity(expected: usize) -> Self {
        Self {
            map: LinkedOpenHashMap::with_capacity(expected),
        }
    }

    pub fn with_config(config: HashConfig) -> Self {
        Self {
            map: LinkedOpenHashMap::with_config(config),
        }
    }
}

impl<K, S> LinkedOpenHashSet<K, S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self {
            map: LinkedOpenHashMap::with_strategy(strategy),
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

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// First element in iteration order.
    pub fn first(&self) -> Option<&K> {
        self.map.first_key()
    }

    /// Last element in iteration order.
    pub fn last(&self) -> Option<&K> {
        self.map.last_key()
    }

    /// Iterates in insertion order. Double-ended.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter { inner: self.map.iter() }
    }
}

impl<K, S: Strategy<K>> LinkedOpenHashSet<K, S> {
    /// Appends `value` if absent. Returns `true` if it was newly inserted.
    pub fn insert(&mut self, value: K) -> bool {
        self.map.put_if_absent(value, ()).is_none()
    }

    /// Adds `value` (if absent) and moves it to the front of the order.
    /// Returns `true` if it was newly inserted.
    pub fn insert_and_move_to_first(&mut self, value: K) -> bool {
        self.map.insert_and_move_to_first(value, ()).is_none()
    }

    /// Adds `value` (if absent) and moves it to the back of the order.
    /// Returns `true` if it was newly inserted.
    pub fn insert_and_move_to_last(&mut self, value: K) -> bool {
        self.map.insert_and_move_to_last(value, ()).is_none()
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.map.contains_key(value)
    }

    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.map.remove(value).is_some()
    }

    pub fn pop_first(&mut self) -> Option<K> {
        self.map.pop_first().map(|(k, _)| k)
    }

    pub fn pop_last(&mut self) -> Option<K> {
        self.map.pop_last().map(|(k, _)| k)
    }

    /// Iterates over the elements after `value` in insertion order.
    ///
    /// # Errors
    /// [`CollectionError::NoSuchElement`](crate::CollectionError::NoSuchElement)
    /// if `value` is not in the set.
    pub fn iter_from<Q>(&self, value: &Q) -> Result<Iter<'_, K>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        Ok(Iter {
            inner: self.map.iter_from(value)?,
        })
    }

    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.map.retain(|k, _| f(k));
    }

    pub fn trim(&mut self) {
        self.map.trim();
    }

    pub fn is_subset<O: AnySet<K>>(&self, other: &O) -> bool {
        self.iter().all(|v| other.contains(v))
    }

    pub fn is_disjoint<O: AnySet<K>>(&self, other: &O) -> bool {
        self.iter().all(|v| !other.contains(v))
    }

    /// Values in `self` but not in `other`, in insertion order.
    pub fn difference<'a, O>(&'a self, other: &'a O) -> impl Iterator<Item = &'a K>
    where
        O: AnySet<K>,
    {
        self.iter().filter(move |v| !other.contains(v))
    }

    /// Values in both `self` and `other`, in insertion order.
    pub fn intersection<'a, O>(&'a self, other: &'a O) -> impl Iterator<Item = &'a K>
    where
        O: AnySet<K>,
    {
        self.iter().filter(move |v| other.contains(v))
    }
}

/// An iterator over a [`LinkedOpenHashSet`] in insertion order.
pub struct Iter<'a, K> {
    inner: linked_open_hash_map::Iter<'a, K, ()>,
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

impl<K, S> IntoIterator for LinkedOpenHashSet<K, S> {
    type Item = K;
    type IntoIter = std::iter::Map<linked_open_hash_map::IntoIter<K, ()>, fn((K, ())) -> K>;

    fn into_iter(self) -> Self::IntoIter {
        let key: fn((K, ())) -> K = |(k, _)| k;
        self.map.into_iter().map(key)
    }
}

impl<'a, K, S> IntoIterator for &'a LinkedOpenHashSet<K, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, S: Strategy<K>> AnySet<K> for LinkedOpenHashSet<K, S> {
    fn contains(&self, value: &K) -> bool {
        LinkedOpenHashSet::contains(self, value)
    }
}

impl<K: Clone, S: Clone> Clone for LinkedOpenHashSet<K, S> {
    fn clone(&self) -> Self {
        Self { map: self.map.clone() }
    }
}

impl<K, S: Default> Default for LinkedOpenHashSet<K, S> {
    fn default() -> Self {
        Self {
            map: LinkedOpenHashMap::default(),
        }
    }
}

impl<K: Debug, S> Debug for LinkedOpenHashSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S: Strategy<K>> PartialEq for LinkedOpenHashSet<K, S> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K, S: Strategy<K>> Extend<K> for LinkedOpenHashSet<K, S> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.insert(k);
        }
    }
}

impl<K, S: Strategy<K> + Default> FromIterator<K> for LinkedOpenHashSet<K, S> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}
