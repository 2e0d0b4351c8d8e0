use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::iter::{FromIterator, FusedIterator};

use crate::hash::{DefaultStrategy, HashConfig, Strategy};
use crate::maps::open_hash_map::{self, OpenHashMap};
use crate::sets::AnySet;

/// A hash set with open addressing and a pluggable hashing [`Strategy`].
///
/// # Implementation Details
/// This is a wrapper around `OpenHashMap<K, (), S>`. Since `()` is a zero-sized type,
/// each slot holds just the key, so the wrapper costs nothing over a dedicated set
/// table while sharing its probing, growth and backward-shift deletion.
///
/// # Example
/// ```rust
/// use prim_collections::OpenHashSet;
///
/// let mut set: OpenHashSet<&str> = ["a", "b"].into_iter().collect();
/// assert!(!set.insert("a"));
/// assert!(set.contains("b"));
/// assert_eq!(set.len(), 2);
/// ```
pub struct OpenHashSet<K, S = DefaultStrategy> {
    map: OpenHashMap<K, (), S>,
}

impl<K> OpenHashSet<K, DefaultStrategy> {
    pub fn new() -> Self {
        Self { map: OpenHashMap::new() }
    }

    /// Creates an empty set able to hold `expected` elements without rehashing.
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            map: OpenHashMap::with_capacity(expected),
        }
    }

    pub fn with_config(config: HashConfig) -> Self {
        Self {
            map: OpenHashMap::with_config(config),
        }
    }
}

impl<K: std::hash::Hash + Eq> OpenHashSet<K, DefaultStrategy> {
    /// Creates a set holding only `value`, on the smallest table.
    pub fn singleton(value: K) -> Self {
        Self {
            map: OpenHashMap::singleton(value, ()),
        }
    }
}

impl<K, S> OpenHashSet<K, S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self {
            map: OpenHashMap::with_strategy(strategy),
        }
    }

    pub fn with_config_and_strategy(config: HashConfig, strategy: S) -> Self {
        Self {
            map: OpenHashMap::with_config_and_strategy(config, strategy),
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

    #[inline]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    #[inline]
    pub fn table_size(&self) -> usize {
        self.map.table_size()
    }

    #[inline]
    pub fn strategy(&self) -> &S {
        self.map.strategy()
    }

    /// Clears the set. The table keeps its size.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns an iterator visiting all elements in table order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter { inner: self.map.keys() }
    }

    /// Removes every element, returning them as an iterator.
    pub fn drain(&mut self) -> impl Iterator<Item = K> + '_ {
        self.map.drain().map(|(k, _)| k)
    }
}

impl<K, S: Strategy<K>> OpenHashSet<K, S> {
    /// Adds a value to the set. Returns `true` if it was newly inserted.
    pub fn insert(&mut self, value: K) -> bool {
        self.map.put_if_absent(value, ()).is_none()
    }

    /// Returns the element equal to `value`, inserting `value` first if absent.
    ///
    /// Useful for canonicalizing (interning) equal values.
    pub fn insert_or_get(&mut self, value: K) -> &K {
        self.map.insert_or_get_key(value, || ())
    }

    /// Adds a value, replacing an equal stored element. Returns the replaced one.
    pub fn replace(&mut self, value: K) -> Option<K> {
        let old = self.map.remove_entry(&value).map(|(k, _)| k);
        self.map.insert(value, ());
        old
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.map.contains_key(value)
    }

    /// Returns the stored element equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.map.get_key_value(value).map(|(k, _)| k)
    }

    /// Removes a value. Returns `true` if it was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the stored element equal to `value`.
    pub fn take<Q>(&mut self, value: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.map.remove_entry(value).map(|(k, _)| k)
    }

    /// Retains only the elements specified by the predicate.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.map.retain(|k, _| f(k));
    }

    pub fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional);
    }

    /// Shrinks the table to the smallest size holding the current elements.
    pub fn trim(&mut self) {
        self.map.trim();
    }

    pub fn trim_to(&mut self, n: usize) {
        self.map.trim_to(n);
    }

    // --- Set Operations ---

    /// Values in `self` but not in `other`. `other` can be any [`AnySet`].
    pub fn difference<'a, O>(&'a self, other: &'a O) -> impl Iterator<Item = &'a K>
    where
        O: AnySet<K>,
    {
        self.iter().filter(move |v| !other.contains(v))
    }

    /// Values in both `self` and `other`.
    pub fn intersection<'a, O>(&'a self, other: &'a O) -> impl Iterator<Item = &'a K>
    where
        O: AnySet<K>,
    {
        self.iter().filter(move |v| other.contains(v))
    }

    /// Values in `self` or `other`, without duplicates.
    pub fn union<'a, I>(&'a self, other: I) -> impl Iterator<Item = &'a K>
    where
        I: IntoIterator<Item = &'a K>,
        I::IntoIter: 'a,
    {
        self.iter()
            .chain(other.into_iter().filter(move |v| !self.contains(*v)))
    }

    pub fn is_disjoint<O: AnySet<K>>(&self, other: &O) -> bool {
        self.iter().all(|v| !other.contains(v))
    }

    pub fn is_subset<O: AnySet<K>>(&self, other: &O) -> bool {
        self.iter().all(|v| other.contains(v))
    }

    pub fn is_superset<'a, I>(&self, other: I) -> bool
    where
        K: 'a,
        I: IntoIterator<Item = &'a K>,
    {
        other.into_iter().all(|v| self.contains(v))
    }
}

// --- Iterators ---

/// An iterator over the elements of an [`OpenHashSet`].
pub struct Iter<'a, K> {
    inner: open_hash_map::Keys<'a, K, ()>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

/// A consuming iterator for [`OpenHashSet`].
pub struct IntoIter<K> {
    inner: open_hash_map::IntoIter<K, ()>,
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}

impl<K, S> IntoIterator for OpenHashSet<K, S> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, K, S> IntoIterator for &'a OpenHashSet<K, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- Trait Implementations ---

impl<K, S: Strategy<K>> AnySet<K> for OpenHashSet<K, S> {
    fn contains(&self, value: &K) -> bool {
        OpenHashSet::contains(self, value)
    }
}

impl<K: Clone, S: Clone> Clone for OpenHashSet<K, S> {
    fn clone(&self) -> Self {
        Self { map: self.map.clone() }
    }
}

impl<K, S: Default> Default for OpenHashSet<K, S> {
    fn default() -> Self {
        Self {
            map: OpenHashMap::default(),
        }
    }
}

impl<K: Debug, S> Debug for OpenHashSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S: Strategy<K>> PartialEq for OpenHashSet<K, S> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K, S: Strategy<K>> Eq for OpenHashSet<K, S> {}

impl<K, S: Strategy<K>> Extend<K> for OpenHashSet<K, S> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.map.extend(iter.into_iter().map(|k| (k, ())));
    }
}

impl<K, S: Strategy<K> + Default> FromIterator<K> for OpenHashSet<K, S> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}
