use core::mem;
use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::iter::{FromIterator, FusedIterator};
use std::ops::{Add, Index, IndexMut};

use crate::function::{self, Function};
use crate::hash::{DefaultStrategy, HashConfig, Strategy};
use crate::maps::raw_table::{Probe, RawTable};

/// A hash map with open addressing, linear probing and tombstone-free deletion.
///
/// # Overview
/// * **Storage:** one power-of-two array of slots; no per-entry allocation.
/// * **Hashing:** a pluggable [`Strategy`]. The default is `Hash + Eq` with FNV;
///   use [`FloatBitsStrategy`](crate::hash::FloatBitsStrategy) for float keys or
///   [`IdentityStrategy`](crate::hash::IdentityStrategy) for reference identity.
/// * **Growth:** the table doubles as soon as it holds more than
///   `load_factor · slots` entries and halves when a removal leaves it a quarter full.
/// * **Deletion:** backward shifting, so lookups never scan tombstones.
///
/// # Example
/// ```rust
/// use prim_collections::OpenHashMap;
///
/// let mut counts: OpenHashMap<char, u32> = OpenHashMap::new();
/// for c in "hello".chars() {
///     counts.add_to(c, 1);
/// }
/// assert_eq!(counts.get(&'l'), Some(&2));
/// assert_eq!(counts.get_or_default(&'z'), 0);
/// ```
pub struct OpenHashMap<K, V, S = DefaultStrategy> {
    table: RawTable<(K, V)>,
    strategy: S,
    /// Value returned for missing keys by `get_or_default` and used to seed `add_to`.
    default_value: Option<V>,
}

// --- 1. Construction ---

impl<K, V> OpenHashMap<K, V, DefaultStrategy> {
    /// Creates an empty map sized for 16 entries with load factor 0.75.
    pub fn new() -> Self {
        Self::with_config(HashConfig::default())
    }

    /// Creates an empty map able to hold `expected` entries without rehashing.
    ///
    /// # Panics
    /// Panics if the required table exceeds [`MAX_ARRAY_SIZE`](crate::hash::MAX_ARRAY_SIZE)
    /// slots. Use [`HashConfig::new`] for a fallible alternative.
    pub fn with_capacity(expected: usize) -> Self {
        match HashConfig::default().with_expected(expected) {
            Ok(config) => Self::with_config(config),
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an empty map with explicit sizing.
    pub fn with_config(config: HashConfig) -> Self {
        Self::with_config_and_strategy(config, DefaultStrategy)
    }
}

impl<K: std::hash::Hash + Eq, V> OpenHashMap<K, V, DefaultStrategy> {
    /// Creates a map holding only `key -> value`, on the smallest table.
    pub fn singleton(key: K, value: V) -> Self {
        let mut map = Self::with_capacity(1);
        map.insert(key, value);
        map
    }
}

impl<K, V, S> OpenHashMap<K, V, S> {
    /// Creates an empty map using a custom hashing strategy.
    pub fn with_strategy(strategy: S) -> Self {
        Self::with_config_and_strategy(HashConfig::default(), strategy)
    }

    pub fn with_config_and_strategy(config: HashConfig, strategy: S) -> Self {
        Self {
            table: RawTable::new(config.table_size(), config.load_factor()),
            strategy,
            default_value: None,
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Number of entries the map can hold before its table grows.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.max_fill()
    }

    /// Number of slots in the backing table.
    #[inline]
    pub fn table_size(&self) -> usize {
        self.table.n()
    }

    #[inline]
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the hashing strategy.
    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Removes every entry. The table keeps its size.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Removes every entry, returning them as an iterator.
    pub fn drain(&mut self) -> std::vec::IntoIter<(K, V)> {
        self.table.take_all().into_iter()
    }

    /// Returns an iterator over `(&K, &V)` in table order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.table.slots().iter(),
            remaining: self.table.len(),
        }
    }

    /// Returns an iterator over `(&K, &mut V)` in table order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let remaining = self.table.len();
        IterMut {
            slots: self.table.slots_mut().iter_mut(),
            remaining,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns `true` if some key maps to `value`. Linear in the table size.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

// --- 2. Keyed Operations ---

impl<K, V, S> OpenHashMap<K, V, S>
where
    S: Strategy<K>,
{
    #[inline]
    fn probe<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        let strategy = &self.strategy;
        let hash = <S as Strategy<Q>>::hash(strategy, key);
        self.table
            .find(hash, |(k, _)| <S as Strategy<Q>>::equals(strategy, k.borrow(), key))
    }

    /// Doubles the table (or more) so that one more entry fits.
    fn grow(&mut self) {
        let n = self.table.grown_size();
        self.rehash(n);
    }

    fn rehash(&mut self, n: usize) {
        let strategy = &self.strategy;
        self.table
            .rehash(n, |(k, _)| <S as Strategy<K>>::hash(strategy, k));
    }

    /// Makes sure the vacant slot `pos` found for `key` can be filled, growing
    /// the table first if it is at its fill limit. Returns the slot to use.
    fn prepare_vacant(&mut self, key: &K, pos: usize) -> usize {
        if !self.table.is_full() {
            return pos;
        }
        self.grow();
        match self.probe(key) {
            Probe::Vacant(pos) => pos,
            Probe::Found(_) => unreachable!("Logic Error: key appeared during rehash"),
        }
    }

    fn remove_at(&mut self, pos: usize) -> (K, V) {
        let strategy = &self.strategy;
        let entry = self.table.remove_at(
            pos,
            |(k, _)| <S as Strategy<K>>::hash(strategy, k),
            |_, _, _| {},
        );
        if self.table.should_shrink() {
            let n = self.table.n() / 2;
            self.rehash(n);
        }
        entry
    }

    #[inline]
    fn entry_at(&self, pos: usize) -> &(K, V) {
        match self.table.get(pos) {
            Some(e) => e,
            None => unreachable!("Logic Error: probe reported an empty slot as found"),
        }
    }

    #[inline]
    fn entry_at_mut(&mut self, pos: usize) -> &mut (K, V) {
        match self.table.get_mut(pos) {
            Some(e) => e,
            None => unreachable!("Logic Error: probe reported an empty slot as found"),
        }
    }

    /// Inserts a key-value pair, returning the previous value of the key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.probe(&key) {
            Probe::Found(pos) => Some(mem::replace(&mut self.entry_at_mut(pos).1, value)),
            Probe::Vacant(pos) => {
                let pos = self.prepare_vacant(&key, pos);
                self.table.insert_at(pos, (key, value));
                None
            }
        }
    }

    /// Returns a reference to the value of `key`.
    ///
    /// Generic over the borrowed form `Q`, so `OpenHashMap<String, _>` can be
    /// queried with `&str` (the strategy must hash both forms identically, which
    /// [`DefaultStrategy`] does).
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        match self.probe(key) {
            Probe::Found(pos) => Some(&self.entry_at(pos).1),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns the stored key and value of `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        match self.probe(key) {
            Probe::Found(pos) => {
                let (k, v) = self.entry_at(pos);
                Some((k, v))
            }
            Probe::Vacant(_) => None,
        }
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        match self.probe(key) {
            Probe::Found(pos) => Some(&mut self.entry_at_mut(pos).1),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns the value of `key`, else the default return value, else `V::default()`.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
        V: Clone + Default,
    {
        match self.get(key).or(self.default_value.as_ref()) {
            Some(v) => v.clone(),
            None => V::default(),
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Removes `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and its value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        match self.probe(key) {
            Probe::Found(pos) => Some(self.remove_at(pos)),
            Probe::Vacant(_) => None,
        }
    }

    /// Adds `increment` to the value of `key`, inserting
    /// `default_return_value + increment` if the key is missing.
    ///
    /// Returns the value before the addition (the default for a new key).
    pub fn add_to(&mut self, key: K, increment: V) -> V
    where
        V: Copy + Default + Add<Output = V>,
    {
        match self.probe(&key) {
            Probe::Found(pos) => {
                let slot = &mut self.entry_at_mut(pos).1;
                let old = *slot;
                *slot = old + increment;
                old
            }
            Probe::Vacant(pos) => {
                let seed = function::seed(&self.default_value);
                let pos = self.prepare_vacant(&key, pos);
                self.table.insert_at(pos, (key, seed + increment));
                seed
            }
        }
    }

    /// Inserts `value` only if `key` is absent. Returns the existing value otherwise.
    pub fn put_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        match self.probe(&key) {
            Probe::Found(pos) => Some(&self.entry_at(pos).1),
            Probe::Vacant(pos) => {
                let pos = self.prepare_vacant(&key, pos);
                self.table.insert_at(pos, (key, value));
                None
            }
        }
    }

    /// Returns the stored key equal to `key`, inserting `(key, value())` first if absent.
    pub(crate) fn insert_or_get_key<F>(&mut self, key: K, value: F) -> &K
    where
        F: FnOnce() -> V,
    {
        let pos = match self.probe(&key) {
            Probe::Found(pos) => pos,
            Probe::Vacant(pos) => {
                let pos = self.prepare_vacant(&key, pos);
                self.table.insert_at(pos, (key, value()));
                pos
            }
        };
        &self.entry_at(pos).0
    }

    /// Replaces the value of an existing key. Does nothing for a missing key.
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.get_mut(key).map(|slot| mem::replace(slot, value))
    }

    /// Replaces the value of `key` only if it currently equals `old`.
    pub fn replace_if_eq<Q>(&mut self, key: &Q, old: &V, new: V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
        V: PartialEq,
    {
        match self.get_mut(key) {
            Some(slot) if *slot == *old => {
                *slot = new;
                true
            }
            _ => false,
        }
    }

    /// Removes `key` only if it currently maps to `value`.
    pub fn remove_if_eq<Q>(&mut self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
        V: PartialEq,
    {
        match self.probe(key) {
            Probe::Found(pos) if self.entry_at(pos).1 == *value => {
                self.remove_at(pos);
                true
            }
            _ => false,
        }
    }

    /// Returns the value of `key`, computing and inserting it first if absent.
    pub fn compute_if_absent<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce(&K) -> V,
    {
        let pos = match self.probe(&key) {
            Probe::Found(pos) => pos,
            Probe::Vacant(pos) => {
                let value = f(&key);
                let pos = self.prepare_vacant(&key, pos);
                self.table.insert_at(pos, (key, value));
                pos
            }
        };
        &mut self.entry_at_mut(pos).1
    }

    /// Recomputes the value of a present key; `None` from `f` removes the key.
    pub fn compute_if_present<Q, F>(&mut self, key: &Q, f: F) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
        F: FnOnce(&K, &V) -> Option<V>,
    {
        let pos = match self.probe(key) {
            Probe::Found(pos) => pos,
            Probe::Vacant(_) => return None,
        };
        let (k, v) = self.entry_at(pos);
        match f(k, v) {
            Some(new) => {
                let slot = &mut self.entry_at_mut(pos).1;
                *slot = new;
                Some(slot)
            }
            None => {
                self.remove_at(pos);
                None
            }
        }
    }

    /// Computes a new mapping from the current one (`None` if absent).
    /// `None` from `f` removes the key.
    pub fn compute<F>(&mut self, key: K, f: F) -> Option<&mut V>
    where
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        match self.probe(&key) {
            Probe::Found(pos) => {
                let (k, v) = self.entry_at(pos);
                match f(k, Some(v)) {
                    Some(new) => {
                        let slot = &mut self.entry_at_mut(pos).1;
                        *slot = new;
                        Some(slot)
                    }
                    None => {
                        self.remove_at(pos);
                        None
                    }
                }
            }
            Probe::Vacant(pos) => {
                let value = f(&key, None)?;
                let pos = self.prepare_vacant(&key, pos);
                self.table.insert_at(pos, (key, value));
                Some(&mut self.entry_at_mut(pos).1)
            }
        }
    }

    /// Inserts `value` if `key` is absent, otherwise replaces the value with
    /// `f(old, value)`; `None` from `f` removes the key.
    pub fn merge<F>(&mut self, key: K, value: V, f: F) -> Option<&mut V>
    where
        F: FnOnce(&V, V) -> Option<V>,
    {
        match self.probe(&key) {
            Probe::Found(pos) => match f(&self.entry_at(pos).1, value) {
                Some(new) => {
                    let slot = &mut self.entry_at_mut(pos).1;
                    *slot = new;
                    Some(slot)
                }
                None => {
                    self.remove_at(pos);
                    None
                }
            },
            Probe::Vacant(pos) => {
                let pos = self.prepare_vacant(&key, pos);
                self.table.insert_at(pos, (key, value));
                Some(&mut self.entry_at_mut(pos).1)
            }
        }
    }

    /// Retains only the entries for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        // Removing in place would shift entries under the cursor; rebuild instead.
        for (k, mut v) in self.table.take_all() {
            if f(&k, &mut v) {
                match self.probe(&k) {
                    Probe::Vacant(pos) => self.table.insert_at(pos, (k, v)),
                    Probe::Found(_) => unreachable!("Logic Error: duplicate key while retaining"),
                }
            }
        }
    }

    /// Reserves room for `additional` more entries without rehashing.
    pub fn reserve(&mut self, additional: usize) {
        if let Some(n) = self.table.reserve_size(additional) {
            self.rehash(n);
        }
    }

    /// Shrinks the table to the smallest size that holds the current entries.
    pub fn trim(&mut self) {
        self.trim_to(0);
    }

    /// Shrinks the table to the smallest size that holds `max(n, len)` entries.
    /// Does nothing if the table is already that small.
    pub fn trim_to(&mut self, n: usize) {
        if let Some(l) = self.table.trim_size(n) {
            log::debug!("trimming open hash map to {} slots", l);
            self.rehash(l);
        }
    }
}

// --- 3. Entry API Support ---

impl<K, V, S> OpenHashMap<K, V, S>
where
    S: Strategy<K>,
{
    /// Gets the given key's corresponding entry for in-place manipulation.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, S> {
        match self.probe(&key) {
            Probe::Found(pos) => Entry::Occupied(OccupiedEntry { map: self, pos }),
            Probe::Vacant(pos) => {
                // Grow now so that the slot handed out stays valid for the insert.
                let pos = self.prepare_vacant(&key, pos);
                Entry::Vacant(VacantEntry {
                    map: self,
                    pos,
                    key,
                })
            }
        }
    }
}

/// A view into a single entry of an [`OpenHashMap`].
pub enum Entry<'a, K, V, S> {
    Occupied(OccupiedEntry<'a, K, V, S>),
    Vacant(VacantEntry<'a, K, V, S>),
}

pub struct OccupiedEntry<'a, K, V, S> {
    map: &'a mut OpenHashMap<K, V, S>,
    pos: usize,
}

pub struct VacantEntry<'a, K, V, S> {
    map: &'a mut OpenHashMap<K, V, S>,
    pos: usize,
    key: K,
}

impl<'a, K, V, S: Strategy<K>> Entry<'a, K, V, S> {
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(default),
        }
    }

    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(default()),
        }
    }

    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }

    pub fn and_modify<F: FnOnce(&mut V)>(mut self, f: F) -> Self {
        if let Entry::Occupied(e) = &mut self {
            f(e.get_mut());
        }
        self
    }

    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(e) => e.key(),
            Entry::Vacant(e) => &e.key,
        }
    }
}

impl<'a, K, V, S: Strategy<K>> OccupiedEntry<'a, K, V, S> {
    pub fn key(&self) -> &K {
        &self.map.entry_at(self.pos).0
    }

    pub fn get(&self) -> &V {
        &self.map.entry_at(self.pos).1
    }

    pub fn get_mut(&mut self) -> &mut V {
        &mut self.map.entry_at_mut(self.pos).1
    }

    pub fn into_mut(self) -> &'a mut V {
        &mut self.map.entry_at_mut(self.pos).1
    }

    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    pub fn remove(self) -> V {
        self.map.remove_at(self.pos).1
    }
}

impl<'a, K, V, S: Strategy<K>> VacantEntry<'a, K, V, S> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_key(self) -> K {
        self.key
    }

    pub fn insert(self, value: V) -> &'a mut V {
        self.map.table.insert_at(self.pos, (self.key, value));
        &mut self.map.entry_at_mut(self.pos).1
    }
}

// --- 4. Iterator Support ---

/// Iterator over the entries of an [`OpenHashMap`].
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Option<(K, V)>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some((k, v)) = slot {
                self.remaining -= 1;
                return Some((k, v));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.slots.next_back() {
            if let Some((k, v)) = slot {
                self.remaining -= 1;
                return Some((k, v));
            }
        }
        None
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// Mutable iterator over the entries of an [`OpenHashMap`].
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Option<(K, V)>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some((k, v)) = slot {
                self.remaining -= 1;
                return Some((&*k, v));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Owning iterator over the entries of an [`OpenHashMap`].
pub struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Option<(K, V)>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        for slot in self.slots.by_ref() {
            if slot.is_some() {
                self.remaining -= 1;
                return slot;
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for OpenHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let remaining = self.table.len();
        IntoIter {
            slots: self.table.into_slots().into_vec().into_iter(),
            remaining,
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a OpenHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut OpenHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// --- 5. Trait Implementations ---

impl<K, V, S: Strategy<K>> Function<K, V> for OpenHashMap<K, V, S> {
    fn get_value(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn default_return_value(&self) -> Option<&V> {
        self.default_value.as_ref()
    }

    fn set_default_return_value(&mut self, value: V) {
        self.default_value = Some(value);
    }
}

/// Allows read access using `map[&key]`.
///
/// # Panics
/// Panics if the key is not present in the map.
impl<K, V, Q, S> Index<&Q> for OpenHashMap<K, V, S>
where
    K: Borrow<Q>,
    Q: ?Sized,
    S: Strategy<K> + Strategy<Q>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

/// Allows mutable access using `map[&key] = new_value`.
///
/// # Panics
/// Panics if the key is not present in the map.
impl<K, V, Q, S> IndexMut<&Q> for OpenHashMap<K, V, S>
where
    K: Borrow<Q>,
    Q: ?Sized,
    S: Strategy<K> + Strategy<Q>,
{
    fn index_mut(&mut self, key: &Q) -> &mut V {
        self.get_mut(key).expect("no entry found for key")
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for OpenHashMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            strategy: self.strategy.clone(),
            default_value: self.default_value.clone(),
        }
    }
}

impl<K, V, S: Default> Default for OpenHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_config_and_strategy(HashConfig::default(), S::default())
    }
}

impl<K: Debug, V: Debug, S> Debug for OpenHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal if they hold the same mappings under `self`'s strategy.
impl<K, V: PartialEq, S: Strategy<K>> PartialEq for OpenHashMap<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V: Eq, S: Strategy<K>> Eq for OpenHashMap<K, V, S> {}

impl<K, V, S: Strategy<K>> Extend<(K, V)> for OpenHashMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S: Strategy<K> + Default> FromIterator<(K, V)> for OpenHashMap<K, V, S> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for OpenHashMap<K, V>
where
    K: std::hash::Hash + Eq,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

// --- 6. Test Suite ---
