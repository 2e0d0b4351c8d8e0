use core::marker::PhantomData;
use core::mem;
use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::iter::{FromIterator, FusedIterator};
use std::ops::{Add, Index, IndexMut};

use crate::error::{CollectionError, Result};
use crate::function::{self, Function};
use crate::hash::{DefaultStrategy, HashConfig, Strategy};
use crate::maps::raw_table::{Probe, RawTable};
use crate::utils::IndexType;

/// An [`OpenHashMap`](crate::OpenHashMap) that remembers insertion order.
///
/// # Overview
/// * **Order:** every occupied slot carries `prev`/`next` slot links, forming a
///   doubly-linked list from [`first_key`](Self::first_key) to
///   [`last_key`](Self::last_key). Re-inserting an existing key keeps its place.
/// * **Reordering:** the `*_and_move_to_first/last` operations splice an entry to
///   either end in O(1), which makes the map usable as an LRU index.
/// * **Rehash:** entries are re-inserted walking the list, so order survives growth
///   and shrinkage.
///
/// # Example
/// ```rust
/// use prim_collections::LinkedOpenHashMap;
///
/// let mut map = LinkedOpenHashMap::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
/// map.insert("c", 3);
/// map.get_and_move_to_first(&"c");
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, ["c", "b", "a"]);
/// ```
pub struct LinkedOpenHashMap<K, V, S = DefaultStrategy> {
    table: RawTable<Node<K, V>>,
    /// Slot of the first entry in iteration order, or `NONE`.
    first: u32,
    /// Slot of the last entry in iteration order, or `NONE`.
    last: u32,
    strategy: S,
    default_value: Option<V>,
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: u32,
    next: u32,
}

#[inline]
fn node_at<K, V>(slots: &mut [Option<Node<K, V>>], pos: u32) -> &mut Node<K, V> {
    match &mut slots[pos.as_usize()] {
        Some(node) => node,
        None => unreachable!("Logic Error: link points at an empty slot"),
    }
}

/// Re-points the neighbours of the node that moved from `from` to `to`.
fn fix_pointers<K, V>(
    slots: &mut [Option<Node<K, V>>],
    first: &mut u32,
    last: &mut u32,
    from: usize,
    to: usize,
) {
    let to = u32::from_usize(to);
    let (prev, next) = {
        let node = node_at(slots, to);
        (node.prev, node.next)
    };
    if prev.is_some() {
        node_at(slots, prev).next = to;
    } else {
        debug_assert_eq!(first.as_usize(), from);
        *first = to;
    }
    if next.is_some() {
        node_at(slots, next).prev = to;
    } else {
        debug_assert_eq!(last.as_usize(), from);
        *last = to;
    }
}

// --- 1. Construction & Accessors ---

impl<K, V> LinkedOpenHashMap<K, V, DefaultStrategy> {
    pub fn new() -> Self {
        Self::with_config(HashConfig::default())
    }

    /// Creates an empty map able to hold `expected` entries without rehashing.
    ///
    /// # Panics
    /// Panics if the required table is larger than the maximum table size.
    pub fn with_capacity(expected: usize) -> Self {
        match HashConfig::default().with_expected(expected) {
            Ok(config) => Self::with_config(config),
            Err(err) => panic!("{err}"),
        }
    }

    pub fn with_config(config: HashConfig) -> Self {
        Self::with_config_and_strategy(config, DefaultStrategy)
    }
}

impl<K, V, S> LinkedOpenHashMap<K, V, S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self::with_config_and_strategy(HashConfig::default(), strategy)
    }

    pub fn with_config_and_strategy(config: HashConfig, strategy: S) -> Self {
        Self {
            table: RawTable::new(config.table_size(), config.load_factor()),
            first: u32::NONE,
            last: u32::NONE,
            strategy,
            default_value: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.max_fill()
    }

    #[inline]
    pub fn table_size(&self) -> usize {
        self.table.n()
    }

    #[inline]
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.first = u32::NONE;
        self.last = u32::NONE;
    }

    #[inline]
    fn node(&self, pos: u32) -> &Node<K, V> {
        match self.table.get(pos.as_usize()) {
            Some(node) => node,
            None => unreachable!("Logic Error: link points at an empty slot"),
        }
    }

    #[inline]
    fn node_mut(&mut self, pos: u32) -> &mut Node<K, V> {
        node_at(self.table.slots_mut(), pos)
    }

    /// Unlinks the node at `pos` from the list, leaving it in its slot.
    fn detach(&mut self, pos: u32) {
        let (prev, next) = {
            let node = self.node(pos);
            (node.prev, node.next)
        };
        if prev.is_some() {
            self.node_mut(prev).next = next;
        } else {
            self.first = next;
        }
        if next.is_some() {
            self.node_mut(next).prev = prev;
        } else {
            self.last = prev;
        }
    }

    fn attach_front(&mut self, pos: u32) {
        let old_first = self.first;
        {
            let node = self.node_mut(pos);
            node.prev = u32::NONE;
            node.next = old_first;
        }
        if old_first.is_some() {
            self.node_mut(old_first).prev = pos;
        } else {
            self.last = pos;
        }
        self.first = pos;
    }

    fn attach_back(&mut self, pos: u32) {
        let old_last = self.last;
        {
            let node = self.node_mut(pos);
            node.prev = old_last;
            node.next = u32::NONE;
        }
        if old_last.is_some() {
            self.node_mut(old_last).next = pos;
        } else {
            self.first = pos;
        }
        self.last = pos;
    }

    /// Slot positions in list order.
    fn order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        let mut cur = self.first;
        while let Some(pos) = cur.get() {
            out.push(pos);
            cur = self.node(cur).next;
        }
        out
    }

    /// Takes every entry out in list order, leaving the map empty.
    fn take_in_order(&mut self) -> Vec<(K, V)> {
        let order = self.order();
        let slots = self.table.slots_mut();
        let mut out = Vec::with_capacity(order.len());
        for pos in order {
            if let Some(node) = slots[pos].take() {
                out.push((node.key, node.value));
            }
        }
        self.clear();
        out
    }

    pub fn first_key(&self) -> Option<&K> {
        self.first.get().map(|_| &self.node(self.first).key)
    }

    pub fn last_key(&self) -> Option<&K> {
        self.last.get().map(|_| &self.node(self.last).key)
    }

    /// Returns the first entry in iteration order.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.first.get().map(|_| {
            let node = self.node(self.first);
            (&node.key, &node.value)
        })
    }

    /// Returns the last entry in iteration order.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.last.get().map(|_| {
            let node = self.node(self.last);
            (&node.key, &node.value)
        })
    }

    /// Iterates in list order. Double-ended: `iter().rev()` walks from the last entry.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.table.slots(),
            front: self.first,
            back: self.last,
            remaining: self.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let (front, back, remaining) = (self.first, self.last, self.len());
        IterMut {
            slots: self.table.slots_mut().as_mut_ptr(),
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> + ExactSizeIterator {
        self.iter_mut().map(|(_, v)| v)
    }

    /// Removes every entry, returning them in iteration order.
    pub fn drain(&mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.take_in_order().into_iter(),
        }
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

// --- 2. Keyed Operations ---

impl<K, V, S> LinkedOpenHashMap<K, V, S>
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
        self.table.find(hash, |node| {
            <S as Strategy<Q>>::equals(strategy, node.key.borrow(), key)
        })
    }

    #[inline]
    fn find<Q>(&self, key: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        match self.probe(key) {
            Probe::Found(pos) => Some(u32::from_usize(pos)),
            Probe::Vacant(_) => None,
        }
    }

    /// Rebuilds the table with `n` slots, re-inserting in list order.
    fn rehash(&mut self, n: usize) {
        let order = self.order();
        let strategy = &self.strategy;
        let placed = self
            .table
            .rehash_ordered(n, &order, |node| <S as Strategy<K>>::hash(strategy, &node.key));

        let slots = self.table.slots_mut();
        for (i, &pos) in placed.iter().enumerate() {
            let node = node_at(slots, u32::from_usize(pos));
            node.prev = if i == 0 { u32::NONE } else { u32::from_usize(placed[i - 1]) };
            node.next = match placed.get(i + 1) {
                Some(&next) => u32::from_usize(next),
                None => u32::NONE,
            };
        }
        self.first = placed.first().map_or(u32::NONE, |&p| u32::from_usize(p));
        self.last = placed.last().map_or(u32::NONE, |&p| u32::from_usize(p));
    }

    fn prepare_vacant(&mut self, key: &K, pos: usize) -> usize {
        if !self.table.is_full() {
            return pos;
        }
        let n = self.table.grown_size();
        self.rehash(n);
        match self.probe(key) {
            Probe::Vacant(pos) => pos,
            Probe::Found(_) => unreachable!("Logic Error: key appeared during rehash"),
        }
    }

    /// Stores a new entry in the vacant slot `pos` and links it at the front or back.
    fn insert_new(&mut self, pos: usize, key: K, value: V, front: bool) -> u32 {
        let pos = self.prepare_vacant(&key, pos);
        self.table.insert_at(
            pos,
            Node {
                key,
                value,
                prev: u32::NONE,
                next: u32::NONE,
            },
        );
        let pos = u32::from_usize(pos);
        if front {
            self.attach_front(pos);
        } else {
            self.attach_back(pos);
        }
        pos
    }

    fn remove_at(&mut self, pos: u32) -> (K, V) {
        self.detach(pos);
        let strategy = &self.strategy;
        let first = &mut self.first;
        let last = &mut self.last;
        let node = self.table.remove_at(
            pos.as_usize(),
            |node| <S as Strategy<K>>::hash(strategy, &node.key),
            |slots, from, to| fix_pointers(slots, first, last, from, to),
        );
        if self.table.should_shrink() {
            let n = self.table.n() / 2;
            self.rehash(n);
        }
        (node.key, node.value)
    }

    /// Inserts a pair. A new key goes to the end of the order; an existing key
    /// keeps its position and gets the new value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.probe(&key) {
            Probe::Found(pos) => {
                let node = self.node_mut(u32::from_usize(pos));
                Some(mem::replace(&mut node.value, value))
            }
            Probe::Vacant(pos) => {
                self.insert_new(pos, key, value, false);
                None
            }
        }
    }

    /// Inserts a pair and moves it to the front of the order.
    pub fn insert_and_move_to_first(&mut self, key: K, value: V) -> Option<V> {
        match self.probe(&key) {
            Probe::Found(pos) => {
                let pos = u32::from_usize(pos);
                self.move_to_first(pos);
                Some(mem::replace(&mut self.node_mut(pos).value, value))
            }
            Probe::Vacant(pos) => {
                self.insert_new(pos, key, value, true);
                None
            }
        }
    }

    /// Inserts a pair and moves it to the back of the order.
    pub fn insert_and_move_to_last(&mut self, key: K, value: V) -> Option<V> {
        match self.probe(&key) {
            Probe::Found(pos) => {
                let pos = u32::from_usize(pos);
                self.move_to_last(pos);
                Some(mem::replace(&mut self.node_mut(pos).value, value))
            }
            Probe::Vacant(pos) => {
                self.insert_new(pos, key, value, false);
                None
            }
        }
    }

    fn move_to_first(&mut self, pos: u32) {
        if self.first != pos {
            self.detach(pos);
            self.attach_front(pos);
        }
    }

    fn move_to_last(&mut self, pos: u32) {
        if self.last != pos {
            self.detach(pos);
            self.attach_back(pos);
        }
    }

    /// Returns the value of `key` and moves the entry to the front.
    pub fn get_and_move_to_first<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        let pos = self.find(key)?;
        self.move_to_first(pos);
        Some(&mut self.node_mut(pos).value)
    }

    /// Returns the value of `key` and moves the entry to the back.
    pub fn get_and_move_to_last<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        let pos = self.find(key)?;
        self.move_to_last(pos);
        Some(&mut self.node_mut(pos).value)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.find(key).map(|pos| &self.node(pos).value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        let pos = self.find(key)?;
        Some(&mut self.node_mut(pos).value)
    }

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
        self.find(key).is_some()
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        let pos = self.find(key)?;
        Some(self.remove_at(pos))
    }

    /// Removes and returns the first entry in iteration order.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let pos = self.first;
        pos.get().map(|_| self.remove_at(pos))
    }

    /// Removes and returns the last entry in iteration order.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let pos = self.last;
        pos.get().map(|_| self.remove_at(pos))
    }

    /// Adds `increment` to the value of `key` (appending the key with
    /// `default_return_value + increment` if missing). Returns the previous value.
    pub fn add_to(&mut self, key: K, increment: V) -> V
    where
        V: Copy + Default + Add<Output = V>,
    {
        match self.probe(&key) {
            Probe::Found(pos) => {
                let node = self.node_mut(u32::from_usize(pos));
                let old = node.value;
                node.value = old + increment;
                old
            }
            Probe::Vacant(pos) => {
                let seed = function::seed(&self.default_value);
                self.insert_new(pos, key, seed + increment, false);
                seed
            }
        }
    }

    pub fn put_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        match self.probe(&key) {
            Probe::Found(pos) => Some(&self.node(u32::from_usize(pos)).value),
            Probe::Vacant(pos) => {
                self.insert_new(pos, key, value, false);
                None
            }
        }
    }

    /// Returns an iterator over the entries that follow `key` in iteration order.
    ///
    /// # Errors
    /// [`CollectionError::NoSuchElement`] if `key` is not in the map.
    pub fn iter_from<Q>(&self, key: &Q) -> Result<Iter<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        let pos = self.find(key).ok_or(CollectionError::NoSuchElement)?;
        let front = self.node(pos).next;
        let mut remaining = 0;
        let mut cur = front;
        while cur.is_some() {
            remaining += 1;
            cur = self.node(cur).next;
        }
        Ok(Iter {
            slots: self.table.slots(),
            front,
            back: self.last,
            remaining,
        })
    }

    /// Keeps only the entries for which `f` returns `true`, preserving order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        for (k, mut v) in self.take_in_order() {
            if f(&k, &mut v) {
                match self.probe(&k) {
                    Probe::Vacant(pos) => {
                        self.insert_new(pos, k, v, false);
                    }
                    Probe::Found(_) => unreachable!("Logic Error: duplicate key while retaining"),
                }
            }
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        if let Some(n) = self.table.reserve_size(additional) {
            self.rehash(n);
        }
    }

    pub fn trim(&mut self) {
        self.trim_to(0);
    }

    pub fn trim_to(&mut self, n: usize) {
        if let Some(l) = self.table.trim_size(n) {
            log::debug!("trimming linked open hash map to {} slots", l);
            self.rehash(l);
        }
    }
}

// --- 3. Iterator Support ---

/// Iterator over a [`LinkedOpenHashMap`] in list order.
pub struct Iter<'a, K, V> {
    slots: &'a [Option<Node<K, V>>],
    front: u32,
    back: u32,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    #[inline]
    fn node(&self, pos: u32) -> &'a Node<K, V> {
        match &self.slots[pos.as_usize()] {
            Some(node) => node,
            None => unreachable!("Logic Error: link points at an empty slot"),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.node(self.front);
        self.front = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.node(self.back);
        self.back = node.prev;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

/// Mutable iterator over a [`LinkedOpenHashMap`] in list order.
pub struct IterMut<'a, K, V> {
    slots: *mut Option<Node<K, V>>,
    front: u32,
    back: u32,
    remaining: usize,
    _marker: PhantomData<&'a mut Node<K, V>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    /// # Safety
    /// `pos` must be a linked slot that has not been yielded yet.
    #[inline]
    unsafe fn node(&self, pos: u32) -> &'a mut Node<K, V> {
        // SAFETY: the list visits each occupied slot once and `remaining` stops the
        // two ends before they cross, so no slot is handed out twice.
        unsafe {
            match &mut *self.slots.add(pos.as_usize()) {
                Some(node) => node,
                None => unreachable!("Logic Error: link points at an empty slot"),
            }
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: `front` is linked and not yet yielded while `remaining > 0`.
        let node = unsafe { self.node(self.front) };
        self.front = node.next;
        self.remaining -= 1;
        Some((&node.key, &mut node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: `back` is linked and not yet yielded while `remaining > 0`.
        let node = unsafe { self.node(self.back) };
        self.back = node.prev;
        self.remaining -= 1;
        Some((&node.key, &mut node.value))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator over a [`LinkedOpenHashMap`] in list order.
pub struct IntoIter<K, V> {
    inner: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for LinkedOpenHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter {
            inner: self.take_in_order().into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedOpenHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut LinkedOpenHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// --- 4. Trait Implementations ---

impl<K, V, S: Strategy<K>> Function<K, V> for LinkedOpenHashMap<K, V, S> {
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

impl<K, V, Q, S> Index<&Q> for LinkedOpenHashMap<K, V, S>
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

impl<K, V, Q, S> IndexMut<&Q> for LinkedOpenHashMap<K, V, S>
where
    K: Borrow<Q>,
    Q: ?Sized,
    S: Strategy<K> + Strategy<Q>,
{
    fn index_mut(&mut self, key: &Q) -> &mut V {
        self.get_mut(key).expect("no entry found for key")
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for LinkedOpenHashMap<K, V, S> {
    fn clone(&self) -> Self {
        // Slot positions are copied verbatim, so the links stay valid.
        Self {
            table: self.table.clone(),
            first: self.first,
            last: self.last,
            strategy: self.strategy.clone(),
            default_value: self.default_value.clone(),
        }
    }
}

impl<K, V, S: Default> Default for LinkedOpenHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_config_and_strategy(HashConfig::default(), S::default())
    }
}

impl<K: Debug, V: Debug, S> Debug for LinkedOpenHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Map equality: order is not compared.
impl<K, V: PartialEq, S: Strategy<K>> PartialEq for LinkedOpenHashMap<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S: Strategy<K>> Extend<(K, V)> for LinkedOpenHashMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S: Strategy<K> + Default> FromIterator<(K, V)> for LinkedOpenHashMap<K, V, S> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

// --- 5. Test Suite ---
