use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::iter::{FromIterator, FusedIterator};

use crate::error::Result;
use crate::hash::{
    big_array_size, check_load_factor, max_fill_u64, mix, DefaultStrategy, Strategy,
    DEFAULT_INITIAL_SIZE, DEFAULT_LOAD_FACTOR,
};
use crate::lists::big_array::{self, BigVec, SEGMENT_SHIFT};
use crate::sets::AnySet;

/// An open-addressing hash set whose table is a [`BigVec`], so it can outgrow the
/// single-allocation ceiling of [`OpenHashSet`](crate::OpenHashSet).
///
/// Probing, backward-shift deletion and the grow/shrink policy are the same as the
/// other hash tables of the crate; only sizes and positions are `u64`. The table
/// doubles when an insertion pushes the size past the fill threshold and halves
/// when a removal leaves it under a quarter of that threshold.
///
/// `SHIFT` is forwarded to the slot [`BigVec`].
pub struct OpenHashBigSet<K, S = DefaultStrategy, const SHIFT: u32 = SEGMENT_SHIFT> {
    slots: BigVec<Option<K>, SHIFT>,
    n: u64,
    mask: u64,
    len: u64,
    max_fill: u64,
    min_n: u64,
    load_factor: f32,
    strategy: S,
}

fn empty_slots<K, const SHIFT: u32>(n: u64) -> BigVec<Option<K>, SHIFT> {
    let mut slots = BigVec::new();
    slots.resize_with(n, || None);
    slots
}

impl<K> OpenHashBigSet<K, DefaultStrategy> {
    pub fn new() -> Self {
        Self::with_strategy(DefaultStrategy)
    }

    /// A set sized for `expected` elements at load factor `load_factor`.
    ///
    /// # Errors
    /// [`CollectionError::InvalidLoadFactor`](crate::CollectionError::InvalidLoadFactor)
    /// unless `0 < load_factor <= 1`.
    pub fn with_expected(expected: u64, load_factor: f32) -> Result<Self> {
        Self::with_expected_and_strategy(expected, load_factor, DefaultStrategy)
    }
}

impl<K, S, const SHIFT: u32> OpenHashBigSet<K, S, SHIFT> {
    pub fn with_strategy(strategy: S) -> Self {
        let n = big_array_size(DEFAULT_INITIAL_SIZE as u64, DEFAULT_LOAD_FACTOR);
        Self::build(n, DEFAULT_LOAD_FACTOR, strategy)
    }

    pub fn with_expected_and_strategy(expected: u64, load_factor: f32, strategy: S) -> Result<Self> {
        check_load_factor(load_factor)?;
        let n = big_array_size(expected, load_factor);
        Ok(Self::build(n, load_factor, strategy))
    }

    fn build(n: u64, load_factor: f32, strategy: S) -> Self {
        Self {
            slots: empty_slots(n),
            n,
            mask: n - 1,
            len: 0,
            max_fill: max_fill_u64(n, load_factor),
            min_n: n,
            load_factor,
            strategy,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len64(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of slots.
    #[inline]
    pub fn table_size(&self) -> u64 {
        self.n
    }

    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Removes every element. The table keeps its size.
    pub fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.len = 0;
    }

    /// Iterates over the elements in table order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.slots.iter(),
            remaining: self.len,
        }
    }
}

impl<K, S: Strategy<K>, const SHIFT: u32> OpenHashBigSet<K, S, SHIFT> {
    #[inline]
    fn home(&self, key: &K) -> u64 {
        mix(<S as Strategy<K>>::hash(&self.strategy, key)) & self.mask
    }

    /// `Ok(pos)` of the slot holding `key`, or `Err(pos)` of the free slot that
    /// ends its probe sequence.
    fn probe<Q>(&self, key: &Q) -> std::result::Result<u64, u64>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        let mut pos = mix(<S as Strategy<Q>>::hash(&self.strategy, key)) & self.mask;
        loop {
            match &self.slots[pos] {
                None => return Err(pos),
                Some(k) if <S as Strategy<Q>>::equals(&self.strategy, k.borrow(), key) => {
                    return Ok(pos);
                }
                Some(_) => pos = (pos + 1) & self.mask,
            }
        }
    }

    fn rehash(&mut self, new_n: u64) {
        log::debug!(
            "OpenHashBigSet rehash: {} -> {} slots ({} elements)",
            self.n,
            new_n,
            self.len
        );
        let old = std::mem::replace(&mut self.slots, empty_slots(new_n));
        self.n = new_n;
        self.mask = new_n - 1;
        self.max_fill = max_fill_u64(new_n, self.load_factor);
        for key in old.into_iter().flatten() {
            let mut pos = self.home(&key);
            while self.slots[pos].is_some() {
                pos = (pos + 1) & self.mask;
            }
            self.slots[pos] = Some(key);
        }
    }

    /// Closes the gap at `pos` by shifting back the entries of the run after it.
    fn shift_keys(&mut self, mut pos: u64) {
        loop {
            let last = pos;
            pos = (pos + 1) & self.mask;
            loop {
                let home = match &self.slots[pos] {
                    None => {
                        self.slots[last] = None;
                        return;
                    }
                    Some(k) => self.home(k),
                };
                let movable = if last <= pos {
                    last >= home || home > pos
                } else {
                    last >= home && home > pos
                };
                if movable {
                    break;
                }
                pos = (pos + 1) & self.mask;
            }
            let moved = self.slots[pos].take();
            self.slots[last] = moved;
        }
    }

    /// Adds `key` if absent. Returns `true` if it was newly inserted.
    pub fn insert(&mut self, key: K) -> bool {
        match self.probe(&key) {
            Ok(_) => false,
            Err(pos) => {
                self.slots[pos] = Some(key);
                self.len += 1;
                if self.len > self.max_fill {
                    self.rehash(self.n * 2);
                }
                true
            }
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.probe(key).is_ok()
    }

    /// The stored element equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        let pos = self.probe(key).ok()?;
        self.slots[pos].as_ref()
    }

    /// Removes and returns the stored element equal to `key`.
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        let pos = self.probe(key).ok()?;
        let key = self.slots[pos].take();
        self.shift_keys(pos);
        self.len -= 1;
        if self.n > self.min_n && self.len < self.max_fill / 4 && self.n > 16 {
            self.rehash(self.n / 2);
        }
        key
    }

    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: Strategy<Q>,
    {
        self.take(key).is_some()
    }

    pub fn retain<F: FnMut(&K) -> bool>(&mut self, mut f: F) {
        let old = std::mem::replace(&mut self.slots, empty_slots(self.n));
        self.len = 0;
        for key in old.into_iter().flatten() {
            if f(&key) {
                let mut pos = self.home(&key);
                while self.slots[pos].is_some() {
                    pos = (pos + 1) & self.mask;
                }
                self.slots[pos] = Some(key);
                self.len += 1;
            }
        }
    }

    /// Shrinks the table to the smallest size that holds the current elements.
    /// Returns `false` only if that size could not be reached.
    pub fn trim(&mut self) -> bool {
        self.trim_to(self.len)
    }

    /// Shrinks the table to the size needed for `expected` elements, unless that is
    /// not smaller than the current table or cannot hold the current elements.
    pub fn trim_to(&mut self, expected: u64) -> bool {
        let l = big_array_size(expected, self.load_factor);
        if l >= self.n || self.len > max_fill_u64(l, self.load_factor) {
            return true;
        }
        log::debug!("OpenHashBigSet trim: {} -> {} slots", self.n, l);
        self.rehash(l);
        self.min_n = l;
        true
    }

    pub fn is_subset<O: AnySet<K>>(&self, other: &O) -> bool {
        self.iter().all(|v| other.contains(v))
    }

    pub fn is_disjoint<O: AnySet<K>>(&self, other: &O) -> bool {
        self.iter().all(|v| !other.contains(v))
    }
}

/// Iterator over an [`OpenHashBigSet`].
pub struct Iter<'a, K> {
    inner: big_array::Iter<'a, Option<K>>,
    remaining: u64,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.inner.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

impl<'a, K, S, const SHIFT: u32> IntoIterator for &'a OpenHashBigSet<K, S, SHIFT> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, S, const SHIFT: u32> IntoIterator for OpenHashBigSet<K, S, SHIFT> {
    type Item = K;
    type IntoIter = std::iter::Flatten<<BigVec<Option<K>, SHIFT> as IntoIterator>::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter().flatten()
    }
}

impl<K, S: Strategy<K>, const SHIFT: u32> AnySet<K> for OpenHashBigSet<K, S, SHIFT> {
    fn contains(&self, value: &K) -> bool {
        OpenHashBigSet::contains(self, value)
    }
}

impl<K: Clone, S: Clone, const SHIFT: u32> Clone for OpenHashBigSet<K, S, SHIFT> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            n: self.n,
            mask: self.mask,
            len: self.len,
            max_fill: self.max_fill,
            min_n: self.min_n,
            load_factor: self.load_factor,
            strategy: self.strategy.clone(),
        }
    }
}

impl<K, S: Default, const SHIFT: u32> Default for OpenHashBigSet<K, S, SHIFT> {
    fn default() -> Self {
        Self::with_strategy(S::default())
    }
}

impl<K: Debug, S, const SHIFT: u32> Debug for OpenHashBigSet<K, S, SHIFT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S: Strategy<K>, const SHIFT: u32> PartialEq for OpenHashBigSet<K, S, SHIFT> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|k| other.contains(k))
    }
}

impl<K, S: Strategy<K>, const SHIFT: u32> Extend<K> for OpenHashBigSet<K, S, SHIFT> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.insert(k);
        }
    }
}

impl<K, S: Strategy<K> + Default, const SHIFT: u32> FromIterator<K> for OpenHashBigSet<K, S, SHIFT> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectionError;
    use crate::hash::FloatBitsStrategy;
    use rand::Rng;
    use std::collections::HashSet;

    // Slot segments of eight entries, so every table spans several segments.
    type SmallSegments<K> = OpenHashBigSet<K, DefaultStrategy, 3>;

    fn check_placement<K, S: Strategy<K>, const SHIFT: u32>(set: &OpenHashBigSet<K, S, SHIFT>) {
        // Every element must be reachable from its home slot without crossing a hole.
        for pos in 0..set.n {
            if let Some(k) = &set.slots[pos] {
                let mut p = set.home(k);
                while p != pos {
                    assert!(set.slots[p].is_some(), "hole between home and slot {pos}");
                    p = (p + 1) & set.mask;
                }
            }
        }
    }

    #[test]
    fn test_big_set_basic_crud() {
        let mut set: OpenHashBigSet<String> = OpenHashBigSet::new();
        assert_eq!(set.table_size(), 32);
        assert!(set.insert("alpha".to_string()));
        assert!(!set.insert("alpha".to_string()));
        assert!(set.insert("beta".to_string()));
        assert_eq!(set.len64(), 2);
        assert!(set.contains("alpha"));
        assert_eq!(set.get("beta").map(String::as_str), Some("beta"));
        assert!(set.remove("alpha"));
        assert!(!set.remove("alpha"));
        assert_eq!(set.take("beta"), Some("beta".to_string()));
        assert!(set.is_empty());
    }

    #[test]
    fn test_big_set_growth_across_segments() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut set: SmallSegments<u64> = OpenHashBigSet::default();
        for i in 0..1000 {
            assert!(set.insert(i * 7));
        }
        assert_eq!(set.len64(), 1000);
        assert_eq!(set.table_size(), 2048);
        assert_eq!(set.slots.segment_count(), 256);
        check_placement(&set);
        assert!((0..1000).all(|i| set.contains(&(i * 7))));
        assert!(!set.contains(&1));
    }

    #[test]
    fn test_big_set_shrinks_on_remove() {
        let mut set: SmallSegments<u32> = OpenHashBigSet::default();
        set.extend(0..500);
        let grown = set.table_size();
        for i in 0..495 {
            assert!(set.remove(&i));
        }
        assert!(set.table_size() < grown);
        assert!(set.table_size() >= 32);
        check_placement(&set);
        let mut left: Vec<u32> = set.iter().copied().collect();
        left.sort_unstable();
        assert_eq!(left, vec![495, 496, 497, 498, 499]);
    }

    #[test]
    fn test_big_set_random_against_std() {
        let mut rng = rand::thread_rng();
        let mut set: SmallSegments<u16> = OpenHashBigSet::default();
        let mut model = HashSet::new();
        for _ in 0..20_000 {
            let k = rng.gen_range(0..600u16);
            if rng.gen_bool(0.55) {
                assert_eq!(set.insert(k), model.insert(k));
            } else {
                assert_eq!(set.remove(&k), model.remove(&k));
            }
        }
        assert_eq!(set.len64(), model.len() as u64);
        check_placement(&set);
        assert!(set.is_subset(&model));
        assert_eq!(set.iter().size_hint().0, model.len());
    }

    #[test]
    fn test_big_set_trim_and_clear() {
        let mut set: SmallSegments<i32> = OpenHashBigSet::with_expected_and_strategy(
            10_000,
            0.5,
            DefaultStrategy,
        )
        .unwrap();
        assert_eq!(set.table_size(), 32_768);
        set.extend([1, 2, 3]);
        assert!(set.trim());
        assert_eq!(set.table_size(), 8);
        check_placement(&set);
        assert!(set.contains(&3));
        assert!(set.trim_to(u64::MAX));
        assert_eq!(set.table_size(), 8);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
        assert_eq!(set.table_size(), 8);
    }

    #[test]
    fn test_big_set_rejects_bad_load_factor() {
        assert!(matches!(
            OpenHashBigSet::<u8>::with_expected(10, 0.0),
            Err(CollectionError::InvalidLoadFactor { .. })
        ));
    }

    #[test]
    fn test_big_set_float_strategy_and_traits() {
        let mut set: OpenHashBigSet<f64, FloatBitsStrategy> =
            OpenHashBigSet::with_strategy(FloatBitsStrategy);
        set.insert(f64::NAN);
        assert!(!set.insert(f64::NAN));
        set.insert(0.0);
        assert!(set.insert(-0.0));
        assert_eq!(set.len64(), 3);

        let a: SmallSegments<i32> = (0..40).collect();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.retain(|v| v % 2 == 0);
        assert_eq!(b.len64(), 20);
        check_placement(&b);
        assert_ne!(a, b);
        let evens: HashSet<i32> = b.into_iter().collect();
        assert!(evens.iter().all(|v| v % 2 == 0));

        let one: OpenHashBigSet<i32> = [7].into_iter().collect();
        assert_eq!(format!("{:?}", one), "{7}");
    }
}
