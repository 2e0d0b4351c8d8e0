//! The open-addressing engine behind `OpenHashMap` and `LinkedOpenHashMap`.
//!
//! # Layout
//! A power-of-two array of `Option<T>` slots. A key's home slot is
//! `mix(strategy_hash) & mask`; collisions probe linearly to the right, wrapping.
//! At least one slot is always empty (see [`max_fill`]), so every probe terminates.
//!
//! # Deletion without tombstones
//! Removing an entry leaves a hole that could break the probe chains of entries
//! stored after it. [`RawTable::remove_at`] closes the hole by *backward shifting*:
//! it walks the cluster to the right and moves back every entry whose home slot is
//! not cyclically inside `(hole, current]`, until it meets an empty slot.
//!
//! The engine is hash-agnostic: callers pass a closure producing the (unmixed)
//! strategy hash of a stored element, so the same code serves maps, sets and the
//! linked variants, which additionally observe slot moves to rewire their lists.

use crate::hash::{self, DEFAULT_INITIAL_SIZE};

pub(crate) struct RawTable<T> {
    slots: Box<[Option<T>]>,
    mask: usize,
    len: usize,
    /// Table size requested at construction; never shrink below it.
    min_n: usize,
    max_fill: usize,
    load_factor: f32,
}

/// Outcome of a probe.
pub(crate) enum Probe {
    /// The element lives in this slot.
    Found(usize),
    /// The element is absent; this is the empty slot where it would go.
    Vacant(usize),
}

impl<T> RawTable<T> {
    pub(crate) fn new(n: usize, load_factor: f32) -> Self {
        debug_assert!(n.is_power_of_two() && n >= 2);
        Self {
            slots: empty_slots(n),
            mask: n - 1,
            len: 0,
            min_n: n,
            max_fill: hash::max_fill(n, load_factor),
            load_factor,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of slots.
    #[inline]
    pub(crate) fn n(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Number of entries the current table holds before growing.
    #[inline]
    pub(crate) fn max_fill(&self) -> usize {
        self.max_fill
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    #[inline]
    pub(crate) fn slots_mut(&mut self) -> &mut [Option<T>] {
        &mut self.slots
    }

    #[inline]
    pub(crate) fn get(&self, pos: usize) -> Option<&T> {
        self.slots[pos].as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, pos: usize) -> Option<&mut T> {
        self.slots[pos].as_mut()
    }

    #[inline]
    fn home(&self, hash: u64) -> usize {
        (hash::mix(hash) as usize) & self.mask
    }

    /// Probes for an element with strategy hash `hash` satisfying `eq`.
    pub(crate) fn find(&self, hash: u64, mut eq: impl FnMut(&T) -> bool) -> Probe {
        let mut pos = self.home(hash);
        loop {
            match &self.slots[pos] {
                None => return Probe::Vacant(pos),
                Some(cur) if eq(cur) => return Probe::Found(pos),
                Some(_) => pos = (pos + 1) & self.mask,
            }
        }
    }

    /// Stores `value` in the empty slot `pos` (as returned by [`find`](Self::find)).
    ///
    /// Callers must first check [`is_full`](Self::is_full) and grow if needed.
    pub(crate) fn insert_at(&mut self, pos: usize, value: T) {
        debug_assert!(self.slots[pos].is_none());
        self.slots[pos] = Some(value);
        self.len += 1;
    }

    /// Returns `true` if one more insertion would exceed the fill limit.
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len >= self.max_fill
    }

    /// Table size to grow to before inserting into a full table: room for the
    /// new element plus one.
    pub(crate) fn grown_size(&self) -> usize {
        self.size_for(self.len + 2)
    }

    /// Table size needed to take `additional` more elements, if larger than now.
    pub(crate) fn reserve_size(&self, additional: usize) -> Option<usize> {
        let needed = self.size_for(self.len.saturating_add(additional));
        (needed > self.n()).then_some(needed)
    }

    fn size_for(&self, expected: usize) -> usize {
        match hash::array_size(expected, self.load_factor) {
            Ok(n) => n,
            Err(err) => {
                log::error!("open hash table cannot hold {} entries", expected);
                panic!("{err}")
            }
        }
    }

    /// Returns `true` if a removal left the table sparse enough to halve it.
    #[inline]
    pub(crate) fn should_shrink(&self) -> bool {
        let n = self.n();
        n > self.min_n && self.len < self.max_fill / 4 && n > DEFAULT_INITIAL_SIZE
    }

    /// Removes the element at `pos` and repairs the probe chains after it.
    ///
    /// `on_move(from, to)` is called after each element relocated by the shift.
    pub(crate) fn remove_at(
        &mut self,
        pos: usize,
        hash_of: impl Fn(&T) -> u64,
        mut on_move: impl FnMut(&mut [Option<T>], usize, usize),
    ) -> T {
        let removed = match self.slots[pos].take() {
            Some(v) => v,
            None => unreachable!("remove_at called on an empty slot"),
        };
        self.len -= 1;
        self.shift(pos, &hash_of, &mut on_move);
        removed
    }

    fn shift(
        &mut self,
        mut pos: usize,
        hash_of: &impl Fn(&T) -> u64,
        on_move: &mut impl FnMut(&mut [Option<T>], usize, usize),
    ) {
        let mask = self.mask;
        loop {
            let last = pos;
            pos = (last + 1) & mask;
            loop {
                let slot = match &self.slots[pos] {
                    None => {
                        self.slots[last] = None;
                        return;
                    }
                    Some(cur) => self.home(hash_of(cur)),
                };
                // Move back unless the home slot lies cyclically in (last, pos].
                let stays = if last <= pos {
                    last < slot && slot <= pos
                } else {
                    last < slot || slot <= pos
                };
                if !stays {
                    break;
                }
                pos = (pos + 1) & mask;
            }
            self.slots[last] = self.slots[pos].take();
            on_move(&mut self.slots[..], pos, last);
        }
    }

    /// Rebuilds the table with `new_n` slots, in slot order.
    pub(crate) fn rehash(&mut self, new_n: usize, hash_of: impl Fn(&T) -> u64) {
        log::debug!(
            "rehashing open hash table: {} -> {} slots ({} entries)",
            self.n(),
            new_n,
            self.len
        );
        let old = std::mem::replace(&mut self.slots, empty_slots(new_n));
        self.mask = new_n - 1;
        self.max_fill = hash::max_fill(new_n, self.load_factor);
        for value in old.into_vec().into_iter().flatten() {
            let pos = self.free_slot(hash_of(&value));
            self.slots[pos] = Some(value);
        }
    }

    /// Rebuilds the table with `new_n` slots, inserting the old slots in the
    /// order given by `order`. Returns the new position of each element, in
    /// that order.
    pub(crate) fn rehash_ordered(
        &mut self,
        new_n: usize,
        order: &[usize],
        hash_of: impl Fn(&T) -> u64,
    ) -> Vec<usize> {
        log::debug!(
            "rehashing linked open hash table: {} -> {} slots ({} entries)",
            self.n(),
            new_n,
            self.len
        );
        let mut old = std::mem::replace(&mut self.slots, empty_slots(new_n));
        self.mask = new_n - 1;
        self.max_fill = hash::max_fill(new_n, self.load_factor);
        let mut placed = Vec::with_capacity(order.len());
        for &i in order {
            if let Some(value) = old[i].take() {
                let pos = self.free_slot(hash_of(&value));
                self.slots[pos] = Some(value);
                placed.push(pos);
            }
        }
        placed
    }

    fn free_slot(&self, hash: u64) -> usize {
        let mut pos = self.home(hash);
        while self.slots[pos].is_some() {
            pos = (pos + 1) & self.mask;
        }
        pos
    }

    /// Smallest table size able to hold `max(n, len)` entries, if smaller than
    /// the current one.
    pub(crate) fn trim_size(&self, n: usize) -> Option<usize> {
        let wanted = n.max(self.len);
        let l = hash::next_power_of_two((wanted as f64 / self.load_factor as f64).ceil() as u64)
            .clamp(2, hash::MAX_ARRAY_SIZE as u64) as usize;
        if l >= self.n() || self.len > hash::max_fill(l, self.load_factor) {
            None
        } else {
            Some(l)
        }
    }

    /// Empties every slot, keeping the table size.
    pub(crate) fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.len = 0;
    }

    /// Takes every element out, leaving an empty table of the same size.
    pub(crate) fn take_all(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(self.slots.iter_mut().filter_map(Option::take));
        self.len = 0;
        out
    }

    pub(crate) fn into_slots(self) -> Box<[Option<T>]> {
        self.slots
    }
}

impl<T: Clone> Clone for RawTable<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            mask: self.mask,
            len: self.len,
            min_n: self.min_n,
            max_fill: self.max_fill,
            load_factor: self.load_factor,
        }
    }
}

fn empty_slots<T>(n: usize) -> Box<[Option<T>]> {
    let mut v = Vec::with_capacity(n);
    v.resize_with(n, || None);
    v.into_boxed_slice()
}
