//! Big arrays: sequences indexed by `u64` and stored as a list of segments.
//!
//! A big array of length `len` is kept as `ceil(len / 2^SHIFT)` segments. Every
//! segment but the last holds exactly `2^SHIFT` elements, so an index splits into a
//! segment number (high bits) and a displacement inside it (low bits) with a shift
//! and a mask. No single allocation ever exceeds one segment.

use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::iter::{FromIterator, FusedIterator};
use std::ops::{Index, IndexMut, Range};

use crate::error::{CollectionError, Result};

/// Default log2 of the segment size.
pub const SEGMENT_SHIFT: u32 = 27;
/// Elements per segment with the default shift.
pub const SEGMENT_SIZE: usize = 1 << SEGMENT_SHIFT;

// --- 1. Core Implementation ---

/// A growable big array with `u64` indices.
///
/// `SHIFT` sets the segment size to `2^SHIFT`; the default matches
/// [`SEGMENT_SHIFT`]. Smaller shifts are useful to exercise segment boundaries.
#[derive(Clone)]
pub struct BigVec<T, const SHIFT: u32 = SEGMENT_SHIFT> {
    segments: Vec<Vec<T>>,
    len: u64,
}

impl<T, const SHIFT: u32> BigVec<T, SHIFT> {
    /// Elements per segment.
    pub const SEGMENT_SIZE: usize = 1 << SHIFT;
    const MASK: u64 = (1 << SHIFT) - 1;

    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            len: 0,
        }
    }

    /// A big array of `len` copies of `value`.
    pub fn from_elem(value: T, len: u64) -> Self
    where
        T: Clone,
    {
        let mut big = Self::new();
        big.resize(len, value);
        big
    }

    /// Segment holding the element at `index`.
    #[inline]
    pub const fn segment(index: u64) -> usize {
        (index >> SHIFT) as usize
    }

    /// Position of `index` inside its segment.
    #[inline]
    pub const fn displacement(index: u64) -> usize {
        (index & Self::MASK) as usize
    }

    /// Big index of the element at `displacement` in `segment`.
    #[inline]
    pub const fn big_index(segment: usize, displacement: usize) -> u64 {
        ((segment as u64) << SHIFT) + displacement as u64
    }

    #[inline]
    fn split(index: u64) -> (usize, usize) {
        (Self::segment(index), Self::displacement(index))
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

    /// Number of allocated segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The segments, all full except possibly the last.
    pub fn segments(&self) -> &[Vec<T>] {
        &self.segments
    }

    pub fn push(&mut self, value: T) {
        let full = self
            .segments
            .last()
            .is_none_or(|s| s.len() == Self::SEGMENT_SIZE);
        if full {
            self.segments.push(Vec::new());
        }
        if let Some(last) = self.segments.last_mut() {
            last.push(value);
            self.len += 1;
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        let last = self.segments.last_mut()?;
        let value = last.pop();
        if last.is_empty() {
            self.segments.pop();
        }
        if value.is_some() {
            self.len -= 1;
        }
        value
    }

    pub fn get(&self, index: u64) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let (s, d) = Self::split(index);
        self.segments.get(s)?.get(d)
    }

    pub fn get_mut(&mut self, index: u64) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let (s, d) = Self::split(index);
        self.segments.get_mut(s)?.get_mut(d)
    }

    /// Replaces the element at `index`, returning the old one.
    ///
    /// # Errors
    /// [`CollectionError::IndexOutOfBounds`] if `index >= len64()`.
    pub fn set(&mut self, index: u64, value: T) -> Result<T> {
        let len = self.len;
        match self.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(CollectionError::big_out_of_bounds(index, len)),
        }
    }

    /// Shortens the array to `len` elements. No-op if it is already shorter.
    pub fn truncate(&mut self, len: u64) {
        if len >= self.len {
            return;
        }
        let (s, d) = Self::split(len);
        if d == 0 {
            self.segments.truncate(s);
        } else {
            self.segments.truncate(s + 1);
            if let Some(last) = self.segments.last_mut() {
                last.truncate(d);
            }
        }
        self.len = len;
    }

    /// Resizes to `len` elements, filling new positions with clones of `value`.
    pub fn resize(&mut self, len: u64, value: T)
    where
        T: Clone,
    {
        self.resize_with(len, || value.clone());
    }

    /// Resizes to `len` elements, filling new positions with the results of `f`.
    pub fn resize_with<F: FnMut() -> T>(&mut self, len: u64, mut f: F) {
        if len <= self.len {
            self.truncate(len);
            return;
        }
        while self.len < len {
            let room = match self.segments.last() {
                Some(s) if s.len() < Self::SEGMENT_SIZE => Self::SEGMENT_SIZE - s.len(),
                _ => {
                    self.segments.push(Vec::new());
                    Self::SEGMENT_SIZE
                }
            };
            let take = (room as u64).min(len - self.len) as usize;
            if let Some(last) = self.segments.last_mut() {
                last.resize_with(last.len() + take, &mut f);
            }
            self.len += take as u64;
        }
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.len = 0;
    }

    /// Releases spare capacity in the last segment and the segment list.
    pub fn trim(&mut self) {
        if let Some(last) = self.segments.last_mut() {
            last.shrink_to_fit();
        }
        self.segments.shrink_to_fit();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.segments.iter().flatten(),
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.segments.iter_mut().flatten()
    }

    /// Swaps two elements.
    ///
    /// # Panics
    /// If either index is out of bounds, like [`slice::swap`].
    pub fn swap(&mut self, a: u64, b: u64) {
        assert!(
            a < self.len && b < self.len,
            "swap index out of bounds: {a}, {b} (len {})",
            self.len
        );
        let (sa, da) = Self::split(a);
        let (sb, db) = Self::split(b);
        if sa == sb {
            self.segments[sa].swap(da, db);
            return;
        }
        let (lo, hi, dlo, dhi) = if sa < sb { (sa, sb, da, db) } else { (sb, sa, db, da) };
        let (head, tail) = self.segments.split_at_mut(hi);
        std::mem::swap(&mut head[lo][dlo], &mut tail[0][dhi]);
    }

    /// Sets every element in `range` to a clone of `value`.
    ///
    /// # Errors
    /// [`CollectionError::IndexOutOfBounds`] if the range ends past `len64()`.
    pub fn fill(&mut self, range: Range<u64>, value: T) -> Result<()>
    where
        T: Clone,
    {
        if range.end > self.len {
            return Err(CollectionError::big_out_of_bounds(range.end, self.len));
        }
        let mut pos = range.start;
        while pos < range.end {
            let (s, d) = Self::split(pos);
            let seg = &mut self.segments[s];
            let take = ((seg.len() - d) as u64).min(range.end - pos) as usize;
            seg[d..d + take].fill(value.clone());
            pos += take as u64;
        }
        Ok(())
    }

    /// Overwrites the elements starting at `start` with clones of `src`.
    ///
    /// # Errors
    /// [`CollectionError::IndexOutOfBounds`] if `src` does not fit.
    pub fn copy_from_slice_at(&mut self, start: u64, src: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let end = start + src.len() as u64;
        if end > self.len {
            return Err(CollectionError::big_out_of_bounds(end, self.len));
        }
        let mut pos = start;
        let mut rest = src;
        while !rest.is_empty() {
            let (s, d) = Self::split(pos);
            let seg = &mut self.segments[s];
            let take = (seg.len() - d).min(rest.len());
            seg[d..d + take].clone_from_slice(&rest[..take]);
            rest = &rest[take..];
            pos += take as u64;
        }
        Ok(())
    }

    /// Binary search over a sorted big array, with the semantics of
    /// [`slice::binary_search_by`]: `Ok(index)` of a match, or `Err(insertion point)`.
    pub fn binary_search_by<F>(&self, mut f: F) -> std::result::Result<u64, u64>
    where
        F: FnMut(&T) -> Ordering,
    {
        let (mut lo, mut hi) = (0u64, self.len);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let (s, d) = Self::split(mid);
            match f(&self.segments[s][d]) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(mid),
            }
        }
        Err(lo)
    }
}

// --- 2. Iteration ---

/// Iterator over a [`BigVec`] in index order.
pub struct Iter<'a, T> {
    inner: std::iter::Flatten<std::slice::Iter<'a, Vec<T>>>,
    remaining: u64,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let next = self.inner.next()?;
        self.remaining -= 1;
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let next = self.inner.next_back()?;
        self.remaining -= 1;
        Some(next)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T, const SHIFT: u32> IntoIterator for &'a BigVec<T, SHIFT> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, const SHIFT: u32> IntoIterator for BigVec<T, SHIFT> {
    type Item = T;
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Vec<T>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter().flatten()
    }
}

// --- 3. Trait Implementations ---

impl<T, const SHIFT: u32> Index<u64> for BigVec<T, SHIFT> {
    type Output = T;

    fn index(&self, index: u64) -> &T {
        match self.get(index) {
            Some(v) => v,
            None => panic!("index out of bounds: the len is {} but the index is {index}", self.len),
        }
    }
}

impl<T, const SHIFT: u32> IndexMut<u64> for BigVec<T, SHIFT> {
    fn index_mut(&mut self, index: u64) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(v) => v,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T, const SHIFT: u32> Default for BigVec<T, SHIFT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug, const SHIFT: u32> Debug for BigVec<T, SHIFT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, const SHIFT: u32> PartialEq for BigVec<T, SHIFT> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.segments == other.segments
    }
}

impl<T: Eq, const SHIFT: u32> Eq for BigVec<T, SHIFT> {}

impl<T, const SHIFT: u32> Extend<T> for BigVec<T, SHIFT> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.push(v);
        }
    }
}

impl<T, const SHIFT: u32> FromIterator<T> for BigVec<T, SHIFT> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut big = Self::new();
        big.extend(iter);
        big
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Segments of four elements.
    type Small<T> = BigVec<T, 2>;

    #[test]
    fn test_big_array_segment_arithmetic() {
        type Wide = BigVec<u8>;
        assert_eq!(Wide::segment(0), 0);
        assert_eq!(Wide::segment(SEGMENT_SIZE as u64), 1);
        assert_eq!(Wide::displacement(SEGMENT_SIZE as u64 + 5), 5);
        assert_eq!(Wide::big_index(3, 7), 3 * SEGMENT_SIZE as u64 + 7);
        let i = (1u64 << 33) + 12345;
        assert_eq!(Wide::big_index(Wide::segment(i), Wide::displacement(i)), i);

        assert_eq!(Small::<u8>::segment(9), 2);
        assert_eq!(Small::<u8>::displacement(9), 1);
        assert_eq!(Small::<u8>::big_index(2, 1), 9);
        assert_eq!(BigVec::<u8, 10>::segment(5000), 4);
        assert_eq!(BigVec::<u8, 10>::displacement(5000), 5000 - 4096);
    }

    #[test]
    fn test_big_array_push_pop_segments() {
        let mut big: Small<u32> = Small::new();
        for i in 0..10 {
            big.push(i);
        }
        assert_eq!(big.len64(), 10);
        assert_eq!(big.segment_count(), 3);
        assert!(big.segments()[..2].iter().all(|s| s.len() == 4));
        assert_eq!(big.get(9), Some(&9));
        assert_eq!(big.get(10), None);

        assert_eq!(big.pop(), Some(9));
        assert_eq!(big.pop(), Some(8));
        assert_eq!(big.segment_count(), 2);
        assert_eq!(big[7], 7);
    }

    #[test]
    fn test_big_array_set_and_errors() {
        let mut big: Small<char> = "abcdef".chars().collect();
        assert_eq!(big.set(4, 'E'), Ok('e'));
        assert_eq!(big.get(4), Some(&'E'));
        assert_eq!(
            big.set(6, 'x'),
            Err(CollectionError::big_out_of_bounds(6, 6))
        );
        *big.get_mut(0).unwrap() = 'A';
        big[1] = 'B';
        assert_eq!(big.iter().collect::<String>(), "ABcdEf");
    }

    #[test]
    fn test_big_array_resize_truncate() {
        let mut big: Small<u8> = Small::from_elem(1, 6);
        assert_eq!(big.segment_count(), 2);
        big.resize(13, 2);
        assert_eq!(big.len64(), 13);
        assert_eq!(big.segment_count(), 4);
        assert_eq!(big.iter().filter(|&&v| v == 2).count(), 7);

        big.truncate(8);
        assert_eq!(big.segment_count(), 2);
        assert_eq!(big.len64(), 8);
        big.truncate(5);
        assert_eq!(big.segments()[1].len(), 1);
        big.resize(0, 0);
        assert!(big.is_empty());
        assert_eq!(big.segment_count(), 0);
    }

    #[test]
    fn test_big_array_swap_fill_copy() {
        let mut big: Small<u32> = (0..12).collect();
        big.swap(1, 10);
        big.swap(2, 3);
        assert_eq!(big[1], 10);
        assert_eq!(big[10], 1);
        assert_eq!(big[2], 3);

        big.fill(3..9, 0).unwrap();
        assert_eq!(
            big.iter().copied().collect::<Vec<_>>(),
            vec![0, 10, 3, 0, 0, 0, 0, 0, 0, 9, 1, 11]
        );
        assert!(big.fill(10..13, 0).is_err());

        big.copy_from_slice_at(2, &[7, 7, 7, 7, 7, 7, 7]).unwrap();
        assert_eq!(big.iter().filter(|&&v| v == 7).count(), 7);
        assert_eq!(big[9], 9);
        assert!(big.copy_from_slice_at(10, &[1, 2, 3]).is_err());
    }

    #[test]
    #[should_panic(expected = "swap index out of bounds")]
    fn test_big_array_swap_panics() {
        let mut big: Small<u32> = (0..3).collect();
        big.swap(0, 3);
    }

    #[test]
    fn test_big_array_binary_search() {
        let big: Small<u64> = (0..50).map(|x| x * 2).collect();
        assert_eq!(big.binary_search_by(|v| v.cmp(&40)), Ok(20));
        assert_eq!(big.binary_search_by(|v| v.cmp(&41)), Err(21));
        assert_eq!(big.binary_search_by(|v| v.cmp(&1000)), Err(50));
        let empty: Small<u64> = Small::new();
        assert_eq!(empty.binary_search_by(|v| v.cmp(&1)), Err(0));
    }

    #[test]
    fn test_big_array_iteration_and_traits() {
        let mut big: Small<i32> = (1..=9).collect();
        let it = big.iter();
        assert_eq!(it.size_hint(), (9, Some(9)));
        assert_eq!(big.iter().rev().next(), Some(&9));
        for v in big.iter_mut() {
            *v *= 10;
        }
        assert_eq!(big.clone(), big);
        assert_eq!(format!("{:?}", big.iter().take(2).collect::<Vec<_>>()), "[10, 20]");
        big.trim();
        assert_eq!(big.into_iter().sum::<i32>(), 450);
    }
}
