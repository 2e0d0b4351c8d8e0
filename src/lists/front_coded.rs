//! Front-coded lists: immutable sequences of arrays compressed by shared prefixes.
//!
//! Arrays are grouped in blocks of `ratio`. The first array of a block is stored
//! whole; each following one stores only the length of the prefix it shares with
//! its predecessor and the remaining suffix. Random access decodes at most
//! `ratio - 1` entries from the start of the block, sequential iteration decodes
//! each entry once by patching the previous array.
//!
//! Lengths live in a separate byte stream as LEB128 varints, elements in a flat
//! `Vec<T>`. Each block pointer records the offset into both.

use std::fmt::{self, Debug};
use std::iter::FusedIterator;

use crate::error::{CollectionError, Result};

/// Block ratio used by [`FrontCodedList::with_default_ratio`].
pub const DEFAULT_RATIO: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BlockPointer {
    header: usize,
    data: usize,
}

/// Appends `value` as a LEB128 varint.
fn write_varint(out: &mut Vec<u8>, mut value: usize) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Reads a varint at `*pos`, advancing it.
#[inline]
fn read_varint(bytes: &[u8], pos: &mut usize) -> usize {
    let mut value = 0usize;
    let mut shift = 0;
    loop {
        let b = bytes[*pos];
        *pos += 1;
        value |= ((b & 0x7F) as usize) << shift;
        if b < 0x80 {
            return value;
        }
        shift += 7;
    }
}

/// An immutable, front-coded list of arrays.
#[derive(Clone)]
pub struct FrontCodedList<T> {
    len: usize,
    ratio: usize,
    header: Vec<u8>,
    data: Vec<T>,
    blocks: Vec<BlockPointer>,
}

impl<T: Clone + PartialEq> FrontCodedList<T> {
    /// Compresses `arrays` with blocks of `ratio` entries.
    ///
    /// Fails with [`CollectionError::InvalidRatio`] when `ratio` is zero.
    pub fn new<I, A>(arrays: I, ratio: usize) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[T]>,
    {
        if ratio == 0 {
            return Err(CollectionError::invalid_ratio(ratio));
        }
        let mut header = Vec::new();
        let mut data: Vec<T> = Vec::new();
        let mut blocks = Vec::new();
        let mut len = 0usize;
        // Coded entries store only a suffix, so the previous array is kept aside.
        let mut prev: Vec<T> = Vec::new();

        for array in arrays {
            let a = array.as_ref();
            if len % ratio == 0 {
                blocks.push(BlockPointer {
                    header: header.len(),
                    data: data.len(),
                });
                write_varint(&mut header, a.len());
                data.extend_from_slice(a);
            } else {
                let common = prev.iter().zip(a).take_while(|(x, y)| x == y).count();
                write_varint(&mut header, a.len() - common);
                write_varint(&mut header, common);
                data.extend_from_slice(&a[common..]);
            }
            prev.clear();
            prev.extend_from_slice(a);
            len += 1;
        }

        header.shrink_to_fit();
        data.shrink_to_fit();
        log::debug!(
            "FrontCodedList built: {} arrays, ratio {}, {} header bytes, {} elements stored",
            len,
            ratio,
            header.len(),
            data.len()
        );
        Ok(Self {
            len,
            ratio,
            header,
            data,
            blocks,
        })
    }

    /// Compresses `arrays` with [`DEFAULT_RATIO`].
    pub fn with_default_ratio<I, A>(arrays: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[T]>,
    {
        match Self::new(arrays, DEFAULT_RATIO) {
            Ok(list) => list,
            Err(_) => unreachable!("default ratio is positive"),
        }
    }
}

impl<T> FrontCodedList<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ratio(&self) -> usize {
        self.ratio
    }

    /// Bytes used by the length stream.
    pub fn header_bytes(&self) -> usize {
        self.header.len()
    }

    /// Elements actually stored after prefix sharing.
    pub fn stored_elements(&self) -> usize {
        self.data.len()
    }

    /// Length of the array at `index`, without decoding it.
    pub fn array_len(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        let block = self.blocks[index / self.ratio];
        let mut pos = block.header;
        let mut length = read_varint(&self.header, &mut pos);
        for _ in 0..index % self.ratio {
            let suffix = read_varint(&self.header, &mut pos);
            let common = read_varint(&self.header, &mut pos);
            length = suffix + common;
        }
        Some(length)
    }
}

impl<T: Clone> FrontCodedList<T> {
    /// Decodes the array at `index` into a fresh `Vec`.
    pub fn get(&self, index: usize) -> Option<Vec<T>> {
        if index >= self.len {
            return None;
        }
        let mut out = Vec::new();
        self.decode(index, &mut out);
        Some(out)
    }

    /// Decodes the array at `index` into `buf`.
    ///
    /// Returns the array length when `buf` was long enough. Otherwise `buf` holds
    /// the first `buf.len()` elements and the result is minus the number of
    /// elements that did not fit.
    pub fn get_into(&self, index: usize, buf: &mut [T]) -> Result<isize> {
        if index >= self.len {
            return Err(CollectionError::out_of_bounds(index, self.len));
        }
        let length = self.extract(index, buf);
        if buf.len() >= length {
            Ok(length as isize)
        } else {
            Ok(buf.len() as isize - length as isize)
        }
    }

    /// Iterates over all arrays in order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: 0,
            header: 0,
            data: 0,
            current: Vec::new(),
        }
    }

    /// Iterates from the array at `start`; `start == len()` yields nothing.
    pub fn iter_from(&self, start: usize) -> Result<Iter<'_, T>> {
        if start > self.len {
            return Err(CollectionError::out_of_bounds(start, self.len));
        }
        let mut it = self.iter();
        if start < self.len {
            let block = start - start % self.ratio;
            it.next = block;
            // Walk up to `start` so the iterator holds the previous array.
            for _ in block..start {
                it.advance();
            }
        } else {
            it.next = self.len;
        }
        Ok(it)
    }

    /// Reconstructs the array at `index` by replaying its block.
    fn decode(&self, index: usize, out: &mut Vec<T>) {
        out.clear();
        let block = self.blocks[index / self.ratio];
        let mut pos = block.header;
        let mut d = block.data;
        let length = read_varint(&self.header, &mut pos);
        out.extend_from_slice(&self.data[d..d + length]);
        d += length;
        for _ in 0..index % self.ratio {
            let suffix = read_varint(&self.header, &mut pos);
            let common = read_varint(&self.header, &mut pos);
            out.truncate(common);
            out.extend_from_slice(&self.data[d..d + suffix]);
            d += suffix;
        }
    }

    /// Writes the longest prefix of the array at `index` that fits in `buf`,
    /// returning the full array length.
    fn extract(&self, index: usize, buf: &mut [T]) -> usize {
        let cap = buf.len();
        let block = self.blocks[index / self.ratio];
        let mut pos = block.header;
        let mut d = block.data;
        let mut length = read_varint(&self.header, &mut pos);
        let n = length.min(cap);
        buf[..n].clone_from_slice(&self.data[d..d + n]);
        d += length;
        for _ in 0..index % self.ratio {
            let suffix = read_varint(&self.header, &mut pos);
            let common = read_varint(&self.header, &mut pos);
            // buf already holds the shared prefix up to `cap`.
            if common < cap {
                let n = suffix.min(cap - common);
                buf[common..common + n].clone_from_slice(&self.data[d..d + n]);
            }
            d += suffix;
            length = common + suffix;
        }
        length
    }
}

// --- Iteration ---

/// Sequential decoder over a [`FrontCodedList`].
///
/// Each coded entry is rebuilt from the previous array, so a full scan touches
/// every stored element once.
pub struct Iter<'a, T> {
    list: &'a FrontCodedList<T>,
    next: usize,
    header: usize,
    data: usize,
    current: Vec<T>,
}

impl<T: Clone> Iter<'_, T> {
    /// Decodes entry `next` into `current`.
    fn advance(&mut self) {
        let list = self.list;
        if self.next % list.ratio == 0 {
            let block = list.blocks[self.next / list.ratio];
            self.header = block.header;
            self.data = block.data;
            let length = read_varint(&list.header, &mut self.header);
            self.current.clear();
            self.current
                .extend_from_slice(&list.data[self.data..self.data + length]);
            self.data += length;
        } else {
            let suffix = read_varint(&list.header, &mut self.header);
            let common = read_varint(&list.header, &mut self.header);
            self.current.truncate(common);
            self.current
                .extend_from_slice(&list.data[self.data..self.data + suffix]);
            self.data += suffix;
        }
        self.next += 1;
    }

    /// Index of the array the next call to `next` returns.
    pub fn next_index(&self) -> usize {
        self.next
    }
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.next >= self.list.len {
            return None;
        }
        self.advance();
        Some(self.current.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.list.len - self.next;
        (n, Some(n))
    }
}

impl<T: Clone> ExactSizeIterator for Iter<'_, T> {}
impl<T: Clone> FusedIterator for Iter<'_, T> {}

impl<'a, T: Clone> IntoIterator for &'a FrontCodedList<T> {
    type Item = Vec<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- Trait Implementations ---

impl<T: Clone + Debug> Debug for FrontCodedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone + PartialEq> PartialEq for FrontCodedList<T> {
    /// Equal when both hold the same arrays, whatever their ratios.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Clone + PartialEq, A: AsRef<[T]>> FromIterator<A> for FrontCodedList<T> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self::with_default_ratio(iter)
    }
}
