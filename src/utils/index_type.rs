//! Compact index types for array-linked structures.

use core::hash::Hash;
use std::fmt::Debug;

/// Integer types used as **array-based link indices**.
///
/// Instead of pointer-based links, the linked hash tables and the red-black tree
/// store indices into slot/node arrays. A `u32` link halves the footprint of a
/// `usize` link on 64-bit platforms and keeps nodes `Copy`.
pub trait IndexType: Copy + Eq + Hash + Debug + 'static {
    /// Sentinel value indicating "no node" (analogous to a null pointer).
    const NONE: Self;

    /// The first valid index.
    const ZERO: Self;

    /// Largest index that can be stored (exclusive of `NONE`).
    const MAX: usize;

    /// Converts this index to a `usize` for array access.
    fn as_usize(self) -> usize;

    /// Converts a `usize` slot index to this compact type.
    ///
    /// # Panics
    /// Panics in debug builds if `i` does not fit.
    fn from_usize(i: usize) -> Self;

    /// Returns `true` unless this is the `NONE` sentinel.
    #[inline(always)]
    fn is_some(self) -> bool {
        self != Self::NONE
    }

    /// Returns `true` if this is the `NONE` sentinel.
    #[inline(always)]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Converts to `Option<usize>`, mapping `NONE` to `None`.
    #[inline(always)]
    fn get(self) -> Option<usize> {
        if self.is_some() { Some(self.as_usize()) } else { None }
    }
}

impl IndexType for u32 {
    const NONE: Self = u32::MAX;
    const ZERO: Self = 0;
    const MAX: usize = (u32::MAX - 1) as usize;
    #[inline(always)]
    fn as_usize(self) -> usize {
        self as usize
    }
    #[inline(always)]
    fn from_usize(i: usize) -> Self {
        debug_assert!(i <= <Self as IndexType>::MAX);
        i as u32
    }
}

impl IndexType for usize {
    const NONE: Self = usize::MAX;
    const ZERO: Self = 0;
    const MAX: usize = usize::MAX - 1;
    #[inline(always)]
    fn as_usize(self) -> usize {
        self
    }
    #[inline(always)]
    fn from_usize(i: usize) -> Self {
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_index_type<I: IndexType>() {
        let zero = I::ZERO;
        assert_eq!(zero.as_usize(), 0);
        assert!(zero.is_some());
        assert_eq!(zero.get(), Some(0));

        let from = I::from_usize(10);
        assert_eq!(from.as_usize(), 10);

        let none = I::NONE;
        assert!(none.is_none());
        assert_eq!(none.get(), None);
    }

    #[test]
    fn test_index_type_u32() {
        test_index_type::<u32>();
    }

    #[test]
    fn test_index_type_usize() {
        test_index_type::<usize>();
    }
}
