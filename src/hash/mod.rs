//! Arithmetic shared by every open-addressing table in the crate.
//!
//! All tables use power-of-two sizes, a golden-ratio multiplicative mixer on top of
//! the strategy hash, and a *fill limit* derived from the load factor. Keeping these
//! computations in one place guarantees that `OpenHashMap`, `LinkedOpenHashMap` and
//! `OpenHashBigSet` grow and shrink at exactly the same points.

pub mod strategy;

pub use strategy::{DefaultStrategy, FloatBits, FloatBitsStrategy, FnStrategy, IdentityStrategy, Strategy};

use crate::error::{CollectionError, Result};

/// The initial table size used when no expected size is given.
pub const DEFAULT_INITIAL_SIZE: usize = 16;
/// The default load factor of a hash table.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;
/// Load factor trading memory for shorter probe sequences.
pub const FAST_LOAD_FACTOR: f32 = 0.5;
/// Load factor for tables where lookups dominate everything else.
pub const VERY_FAST_LOAD_FACTOR: f32 = 0.25;
/// Largest table size (in slots) a non-big table may reach.
pub const MAX_ARRAY_SIZE: usize = 1 << 30;

/// 2<sup>64</sup> · φ, φ = (√5 − 1)/2.
const LONG_PHI: u64 = 0x9E37_79B9_7F4A_7C15;

/// Scrambles a strategy hash so that the low bits used for slot selection depend
/// on all input bits.
#[inline]
pub fn mix(x: u64) -> u64 {
    let h = x.wrapping_mul(LONG_PHI);
    let h = h ^ (h >> 32);
    h ^ (h >> 16)
}

/// Largest power of two representable in a `u64`.
const MAX_POWER_OF_TWO: u64 = 1 << 63;

/// Returns the least power of two greater than or equal to `x` (1 for 0),
/// saturating at 2<sup>63</sup>.
#[inline]
pub fn next_power_of_two(x: u64) -> u64 {
    x.clamp(1, MAX_POWER_OF_TWO).next_power_of_two()
}

/// Returns the maximum number of entries a table of size `n` can hold before
/// it must grow. Always leaves at least one free slot so probing terminates.
#[inline]
pub fn max_fill(n: usize, f: f32) -> usize {
    let fill = (n as f64 * f as f64).ceil() as usize;
    fill.min(n - 1)
}

/// Same as [`max_fill`] for big tables.
#[inline]
pub fn max_fill_u64(n: u64, f: f32) -> u64 {
    let fill = (n as f64 * f as f64).ceil() as u64;
    fill.min(n - 1)
}

/// Returns the table size needed to hold `expected` entries with load factor `f`:
/// the least power of two ≥ `expected / f`, and at least 2.
pub fn array_size(expected: usize, f: f32) -> Result<usize> {
    let needed = (expected as f64 / f as f64).ceil() as u64;
    let s = next_power_of_two(needed).max(2);
    if s > MAX_ARRAY_SIZE as u64 {
        return Err(CollectionError::capacity_overflow(expected));
    }
    Ok(s as usize)
}

/// Same as [`array_size`] without the non-big ceiling.
pub fn big_array_size(expected: u64, f: f32) -> u64 {
    next_power_of_two((expected as f64 / f as f64).ceil() as u64).max(2)
}

/// Checks that `f` is a usable load factor.
#[inline]
pub fn check_load_factor(f: f32) -> Result<()> {
    if f.is_nan() || f <= 0.0 || f > 1.0 {
        Err(CollectionError::invalid_load_factor(f))
    } else {
        Ok(())
    }
}

/// Sizing parameters for an open-addressing table.
///
/// The table is built so that `expected` entries fit without a rehash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashConfig {
    expected: usize,
    load_factor: f32,
}

impl HashConfig {
    /// Validates and builds a configuration.
    pub fn new(expected: usize, load_factor: f32) -> Result<Self> {
        check_load_factor(load_factor)?;
        // Fail early rather than at the first insertion.
        array_size(expected, load_factor)?;
        Ok(Self {
            expected,
            load_factor,
        })
    }

    /// Default sizing with load factor [`FAST_LOAD_FACTOR`].
    pub fn fast() -> Self {
        Self {
            expected: DEFAULT_INITIAL_SIZE,
            load_factor: FAST_LOAD_FACTOR,
        }
    }

    /// Default sizing with load factor [`VERY_FAST_LOAD_FACTOR`].
    pub fn very_fast() -> Self {
        Self {
            expected: DEFAULT_INITIAL_SIZE,
            load_factor: VERY_FAST_LOAD_FACTOR,
        }
    }

    /// Returns a copy expecting `expected` entries.
    pub fn with_expected(self, expected: usize) -> Result<Self> {
        Self::new(expected, self.load_factor)
    }

    #[inline]
    pub fn expected(&self) -> usize {
        self.expected
    }

    #[inline]
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Table size this configuration starts with.
    pub(crate) fn table_size(&self) -> usize {
        // Validated in `new`; the preset constructors are always in range.
        array_size(self.expected, self.load_factor).unwrap_or(MAX_ARRAY_SIZE)
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            expected: DEFAULT_INITIAL_SIZE,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_common_next_power_of_two() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(1000), 1024);
        assert_eq!(next_power_of_two(1024), 1024);
        assert_eq!(next_power_of_two(u64::MAX), 1 << 63);
        assert_eq!(next_power_of_two((1 << 63) + 1), 1 << 63);
    }

    #[test]
    fn test_hash_common_array_size() {
        assert_eq!(array_size(16, 0.75).unwrap(), 32);
        assert_eq!(array_size(0, 0.75).unwrap(), 2);
        assert_eq!(array_size(1, 0.5).unwrap(), 2);
        assert_eq!(array_size(3, 0.5).unwrap(), 8);
        assert!(array_size(MAX_ARRAY_SIZE, 0.75).is_err());
        assert!(array_size(usize::MAX, 0.25).is_err());
        assert_eq!(big_array_size(u64::MAX, 0.5), 1 << 63);
    }

    #[test]
    fn test_hash_common_max_fill() {
        assert_eq!(max_fill(32, 0.75), 24);
        assert_eq!(max_fill(2, 0.75), 1);
        // A load factor of 1 still leaves a free slot.
        assert_eq!(max_fill(16, 1.0), 15);
        assert_eq!(max_fill_u64(64, 0.5), 32);
    }

    #[test]
    fn test_hash_common_mix_spreads_low_bits() {
        // Consecutive keys must not land in consecutive slots.
        let mask = 15u64;
        let slots: Vec<u64> = (0..4u64).map(|k| mix(k) & mask).collect();
        assert_ne!(slots, vec![0, 1, 2, 3]);
        assert_eq!(mix(0), 0);
    }

    #[test]
    fn test_hash_config_validation() {
        assert!(HashConfig::new(10, 0.0).is_err());
        assert!(HashConfig::new(10, 1.5).is_err());
        assert!(HashConfig::new(10, f32::NAN).is_err());
        let cfg = HashConfig::new(100, 0.5).unwrap();
        assert_eq!(cfg.expected(), 100);
        assert_eq!(cfg.table_size(), 256);
        assert_eq!(HashConfig::default().table_size(), 32);
        assert_eq!(HashConfig::fast().load_factor(), FAST_LOAD_FACTOR);
        assert_eq!(HashConfig::very_fast().load_factor(), VERY_FAST_LOAD_FACTOR);
        assert_eq!(
            HashConfig::fast().with_expected(3).unwrap().table_size(),
            8
        );
    }
}
