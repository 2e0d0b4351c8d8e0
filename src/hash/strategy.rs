//! Hashing strategies.
//!
//! A [`Strategy`] decides how keys are hashed and compared, independently of the
//! key type's own `Hash`/`Eq` implementations. This lets one table engine serve
//! natural equality (`DefaultStrategy`), bitwise float keys (`FloatBitsStrategy`),
//! reference identity (`IdentityStrategy`) and arbitrary user rules (`FnStrategy`).

use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Deref;

use fnv::FnvHasher;

/// Hashing and equality used by open-addressing tables.
///
/// Implementations must be consistent: `equals(a, b)` implies `hash(a) == hash(b)`.
pub trait Strategy<K: ?Sized> {
    /// Returns the hash of `key`. Tables mix the result, so it need not be well spread.
    fn hash(&self, key: &K) -> u64;
    /// Returns `true` if the two keys are to be considered the same key.
    fn equals(&self, a: &K, b: &K) -> bool;
}

/// Natural equality: `Hash + Eq`, hashed with FNV-1a.
///
/// Because it is implemented for every `Q: Hash + Eq`, lookups through a borrowed
/// form (`&str` for `String` keys) hash identically to the owned key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultStrategy;

impl<K: Hash + Eq + ?Sized> Strategy<K> for DefaultStrategy {
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        let mut hasher = FnvHasher::default();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Raw bit access for floating-point keys.
pub trait FloatBits: Copy {
    /// Bit pattern with every NaN collapsed to the canonical NaN.
    fn canonical_bits(self) -> u64;
}

impl FloatBits for f32 {
    #[inline]
    fn canonical_bits(self) -> u64 {
        if self.is_nan() { f32::NAN.to_bits() as u64 } else { self.to_bits() as u64 }
    }
}

impl FloatBits for f64 {
    #[inline]
    fn canonical_bits(self) -> u64 {
        if self.is_nan() { f64::NAN.to_bits() } else { self.to_bits() }
    }
}

/// Bitwise equality for `f32`/`f64` keys.
///
/// All NaNs are one key, while `0.0` and `-0.0` are distinct keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatBitsStrategy;

impl<F: FloatBits> Strategy<F> for FloatBitsStrategy {
    #[inline]
    fn hash(&self, key: &F) -> u64 {
        key.canonical_bits()
    }

    #[inline]
    fn equals(&self, a: &F, b: &F) -> bool {
        a.canonical_bits() == b.canonical_bits()
    }
}

/// Reference identity: two keys are equal iff they point at the same object.
///
/// Works for any pointer-like key (`&T`, `Box<T>`, `Rc<T>`, `Arc<T>`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityStrategy;

impl IdentityStrategy {
    #[inline]
    fn address<P: Deref>(p: &P) -> usize {
        (&**p as *const P::Target).cast::<()>() as usize
    }
}

impl<P: Deref> Strategy<P> for IdentityStrategy {
    #[inline]
    fn hash(&self, key: &P) -> u64 {
        Self::address(key) as u64
    }

    #[inline]
    fn equals(&self, a: &P, b: &P) -> bool {
        Self::address(a) == Self::address(b)
    }
}

/// A strategy assembled from two closures.
#[derive(Clone, Copy)]
pub struct FnStrategy<H, E> {
    hash: H,
    equals: E,
}

impl<H, E> FnStrategy<H, E> {
    pub fn new(hash: H, equals: E) -> Self {
        Self { hash, equals }
    }
}

impl<K: ?Sized, H, E> Strategy<K> for FnStrategy<H, E>
where
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (self.hash)(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (self.equals)(a, b)
    }
}

impl<H, E> fmt::Debug for FnStrategy<H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStrategy").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_strategy_default_borrowed_form_matches() {
        let s = DefaultStrategy;
        let owned = String::from("abc");
        assert_eq!(
            <DefaultStrategy as Strategy<String>>::hash(&s, &owned),
            <DefaultStrategy as Strategy<str>>::hash(&s, "abc")
        );
        assert!(s.equals(&1i32, &1i32));
        assert!(!s.equals(&1i32, &2i32));
    }

    #[test]
    fn test_strategy_float_bits_nan_and_zero() {
        let s = FloatBitsStrategy;
        assert!(s.equals(&f64::NAN, &(0.0f64 / 0.0)));
        assert!(!s.equals(&0.0f64, &-0.0f64));
        assert!(s.equals(&1.5f32, &1.5f32));
        assert_eq!(s.hash(&f32::NAN), s.hash(&-f32::NAN));
    }

    #[test]
    fn test_strategy_identity() {
        let s = IdentityStrategy;
        let a = Rc::new(5);
        let b = Rc::new(5);
        let a2 = Rc::clone(&a);
        assert!(s.equals(&a, &a2));
        assert!(!s.equals(&a, &b));

        let x = 1u8;
        let y = 1u8;
        assert!(s.equals(&&x, &&x));
        assert!(!s.equals(&&x, &&y));
    }

    #[test]
    fn test_strategy_closures() {
        // Case-insensitive ASCII strings.
        let s = FnStrategy::new(
            |k: &String| {
                let mut h = FnvHasher::default();
                k.to_ascii_lowercase().hash(&mut h);
                h.finish()
            },
            |a: &String, b: &String| a.eq_ignore_ascii_case(b),
        );
        let a = "Hello".to_string();
        let b = "hELLO".to_string();
        assert!(s.equals(&a, &b));
        assert_eq!(s.hash(&a), s.hash(&b));
        assert!(format!("{:?}", s).contains("FnStrategy"));
    }
}
