//! Orderings for sorted collections and priority queues.
//!
//! Trees and queues are parameterized by a [`Comparator`] instead of requiring
//! `K: Ord`, so float keys, reversed orders and ad-hoc orders all reuse the same
//! engines.

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;

/// A total order over `T`.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Returns `true` if `a` sorts strictly before `b`.
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// The `Ord` order of `T`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Reverses another comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverseOrder<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for ReverseOrder<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Total order on floats: `-0.0 < 0.0`, NaN after `+inf`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatOrder;

impl Comparator<f32> for FloatOrder {
    #[inline]
    fn compare(&self, a: &f32, b: &f32) -> Ordering {
        canonical_f32(*a).total_cmp(&canonical_f32(*b))
    }
}

impl Comparator<f64> for FloatOrder {
    #[inline]
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        canonical_f64(*a).total_cmp(&canonical_f64(*b))
    }
}

// `total_cmp` puts negative NaNs first; collapse every NaN to the positive one.
#[inline]
fn canonical_f32(x: f32) -> f32 {
    if x.is_nan() { f32::NAN } else { x }
}

#[inline]
fn canonical_f64(x: f64) -> f64 {
    if x.is_nan() { f64::NAN } else { x }
}

/// Orders by a key extracted from each element.
pub struct ByKey<F, T: ?Sized> {
    f: F,
    _marker: PhantomData<fn(&T)>,
}

impl<F, T: ?Sized> ByKey<F, T> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F: Clone, T: ?Sized> Clone for ByKey<F, T> {
    fn clone(&self) -> Self {
        Self::new(self.f.clone())
    }
}

impl<T: ?Sized, K: Ord, F: Fn(&T) -> K> Comparator<T> for ByKey<F, T> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.f)(a).cmp(&(self.f)(b))
    }
}

/// Wraps a comparison closure.
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<T: ?Sized, F: Fn(&T, &T) -> Ordering> Comparator<T> for FnComparator<F> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnComparator")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_natural_and_reverse() {
        assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
        assert_eq!(ReverseOrder(NaturalOrder).compare(&1, &2), Ordering::Greater);
        assert!(NaturalOrder.less("a", "b"));
    }

    #[test]
    fn test_comparator_float_total_order() {
        let c = FloatOrder;
        assert_eq!(c.compare(&-0.0f64, &0.0f64), Ordering::Less);
        assert_eq!(c.compare(&f64::NAN, &f64::INFINITY), Ordering::Greater);
        assert_eq!(c.compare(&-f64::NAN, &f64::NAN), Ordering::Equal);
        assert_eq!(c.compare(&1.0f32, &2.0f32), Ordering::Less);
    }

    #[test]
    fn test_comparator_closures() {
        let by_len = ByKey::new(|s: &&str| s.len());
        assert_eq!(by_len.compare(&"abc", &"de"), Ordering::Greater);

        let abs = FnComparator(|a: &i32, b: &i32| a.abs().cmp(&b.abs()));
        assert_eq!(abs.compare(&-5, &3), Ordering::Greater);
    }
}
