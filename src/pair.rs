//! Pairs of values.
//!
//! [`Pair`] is the read interface shared by all pair types, with the usual
//! aliases (`first`/`second`, `key`/`value`). [`ImmutablePair`] and
//! [`MutablePair`] differ only in whether the components can be replaced;
//! [`SortedPair`] keeps its two components in ascending order.
//!
//! Pairs order lexicographically (left, then right), so they work directly with
//! [`NaturalOrder`](crate::NaturalOrder) in trees and queues.

use core::fmt;

use crate::comparator::Comparator;

/// A pair of values, read-only view.
pub trait Pair<L, R> {
    fn left(&self) -> &L;
    fn right(&self) -> &R;

    #[inline]
    fn first(&self) -> &L {
        self.left()
    }

    #[inline]
    fn second(&self) -> &R {
        self.right()
    }

    #[inline]
    fn key(&self) -> &L {
        self.left()
    }

    #[inline]
    fn value(&self) -> &R {
        self.right()
    }
}

macro_rules! pair_common {
    ($name:ident) => {
        impl<L, R> $name<L, R> {
            pub const fn new(left: L, right: R) -> Self {
                Self { left, right }
            }

            /// Same as [`new`](Self::new).
            pub const fn of(left: L, right: R) -> Self {
                Self::new(left, right)
            }

            pub fn into_inner(self) -> (L, R) {
                (self.left, self.right)
            }
        }

        impl<L, R> Pair<L, R> for $name<L, R> {
            #[inline]
            fn left(&self) -> &L {
                &self.left
            }

            #[inline]
            fn right(&self) -> &R {
                &self.right
            }
        }

        impl<L: fmt::Display, R: fmt::Display> fmt::Display for $name<L, R> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "<{},{}>", self.left, self.right)
            }
        }

        impl<L, R> From<(L, R)> for $name<L, R> {
            fn from((left, right): (L, R)) -> Self {
                Self::new(left, right)
            }
        }

        impl<L, R> From<$name<L, R>> for (L, R) {
            fn from(pair: $name<L, R>) -> Self {
                pair.into_inner()
            }
        }
    };
}

/// A pair whose components are fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImmutablePair<L, R> {
    left: L,
    right: R,
}

pair_common!(ImmutablePair);

/// A pair whose components can be replaced in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutablePair<L, R> {
    left: L,
    right: R,
}

pair_common!(MutablePair);

impl<L, R> MutablePair<L, R> {
    /// Replaces the left component. Returns `self` for chaining.
    pub fn set_left(&mut self, left: L) -> &mut Self {
        self.left = left;
        self
    }

    /// Replaces the right component. Returns `self` for chaining.
    pub fn set_right(&mut self, right: R) -> &mut Self {
        self.right = right;
        self
    }

    pub fn left_mut(&mut self) -> &mut L {
        &mut self.left
    }

    pub fn right_mut(&mut self) -> &mut R {
        &mut self.right
    }
}

/// A pair of two values of the same type with `left <= right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SortedPair<T> {
    left: T,
    right: T,
}

impl<T: Ord> SortedPair<T> {
    /// Builds the pair with the smaller of `a` and `b` on the left.
    pub fn of(a: T, b: T) -> Self {
        if a <= b {
            Self { left: a, right: b }
        } else {
            Self { left: b, right: a }
        }
    }
}

impl<T> SortedPair<T> {
    /// Builds the pair ordered by `comparator`.
    pub fn of_by<C: Comparator<T>>(a: T, b: T, comparator: &C) -> Self {
        if comparator.compare(&a, &b).is_gt() {
            Self { left: b, right: a }
        } else {
            Self { left: a, right: b }
        }
    }

    pub fn into_inner(self) -> (T, T) {
        (self.left, self.right)
    }
}

impl<T: PartialEq> SortedPair<T> {
    /// Returns `true` if `value` is either component.
    pub fn contains(&self, value: &T) -> bool {
        self.left == *value || self.right == *value
    }
}

impl<T> Pair<T, T> for SortedPair<T> {
    #[inline]
    fn left(&self) -> &T {
        &self.left
    }

    #[inline]
    fn right(&self) -> &T {
        &self.right
    }
}

impl<T: fmt::Display> fmt::Display for SortedPair<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.left, self.right)
    }
}

impl<T: Ord> From<(T, T)> for SortedPair<T> {
    fn from((a, b): (T, T)) -> Self {
        Self::of(a, b)
    }
}

impl<T> From<SortedPair<T>> for (T, T) {
    fn from(pair: SortedPair<T>) -> Self {
        pair.into_inner()
    }
}

impl<L, R> Pair<L, R> for (L, R) {
    #[inline]
    fn left(&self) -> &L {
        &self.0
    }

    #[inline]
    fn right(&self) -> &R {
        &self.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{FloatOrder, NaturalOrder, ReverseOrder};
    use crate::queues::HeapPriorityQueue;

    #[test]
    fn test_pair_accessors_and_aliases() {
        let p = ImmutablePair::of("k", 7);
        assert_eq!(p.left(), &"k");
        assert_eq!(p.first(), &"k");
        assert_eq!(p.key(), &"k");
        assert_eq!(p.right(), &7);
        assert_eq!(p.second(), &7);
        assert_eq!(p.value(), &7);
        assert_eq!(p.to_string(), "<k,7>");
        let (l, r): (&str, i32) = p.into();
        assert_eq!((l, r), ("k", 7));
    }

    #[test]
    fn test_pair_mutable_updates() {
        let mut p: MutablePair<i32, String> = (1, "a".to_string()).into();
        p.set_left(2).set_right("b".to_string());
        assert_eq!(p, MutablePair::new(2, "b".to_string()));
        *p.left_mut() += 40;
        p.right_mut().push('c');
        assert_eq!(p.into_inner(), (42, "bc".to_string()));
    }

    #[test]
    fn test_pair_sorted_orders_components() {
        let p = SortedPair::of(9, 3);
        assert_eq!((p.left(), p.right()), (&3, &9));
        assert!(p.contains(&9));
        assert!(!p.contains(&4));
        assert_eq!(p, SortedPair::from((3, 9)));
        assert_eq!(p.to_string(), "{3,9}");

        let f = SortedPair::of_by(1.5f64, -2.0, &FloatOrder);
        assert_eq!(f.into_inner(), (-2.0, 1.5));
        let r = SortedPair::of_by(1, 2, &ReverseOrder(NaturalOrder));
        assert_eq!(r.into_inner(), (2, 1));
    }

    #[test]
    fn test_pair_lexicographic_order() {
        let mut q = HeapPriorityQueue::new();
        q.extend([
            ImmutablePair::of(2, 'a'),
            ImmutablePair::of(1, 'z'),
            ImmutablePair::of(1, 'b'),
        ]);
        let order: Vec<(i32, char)> = q.into_sorted_vec().into_iter().map(Into::into).collect();
        assert_eq!(order, vec![(1, 'b'), (1, 'z'), (2, 'a')]);
        assert!(SortedPair::of(5, 1) < SortedPair::of(2, 3));
    }
}
