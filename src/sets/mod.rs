//! Sets.
//!
//! Every set here is a thin wrapper over a map engine with `()` values, except
//! [`ArraySet`] (a plain vector) and [`OpenHashBigSet`] (its own segmented table).
//! Set algebra is written against [`AnySet`], so any of them can be compared with
//! any other or with the standard library's sets without converting first.

use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hash};

pub mod array_set;
pub mod linked_open_hash_set;
pub mod open_hash_big_set;
pub mod open_hash_set;
pub mod rb_tree_set;

pub use array_set::ArraySet;
pub use linked_open_hash_set::LinkedOpenHashSet;
pub use open_hash_big_set::OpenHashBigSet;
pub use open_hash_set::OpenHashSet;
pub use rb_tree_set::RBTreeSet;

// ==================================================================================
// The Interoperability Trait
// ==================================================================================

/// A collection that supports containment checks.
///
/// Lets the sets of this crate run `difference`, `is_subset` and friends against
/// `HashSet` and `BTreeSet` (or each other) directly.
pub trait AnySet<T> {
    /// Returns `true` if the collection contains the value.
    fn contains(&self, value: &T) -> bool;
}

// Support standard HashSet
impl<T, S> AnySet<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn contains(&self, value: &T) -> bool {
        HashSet::contains(self, value)
    }
}

// Support standard BTreeSet
impl<T: Ord> AnySet<T> for BTreeSet<T> {
    fn contains(&self, value: &T) -> bool {
        BTreeSet::contains(self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_shared<A: AnySet<i32>>(set: &A, probe: &[i32]) -> usize {
        probe.iter().filter(|v| set.contains(v)).count()
    }

    #[test]
    fn test_any_set_every_backend() {
        let probe = [1, 2, 3, 10];
        let std_hash: HashSet<i32> = [1, 2, 3].into_iter().collect();
        let std_tree: BTreeSet<i32> = [1, 2, 3].into_iter().collect();
        let open: OpenHashSet<i32> = [1, 2, 3].into_iter().collect();
        let linked: LinkedOpenHashSet<i32> = [1, 2, 3].into_iter().collect();
        let array: ArraySet<i32> = [1, 2, 3].into_iter().collect();
        let tree: RBTreeSet<i32> = [1, 2, 3].into_iter().collect();
        let big: OpenHashBigSet<i32> = [1, 2, 3].into_iter().collect();

        assert_eq!(count_shared(&std_hash, &probe), 3);
        assert_eq!(count_shared(&std_tree, &probe), 3);
        assert_eq!(count_shared(&open, &probe), 3);
        assert_eq!(count_shared(&linked, &probe), 3);
        assert_eq!(count_shared(&array, &probe), 3);
        assert_eq!(count_shared(&tree, &probe), 3);
        assert_eq!(count_shared(&big, &probe), 3);
    }
}
