use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::iter::FromIterator;

use crate::sets::AnySet;

/// A set backed by a `Vec` and searched linearly.
///
/// Needs only `PartialEq`. Meant for a handful of elements, where a scan is faster
/// than hashing; iteration follows insertion order.
#[derive(Clone)]
pub struct ArraySet<T> {
    items: Vec<T>,
}

impl<T> ArraySet<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Wraps a vector whose elements are already distinct. No check is made.
    pub fn from_vec_unchecked(items: Vec<T>) -> Self {
        Self { items }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.items.iter().any(|x| x.borrow() == value)
    }

    /// Appends `value` if absent. Returns `true` if it was newly inserted.
    pub fn insert(&mut self, value: T) -> bool
    where
        T: PartialEq,
    {
        if self.items.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    /// Removes `value`, keeping the order of the remaining elements.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        match self.items.iter().position(|x| x.borrow() == value) {
            Some(i) => {
                self.items.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn retain<F: FnMut(&T) -> bool>(&mut self, f: F) {
        self.items.retain(f);
    }

    pub fn is_subset<O: AnySet<T>>(&self, other: &O) -> bool {
        self.items.iter().all(|v| other.contains(v))
    }

    pub fn is_disjoint<O: AnySet<T>>(&self, other: &O) -> bool {
        self.items.iter().all(|v| !other.contains(v))
    }
}

impl<T: PartialEq> AnySet<T> for ArraySet<T> {
    fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }
}

impl<T> Default for ArraySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for ArraySet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

/// Set equality: order is not compared.
impl<T: PartialEq> PartialEq for ArraySet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.items.iter().all(|x| other.items.contains(x))
    }
}

impl<T: PartialEq> Extend<T> for ArraySet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.insert(x);
        }
    }
}

impl<T: PartialEq> FromIterator<T> for ArraySet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T> IntoIterator for ArraySet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ArraySet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_array_set_basic_crud() {
        let mut set = ArraySet::new();
        assert!(set.insert("x"));
        assert!(set.insert("y"));
        assert!(!set.insert("x"));
        assert_eq!(set.len(), 2);
        assert!(set.contains("y"));
        assert!(set.remove("x"));
        assert!(!set.remove("x"));
        assert_eq!(set.as_slice(), &["y"]);
    }

    #[test]
    fn test_array_set_order_and_equality() {
        let mut a: ArraySet<i32> = [4, 1, 4, 3, 1].into_iter().collect();
        assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![4, 1, 3]);
        a.remove(&1);
        assert_eq!(a.clone().into_vec(), vec![4, 3]);

        let b = ArraySet::from_vec_unchecked(vec![3, 4]);
        assert_eq!(a, b);
        assert_eq!(format!("{:?}", b), "{3, 4}");
    }

    #[test]
    fn test_array_set_interop() {
        let small: ArraySet<u8> = [1, 2].into_iter().collect();
        let tree: BTreeSet<u8> = [1, 2, 3].into_iter().collect();
        assert!(small.is_subset(&tree));
        assert!(!small.is_disjoint(&tree));

        let mut other = ArraySet::new();
        other.extend([3u8, 4]);
        assert!(small.is_disjoint(&other));
    }
}
