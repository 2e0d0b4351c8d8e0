use core::mem;
use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::iter::FromIterator;

use crate::error::{CollectionError, Result};
use crate::function::Function;

/// A map backed by two parallel arrays, searched linearly.
///
/// Only `PartialEq` is needed on keys. For a handful of entries a scan beats hashing,
/// and iteration follows insertion order. Lookups are O(n), so keep these maps small.
#[derive(Clone)]
pub struct ArrayMap<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
    default_value: Option<V>,
}

impl<K, V> ArrayMap<K, V> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            default_value: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            default_value: None,
        }
    }

    /// Builds a map directly from parallel arrays. Keys are trusted to be distinct.
    ///
    /// # Errors
    /// [`CollectionError::IndexOutOfBounds`] if the arrays differ in length.
    pub fn from_parts(keys: Vec<K>, values: Vec<V>) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(CollectionError::out_of_bounds(values.len(), keys.len()));
        }
        Ok(Self {
            keys,
            values,
            default_value: None,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + ExactSizeIterator {
        self.keys.iter().zip(self.values.iter())
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = (&K, &mut V)> + ExactSizeIterator {
        self.keys.iter().zip(self.values.iter_mut())
    }

    pub fn keys(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }

    pub fn values(&self) -> std::slice::Iter<'_, V> {
        self.values.iter()
    }

    /// Splits the map into its parallel arrays.
    pub fn into_parts(self) -> (Vec<K>, Vec<V>) {
        (self.keys, self.values)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values.contains(value)
    }

    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        // Scan from the end: recently added keys are the likeliest hits.
        self.keys.iter().rposition(|k| k.borrow() == key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).map(|i| &self.values[i])
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).map(move |i| &mut self.values[i])
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.position(key).is_some()
    }

    /// Inserts a pair, returning the previous value. New keys are appended.
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: PartialEq,
    {
        match self.position(&key) {
            Some(i) => Some(mem::replace(&mut self.values[i], value)),
            None => {
                self.keys.push(key);
                self.values.push(value);
                None
            }
        }
    }

    /// Removes `key`, shifting the later entries down to keep their order.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let i = self.position(key)?;
        self.keys.remove(i);
        Some(self.values.remove(i))
    }
}

impl<K: PartialEq, V> Function<K, V> for ArrayMap<K, V> {
    fn get_value(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn default_return_value(&self) -> Option<&V> {
        self.default_value.as_ref()
    }

    fn set_default_return_value(&mut self, value: V) {
        self.default_value = Some(value);
    }
}

impl<K, V> Default for ArrayMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Map equality: order is not compared.
impl<K: PartialEq, V: PartialEq> PartialEq for ArrayMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Debug, V: Debug> Debug for ArrayMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V> Extend<(K, V)> for ArrayMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for ArrayMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> IntoIterator for ArrayMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<K>, std::vec::IntoIter<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter().zip(self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_map_basic_operations() {
        let mut map = ArrayMap::new();
        assert_eq!(map.insert("one", 1), None);
        assert_eq!(map.insert("two", 2), None);
        assert_eq!(map.insert("one", 11), Some(1));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("one"), Some(&11));
        assert!(map.contains_key("two"));
        assert!(map.contains_value(&2));

        *map.get_mut("two").unwrap() += 1;
        assert_eq!(map.get("two"), Some(&3));
    }

    #[test]
    fn test_array_map_remove_keeps_order() {
        let mut map: ArrayMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')].into_iter().collect();
        assert_eq!(map.remove(&2), Some('b'));
        assert_eq!(map.remove(&2), None);
        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, vec![1, 3, 4]);
        map.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn test_array_map_from_parts() {
        let map = ArrayMap::from_parts(vec![1, 2], vec!["a", "b"]).unwrap();
        assert_eq!(map.get(&2), Some(&"b"));
        assert_eq!(format!("{:?}", map), r#"{1: "a", 2: "b"}"#);

        let err = ArrayMap::from_parts(vec![1, 2, 3], vec!["a"]).unwrap_err();
        assert_eq!(err, CollectionError::out_of_bounds(1, 3));

        let (keys, values) = map.into_parts();
        assert_eq!((keys.len(), values.len()), (2, 2));
    }

    #[test]
    fn test_array_map_default_return_value() {
        let mut map: ArrayMap<u8, i32> = ArrayMap::new();
        map.set_default_return_value(-1);
        assert_eq!(map.get_or_default_value(&7), -1);
        map.insert(7, 3);
        assert_eq!(map.get_or_default_value(&7), 3);
        assert_eq!(map.size(), 1);
        assert!(map.contains(&7));
    }

    #[test]
    fn test_array_map_equality_ignores_order() {
        let a: ArrayMap<i32, i32> = [(1, 1), (2, 2)].into_iter().collect();
        let b: ArrayMap<i32, i32> = [(2, 2), (1, 1)].into_iter().collect();
        assert_eq!(a, b);
    }
}
