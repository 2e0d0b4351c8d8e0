//! Map-like lookup with a configurable *default return value*.
//!
//! Every map in the crate can carry a default value that is handed back by
//! [`Function::get_or_default_value`] when a key is missing, and that seeds the
//! accumulators of `add_to`. When none has been set, `V::default()` is used, so
//! numeric maps start from zero.

/// A partial function from keys to values.
pub trait Function<K, V> {
    /// Returns the value associated with `key`, if any.
    fn get_value(&self, key: &K) -> Option<&V>;

    /// Returns `true` if `key` has an associated value.
    fn contains(&self, key: &K) -> bool {
        self.get_value(key).is_some()
    }

    /// Number of keys in the domain.
    fn size(&self) -> usize;

    /// The explicitly configured value for missing keys, if any.
    fn default_return_value(&self) -> Option<&V>;

    fn set_default_return_value(&mut self, value: V);

    /// Returns the value for `key`, else the default return value, else `V::default()`.
    fn get_or_default_value(&self, key: &K) -> V
    where
        V: Clone + Default,
    {
        match self.get_value(key).or_else(|| self.default_return_value()) {
            Some(v) => v.clone(),
            None => V::default(),
        }
    }
}

/// Resolves the seed used by `add_to`-style accumulators.
#[inline]
pub(crate) fn seed<V: Copy + Default>(default: &Option<V>) -> V {
    default.unwrap_or_default()
}
