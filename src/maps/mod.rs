//! Map implementations.
//!
//! * [`OpenHashMap`]: open addressing with linear probing and backward-shift deletion.
//! * [`LinkedOpenHashMap`]: the same table threaded by an insertion-order list.
//! * [`ArrayMap`]: parallel arrays with linear search, for tiny maps.
//! * [`RBTreeMap`]: a red-black tree ordered by a [`Comparator`](crate::Comparator).

pub mod array_map;
pub mod linked_open_hash_map;
pub mod open_hash_map;
pub(crate) mod raw_table;
pub mod rb_tree_map;

pub use array_map::ArrayMap;
pub use linked_open_hash_map::LinkedOpenHashMap;
pub use open_hash_map::{Entry, OccupiedEntry, OpenHashMap, VacantEntry};
pub use rb_tree_map::RBTreeMap;
