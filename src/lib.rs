//! # Prim Collections
//!
//! Generic container engines: open-addressing hash maps and sets, red-black
//! trees, priority queues, segmented big arrays and front-coded lists.
//!
//! Every family is written once and specialized by monomorphization, so an
//! `OpenHashMap<i32, f64>` compiles to the same tight probing loop a hand-written
//! `int -> double` map would, while `OpenHashMap<String, Vec<u8>>` reuses the very
//! same engine.
//!
//! ## Key Features
//!
//! * **Open Addressing:** Linear probing over a power-of-two table with backward-shift deletion, so there are no tombstones to clean up.
//! * **Pluggable Hashing:** A [`Strategy`] decides hashing and equality. Floats hash by bit pattern, references can hash by identity.
//! * **Pluggable Ordering:** Trees and queues take a [`Comparator`] instead of requiring `Ord`, which covers floats and reversed orders.
//! * **Big Collections:** [`BigVec`] and [`OpenHashBigSet`] are indexed by `u64` and never allocate more than one segment at a time.
//! * **Interoperability:** Every set implements [`AnySet`], so set algebra works against `std` sets too.
//! * **Binary Dumps:** With the `serde` feature, `bin_io` stores and loads collections and element streams with `bincode`.
//!
//! ## Load Factors
//!
//! Hash tables are sized by an expected element count and a load factor in
//! `(0, 1]`, bundled in a [`HashConfig`]:
//!
//! * **[`HashConfig::default`]:** 16 expected elements at load factor 0.75.
//! * **[`HashConfig::fast`]:** load factor 0.5, shorter probe sequences.
//! * **[`HashConfig::very_fast`]:** load factor 0.25.
//!
//! An invalid load factor is rejected with [`CollectionError::InvalidLoadFactor`].
//!
//! ## Examples
//!
//! ### OpenHashMap
//!
//! ```rust
//! use prim_collections::OpenHashMap;
//!
//! let mut counts: OpenHashMap<&str, u32> = OpenHashMap::new();
//!
//! for word in ["a", "b", "a", "c", "a"] {
//!     counts.add_to(word, 1);
//! }
//!
//! assert_eq!(counts.get("a"), Some(&3));
//! assert_eq!(counts.len(), 3);
//! assert_eq!(counts.remove("b"), Some(1));
//! ```
//!
//! ### Float keys
//!
//! ```rust
//! use prim_collections::{FloatBitsStrategy, OpenHashSet};
//!
//! let mut set = OpenHashSet::with_strategy(FloatBitsStrategy);
//!
//! set.insert(f64::NAN);
//! set.insert(0.0);
//! set.insert(-0.0);
//!
//! assert!(set.contains(&f64::NAN));
//! assert_eq!(set.len(), 3);
//! ```
//!
//! ### RBTreeMap
//!
//! ```rust
//! use prim_collections::RBTreeMap;
//!
//! let mut tree = RBTreeMap::new();
//! for (k, v) in [(10, "ten"), (20, "twenty"), (30, "thirty")] {
//!     tree.insert(k, v);
//! }
//!
//! assert_eq!(tree.floor(&25), Some((&20, &"twenty")));
//! assert_eq!(tree.ceiling(&25), Some((&30, &"thirty")));
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![10, 20, 30]);
//! ```
//!
//! ### Priority queues
//!
//! ```rust
//! use prim_collections::{HeapPriorityQueue, NaturalOrder, ReverseOrder};
//!
//! let mut q = HeapPriorityQueue::with_comparator(ReverseOrder(NaturalOrder));
//! q.extend([3, 9, 1]);
//!
//! assert_eq!(q.dequeue(), Some(9));
//! assert_eq!(q.first(), Some(&3));
//! ```
//!
//! ### FrontCodedList
//!
//! ```rust
//! use prim_collections::FrontCodedList;
//!
//! let words = ["car", "cart", "carton", "cat"];
//! let list = FrontCodedList::<u8>::new(words.iter().map(|w| w.as_bytes()), 4)?;
//!
//! assert_eq!(list.get(2).as_deref(), Some(&b"carton"[..]));
//! assert_eq!(list.array_len(3), Some(3));
//! # Ok::<(), prim_collections::CollectionError>(())
//! ```

// --- Module Declarations ---

pub mod comparator;
pub mod error;
pub mod function;
pub mod hash;
pub mod lists;
pub mod maps;
pub mod pair;
pub mod queues;
pub mod sets;
pub mod utils;

#[cfg(feature = "serde")]
pub mod bin_io;
#[cfg(feature = "serde")]
mod serde_impls;

// --- Re-exports ---

pub use comparator::{ByKey, Comparator, FloatOrder, FnComparator, NaturalOrder, ReverseOrder};
pub use error::{CollectionError, Result};
pub use function::Function;
pub use hash::{DefaultStrategy, FloatBitsStrategy, FnStrategy, HashConfig, IdentityStrategy, Strategy};
pub use lists::{BigVec, FrontCodedList};
pub use maps::{ArrayMap, LinkedOpenHashMap, OpenHashMap, RBTreeMap};
pub use pair::{ImmutablePair, MutablePair, Pair, SortedPair};
pub use queues::{
    ArrayFifoQueue, ArrayIndirectPriorityQueue, ArrayPriorityQueue, HeapIndirectPriorityQueue,
    HeapPriorityQueue, IndirectPriorityQueue, PriorityQueue,
};
pub use sets::{AnySet, ArraySet, LinkedOpenHashSet, OpenHashBigSet, OpenHashSet, RBTreeSet};
