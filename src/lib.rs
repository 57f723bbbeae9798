#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Slot placement: hash multipliers and their rotation on resize.
pub mod placement;

pub mod key;

pub mod hash_table;

/// The insertion-order index shared by the ordered maps and sets.
pub mod order;

/// An unordered map over the linear-probing [`HashTable`].
pub mod hash_map;

/// An unordered set over the linear-probing [`HashTable`].
pub mod hash_set;

/// A map that remembers insertion order and supports positional access.
pub mod ordered_map;

/// A set that remembers insertion order and supports positional access.
pub mod ordered_set;

pub mod error;

pub mod text;

pub mod bit_set;

pub use bit_set::OffsetBitSet;
pub use error::ParseError;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use key::BitMix;
pub use key::CharFilter;
pub use key::KeyHasher;
pub use key::Nullable;
pub use key::PrimitiveKey;
pub use key::SlotRepr;
pub use key::ZeroSentinel;
pub use order::OrderMode;
pub use order::Reorder;
pub use ordered_map::OrderedMap;
pub use ordered_set::OrderedSet;
pub use text::Separators;

cfg_if::cfg_if! {
    if #[cfg(feature = "load-factor-fifty")] {
        /// Load factor used by constructors that do not take one.
        pub const DEFAULT_LOAD_FACTOR: f32 = 0.5;
    } else if #[cfg(feature = "load-factor-ninety")] {
        /// Load factor used by constructors that do not take one.
        pub const DEFAULT_LOAD_FACTOR: f32 = 0.9;
    } else {
        /// Load factor used by constructors that do not take one.
        pub const DEFAULT_LOAD_FACTOR: f32 = 0.7;
    }
}

/// Default number of slots allocated by constructors that do not take a
/// capacity.
pub const DEFAULT_CAPACITY: usize = 16;

/// The hash builder used by the `Object*` and `CaseInsensitive*` aliases.
#[cfg(feature = "foldhash")]
pub type DefaultHashBuilder = foldhash::fast::RandomState;

/// Map with arbitrary `Hash + Eq` keys.
#[cfg(feature = "foldhash")]
pub type ObjectMap<K, V> = HashMap<K, V, Nullable, DefaultHashBuilder>;

/// Map with primitive keys, where key zero lives in a side slot.
pub type PrimitiveMap<K, V> = HashMap<K, V, ZeroSentinel, BitMix>;

/// Map with string-like keys compared without regard to case.
#[cfg(feature = "foldhash")]
pub type CaseInsensitiveMap<K, V> = HashMap<K, V, Nullable, key::CaseInsensitive>;

/// Set of arbitrary `Hash + Eq` keys.
#[cfg(feature = "foldhash")]
pub type ObjectSet<K> = HashSet<K, Nullable, DefaultHashBuilder>;

/// Set of primitive keys.
pub type PrimitiveSet<K> = HashSet<K, ZeroSentinel, BitMix>;

/// Set of string-like keys compared without regard to case.
#[cfg(feature = "foldhash")]
pub type CaseInsensitiveSet<K> = HashSet<K, Nullable, key::CaseInsensitive>;

/// Insertion-ordered map with arbitrary `Hash + Eq` keys.
#[cfg(feature = "foldhash")]
pub type ObjectOrderedMap<K, V> = OrderedMap<K, V, Nullable, DefaultHashBuilder>;

/// Insertion-ordered map with primitive keys.
pub type PrimitiveOrderedMap<K, V> = OrderedMap<K, V, ZeroSentinel, BitMix>;

/// Insertion-ordered map with case-insensitive string-like keys.
#[cfg(feature = "foldhash")]
pub type CaseInsensitiveOrderedMap<K, V> = OrderedMap<K, V, Nullable, key::CaseInsensitive>;

/// Insertion-ordered set of arbitrary `Hash + Eq` keys.
#[cfg(feature = "foldhash")]
pub type ObjectOrderedSet<K> = OrderedSet<K, Nullable, DefaultHashBuilder>;

/// Insertion-ordered set of primitive keys.
pub type PrimitiveOrderedSet<K> = OrderedSet<K, ZeroSentinel, BitMix>;

/// Insertion-ordered set of case-insensitive string-like keys.
#[cfg(feature = "foldhash")]
pub type CaseInsensitiveOrderedSet<K> = OrderedSet<K, Nullable, key::CaseInsensitive>;
