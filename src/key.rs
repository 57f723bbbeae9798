//! Key representations and hashing strategies.
//!
//! A table is generic over two independent key concerns:
//!
//! - [`SlotRepr`] decides how an empty slot is marked in the key array. Object
//!   keys use [`Nullable`] (`Option<K>` slots). Primitive keys use
//!   [`ZeroSentinel`], which stores the raw key and treats zero as "empty"; the
//!   key zero itself lives in a side slot of the table.
//! - [`KeyHasher`] computes the 64-bit hash and decides key equality. Any
//!   [`BuildHasher`] works for `Hash + Eq` keys, [`BitMix`] hashes primitive keys
//!   by their bit pattern, and [`CharFilter`] compares string-like keys after
//!   filtering and editing their characters (for example, case-insensitively).

use core::hash::BuildHasher;
use core::hash::Hash;
use core::hash::Hasher;

/// How empty slots are represented in a table's key array.
pub trait SlotRepr<K> {
    /// One entry of the key array.
    type Slot;

    /// A slot holding no key.
    fn vacant() -> Self::Slot;

    /// A slot holding `key`. `key` must not be [reserved](SlotRepr::is_reserved).
    fn fill(key: K) -> Self::Slot;

    /// The key stored in `slot`, if any.
    fn key(slot: &Self::Slot) -> Option<&K>;

    /// Takes the key out of `slot`, leaving it vacant.
    fn take(slot: &mut Self::Slot) -> Option<K>;

    /// Whether `key` coincides with the empty marker and must be stored out of
    /// line.
    fn is_reserved(key: &K) -> bool;
}

/// Empty slots are `None`. Every key value can be stored in the key array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nullable;

impl<K> SlotRepr<K> for Nullable {
    type Slot = Option<K>;

    #[inline(always)]
    fn vacant() -> Self::Slot {
        None
    }

    #[inline(always)]
    fn fill(key: K) -> Self::Slot {
        Some(key)
    }

    #[inline(always)]
    fn key(slot: &Self::Slot) -> Option<&K> {
        slot.as_ref()
    }

    #[inline(always)]
    fn take(slot: &mut Self::Slot) -> Option<K> {
        slot.take()
    }

    #[inline(always)]
    fn is_reserved(_key: &K) -> bool {
        false
    }
}

/// Empty slots hold [`PrimitiveKey::ZERO`]. The zero key is kept in the table's
/// side slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroSentinel;

impl<K: PrimitiveKey> SlotRepr<K> for ZeroSentinel {
    type Slot = K;

    #[inline(always)]
    fn vacant() -> Self::Slot {
        K::ZERO
    }

    #[inline(always)]
    fn fill(key: K) -> Self::Slot {
        debug_assert!(key != K::ZERO);
        key
    }

    #[inline(always)]
    fn key(slot: &Self::Slot) -> Option<&K> {
        if *slot == K::ZERO { None } else { Some(slot) }
    }

    #[inline(always)]
    fn take(slot: &mut Self::Slot) -> Option<K> {
        if *slot == K::ZERO {
            None
        } else {
            Some(core::mem::replace(slot, K::ZERO))
        }
    }

    #[inline(always)]
    fn is_reserved(key: &K) -> bool {
        *key == K::ZERO
    }
}

/// Fixed-width keys stored directly in the key array.
pub trait PrimitiveKey: Copy + Eq {
    /// The value that marks an empty slot.
    const ZERO: Self;

    /// The key's raw bit pattern, sign-extended for signed types.
    fn to_bits(self) -> u64;
}

macro_rules! impl_primitive_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl PrimitiveKey for $t {
                const ZERO: Self = 0;

                #[inline(always)]
                fn to_bits(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_primitive_key!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl PrimitiveKey for char {
    const ZERO: Self = '\0';

    #[inline(always)]
    fn to_bits(self) -> u64 {
        self as u64
    }
}

/// Hashing and equality for the keys of a table.
///
/// Tables only ever compare keys through this trait. Overriding it changes what
/// "the same key" means without touching the probing algorithm.
pub trait KeyHasher<K: ?Sized> {
    /// 64-bit hash of `key`. Equal keys must hash equally.
    fn hash_key(&self, key: &K) -> u64;

    /// Whether `a` and `b` are the same key.
    fn key_eq(&self, a: &K, b: &K) -> bool;
}

impl<K, S> KeyHasher<K> for S
where
    K: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.hash_one(key)
    }

    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Hashes primitive keys by their bit pattern, folding the high word into the
/// low word.
///
/// The table's multiplier does the actual mixing, so this is only a cheap
/// widening step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitMix;

impl<K: PrimitiveKey> KeyHasher<K> for BitMix {
    #[inline(always)]
    fn hash_key(&self, key: &K) -> u64 {
        let bits = key.to_bits();
        bits ^ (bits >> 32)
    }

    #[inline(always)]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Compares string-like keys by the characters that pass `filter`, each
/// mapped through `editor`.
///
/// `S` hashes the edited character stream.
///
/// ```rust
/// use probe_hash::key::CharFilter;
/// use probe_hash::key::KeyHasher;
///
/// let digits_only = CharFilter::new(|c: char| c.is_ascii_digit(), |c| c, foldhash::fast::FixedState::default());
/// assert!(digits_only.key_eq("555-0100", "(555) 0100"));
/// assert_eq!(digits_only.hash_key("555-0100"), digits_only.hash_key("5550100"));
/// ```
#[derive(Clone, Copy)]
pub struct CharFilter<S> {
    filter: fn(char) -> bool,
    editor: fn(char) -> char,
    hash_builder: S,
}

impl<S> core::fmt::Debug for CharFilter<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CharFilter").finish_non_exhaustive()
    }
}

impl<S> CharFilter<S> {
    /// Creates a strategy that keeps characters accepted by `filter` and
    /// compares them after `editor` has been applied.
    pub fn new(filter: fn(char) -> bool, editor: fn(char) -> char, hash_builder: S) -> Self {
        Self {
            filter,
            editor,
            hash_builder,
        }
    }

    /// A strategy that keeps every character and folds case.
    pub fn case_insensitive(hash_builder: S) -> Self {
        Self::new(keep_all, fold_case, hash_builder)
    }

    fn edited<'a>(&self, text: &'a str) -> impl Iterator<Item = char> + 'a {
        let (filter, editor) = (self.filter, self.editor);
        text.chars().filter(move |&c| filter(c)).map(editor)
    }
}

impl<S: Default> Default for CharFilter<S> {
    fn default() -> Self {
        Self::case_insensitive(S::default())
    }
}

impl<K, S> KeyHasher<K> for CharFilter<S>
where
    K: AsRef<str> + ?Sized,
    S: BuildHasher,
{
    fn hash_key(&self, key: &K) -> u64 {
        let mut hasher = self.hash_builder.build_hasher();
        let mut count = 0u64;
        for c in self.edited(key.as_ref()) {
            hasher.write_u32(c as u32);
            count += 1;
        }
        hasher.write_u64(count);
        hasher.finish()
    }

    fn key_eq(&self, a: &K, b: &K) -> bool {
        self.edited(a.as_ref()).eq(self.edited(b.as_ref()))
    }
}

fn keep_all(_: char) -> bool {
    true
}

/// Lower-cases `c` when its lower-case form is a single character.
pub fn fold_case(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

#[cfg(feature = "foldhash")]
/// Case-insensitive string keys hashed with the default hash builder.
pub type CaseInsensitive = CharFilter<crate::DefaultHashBuilder>;
