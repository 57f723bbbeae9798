//! A growable bit set whose smallest representable member is a chosen offset.

use alloc::vec::Vec;
use core::fmt;

use crate::text;
use crate::text::Separators;

const WORD_BITS: usize = u64::BITS as usize;
const WORD_BITS_LOG2: usize = u64::BITS.ilog2() as usize;
const WORD_BITS_MASK: usize = WORD_BITS - 1;

/// A set of `i32` values stored as bits relative to a fixed offset.
///
/// Values below the offset can never be members: adding one is a no-op and
/// `contains` reports `false`. The bit storage grows as larger values are
/// added.
///
/// ```rust
/// use probe_hash::OffsetBitSet;
///
/// let mut bits = OffsetBitSet::new(100);
/// assert!(bits.add(150));
/// assert!(bits.contains(150));
/// assert!(!bits.contains(99));
/// assert_eq!(bits.next_set_bit(100), Some(150));
/// ```
#[derive(Clone, Default)]
pub struct OffsetBitSet {
    words: Vec<u64>,
    offset: i32,
}

impl OffsetBitSet {
    /// Creates an empty set whose smallest possible member is `offset`.
    pub fn new(offset: i32) -> Self {
        Self {
            words: Vec::new(),
            offset,
        }
    }

    /// Creates an empty set with room for `bits` values starting at `offset`.
    pub fn with_capacity(offset: i32, bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(bits.div_ceil(WORD_BITS)),
            offset,
        }
    }

    /// The smallest value this set can hold.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    fn bit(&self, value: i32) -> Option<usize> {
        usize::try_from(i64::from(value) - i64::from(self.offset)).ok()
    }

    /// Value of a member's bit. Member bits come from `i32` values, so the
    /// result is in range.
    fn value(&self, bit: usize) -> i32 {
        (i64::from(self.offset) + bit as i64) as i32
    }

    /// Value of an arbitrary bit, which may lie past `i32::MAX`.
    fn checked_value(&self, bit: usize) -> Option<i32> {
        i32::try_from(i64::from(self.offset) + bit as i64).ok()
    }

    /// Adds `value`. Returns `true` if it was not already present, `false` if
    /// it was present or lies below the offset.
    pub fn add(&mut self, value: i32) -> bool {
        let Some(bit) = self.bit(value) else {
            return false;
        };
        let word = bit >> WORD_BITS_LOG2;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << (bit & WORD_BITS_MASK);
        let added = self.words[word] & mask == 0;
        self.words[word] |= mask;
        added
    }

    /// Removes `value`. Returns `true` if it was present.
    pub fn remove(&mut self, value: i32) -> bool {
        let Some(bit) = self.bit(value) else {
            return false;
        };
        let Some(word) = self.words.get_mut(bit >> WORD_BITS_LOG2) else {
            return false;
        };
        let mask = 1u64 << (bit & WORD_BITS_MASK);
        let removed = *word & mask != 0;
        *word &= !mask;
        removed
    }

    /// Returns `true` if `value` is a member.
    pub fn contains(&self, value: i32) -> bool {
        self.bit(value)
            .and_then(|bit| {
                self.words
                    .get(bit >> WORD_BITS_LOG2)
                    .map(|word| word & (1u64 << (bit & WORD_BITS_MASK)) != 0)
            })
            .unwrap_or(false)
    }

    /// The smallest member that is at least `from`.
    pub fn next_set_bit(&self, from: i32) -> Option<i32> {
        let start = self.bit(from).unwrap_or(0);
        let mut word_index = start >> WORD_BITS_LOG2;
        let mut word = *self.words.get(word_index)? & (!0u64 << (start & WORD_BITS_MASK));
        loop {
            if word != 0 {
                let bit = (word_index << WORD_BITS_LOG2) + word.trailing_zeros() as usize;
                return Some(self.value(bit));
            }
            word_index += 1;
            word = *self.words.get(word_index)?;
        }
    }

    /// The smallest value at least `from` that is not a member, or `None` if
    /// every value from `from` up to `i32::MAX` is a member.
    ///
    /// Values below the offset are never members, so they are returned as-is.
    pub fn next_clear_bit(&self, from: i32) -> Option<i32> {
        let Some(start) = self.bit(from) else {
            return Some(from);
        };
        let mut word_index = start >> WORD_BITS_LOG2;
        let Some(&first) = self.words.get(word_index) else {
            return Some(from);
        };
        let mut word = !first & (!0u64 << (start & WORD_BITS_MASK));
        loop {
            if word != 0 {
                let bit = (word_index << WORD_BITS_LOG2) + word.trailing_zeros() as usize;
                return self.checked_value(bit);
            }
            word_index += 1;
            match self.words.get(word_index) {
                Some(&w) => word = !w,
                None => return self.checked_value(word_index << WORD_BITS_LOG2),
            }
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if there are no members.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Removes every member, keeping the storage.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            set: self,
            word_index: 0,
            remaining: self.words.first().copied().unwrap_or(0),
        }
    }

    fn check_offset(&self, other: &Self) {
        assert_eq!(
            self.offset, other.offset,
            "cannot combine bit sets with different offsets"
        );
    }

    /// Keeps only the members also in `other`.
    ///
    /// # Panics
    ///
    /// Panics if the offsets differ.
    pub fn and(&mut self, other: &Self) {
        self.check_offset(other);
        for (i, word) in self.words.iter_mut().enumerate() {
            *word &= other.words.get(i).copied().unwrap_or(0);
        }
    }

    /// Adds every member of `other`.
    ///
    /// # Panics
    ///
    /// Panics if the offsets differ.
    pub fn or(&mut self, other: &Self) {
        self.check_offset(other);
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (word, &theirs) in self.words.iter_mut().zip(&other.words) {
            *word |= theirs;
        }
    }

    /// Keeps the values in exactly one of `self` and `other`.
    ///
    /// # Panics
    ///
    /// Panics if the offsets differ.
    pub fn xor(&mut self, other: &Self) {
        self.check_offset(other);
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (word, &theirs) in self.words.iter_mut().zip(&other.words) {
            *word ^= theirs;
        }
    }

    /// Removes every member of `other`.
    ///
    /// # Panics
    ///
    /// Panics if the offsets differ.
    pub fn and_not(&mut self, other: &Self) {
        self.check_offset(other);
        for (word, &theirs) in self.words.iter_mut().zip(&other.words) {
            *word &= !theirs;
        }
    }

    /// Writes the members in ascending order.
    pub fn append_to<W>(&self, out: &mut W, separators: &Separators<'_>) -> fmt::Result
    where
        W: fmt::Write + ?Sized,
    {
        let members: Vec<i32> = self.iter().collect();
        text::append_items(out, members.iter(), separators, |w, v| write!(w, "{v}"))
    }
}

/// Two sets are equal when they have the same offset and members, however
/// much storage each has grown.
impl PartialEq for OffsetBitSet {
    fn eq(&self, other: &Self) -> bool {
        if self.offset != other.offset {
            return false;
        }
        let (short, long) = if self.words.len() <= other.words.len() {
            (&self.words, &other.words)
        } else {
            (&other.words, &self.words)
        };
        short.iter().zip(long.iter()).all(|(a, b)| a == b)
            && long[short.len()..].iter().all(|&w| w == 0)
    }
}

impl Eq for OffsetBitSet {}

impl fmt::Debug for OffsetBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffsetBitSet")
            .field("offset", &self.offset)
            .field("members", &DebugMembers(self))
            .finish()
    }
}

struct DebugMembers<'a>(&'a OffsetBitSet);

impl fmt::Debug for DebugMembers<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for OffsetBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.append_to(f, &Separators::DEFAULT)
    }
}

impl<'a> IntoIterator for &'a OffsetBitSet {
    type Item = i32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the members of an [`OffsetBitSet`] in ascending order.
pub struct Iter<'a> {
    set: &'a OffsetBitSet,
    word_index: usize,
    remaining: u64,
}

impl Iterator for Iter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining == 0 {
            self.word_index += 1;
            self.remaining = *self.set.words.get(self.word_index)?;
        }
        let trailing_zeros = self.remaining.trailing_zeros() as usize;
        self.remaining &= self.remaining - 1;
        Some(
            self.set
                .value((self.word_index << WORD_BITS_LOG2) + trailing_zeros),
        )
    }
}
