use core::cmp::Ordering;
use core::fmt;
use core::fmt::Debug;
use core::ops::Range;
use core::slice;
use core::str::FromStr;

use crate::error::ParseError;
use crate::key::KeyHasher;
use crate::key::SlotRepr;
use crate::order::OrderMode;
use crate::order::Reorder;
use crate::ordered_map;
use crate::ordered_map::OrderedMap;
use crate::text;
use crate::text::Separators;

/// A hash set that iterates in insertion order and supports positional
/// access.
///
/// A thin layer over an [`OrderedMap`] with `()` values; see there for how the
/// [`OrderMode`] affects removals.
///
/// ```rust
/// use probe_hash::PrimitiveOrderedSet;
///
/// let mut set: PrimitiveOrderedSet<u32> = [30, 10, 20].into_iter().collect();
/// assert_eq!(set.order(), [30, 10, 20]);
/// set.sort();
/// assert_eq!(set.order(), [10, 20, 30]);
/// assert_eq!(set.get_at(1), Some(&20));
/// ```
pub struct OrderedSet<K, R: SlotRepr<K>, S> {
    map: OrderedMap<K, (), R, S>,
}

impl<K, R, S> Clone for OrderedSet<K, R, S>
where
    K: Clone,
    R: SlotRepr<K>,
    R::Slot: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K, R, S> Debug for OrderedSet<K, R, S>
where
    K: Debug,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, R, S> fmt::Display for OrderedSet<K, R, S>
where
    K: fmt::Display,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.append_to(f, &Separators::DEFAULT, |w, k| write!(w, "{k}"))
    }
}

/// Equal when both sets hold the same keys, in any order.
impl<K, R, S> PartialEq for OrderedSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K, R, S> Eq for OrderedSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
}

impl<K, R, S> OrderedSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Creates an empty set with every setting spelled out.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in `(0, 1]`.
    pub fn with_config(capacity: usize, load_factor: f32, hasher: S, mode: OrderMode) -> Self {
        Self {
            map: OrderedMap::with_config(capacity, load_factor, hasher, (), mode),
        }
    }

    /// Creates an empty list-mode set with the given key strategy.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: OrderedMap::with_hasher(hasher),
        }
    }

    /// Creates an empty list-mode set with at least `capacity` slots.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            map: OrderedMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Number of keys the set holds before its table doubles.
    pub fn threshold(&self) -> usize {
        self.map.threshold()
    }

    /// The load factor.
    pub fn load_factor(&self) -> f32 {
        self.map.load_factor()
    }

    /// Changes the load factor, growing the table if needed.
    pub fn set_load_factor(&mut self, load_factor: f32) {
        self.map.set_load_factor(load_factor);
    }

    /// The current hash multiplier of the backing table.
    pub fn hash_multiplier(&self) -> u64 {
        self.map.hash_multiplier()
    }

    /// The key hashing and equality strategy.
    pub fn hasher(&self) -> &S {
        self.map.hasher()
    }

    /// How removals affect the order.
    pub fn order_mode(&self) -> OrderMode {
        self.map.order_mode()
    }

    /// The keys in iteration order.
    pub fn order(&self) -> &[K] {
        self.map.order()
    }

    /// Gives permutation-only access to the order.
    pub fn reorder(&mut self) -> Reorder<'_, K> {
        self.map.reorder()
    }

    /// Returns `true` if the set contains `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the stored key equal to `key`.
    pub fn get(&self, key: &K) -> Option<&K> {
        self.map.get_key_value(key).map(|(k, _)| k)
    }

    /// Returns the key at `index` in the order.
    pub fn get_at(&self, index: usize) -> Option<&K> {
        self.map.key_at(index)
    }

    /// Returns the first key in order.
    pub fn first(&self) -> Option<&K> {
        self.map.key_at(0)
    }

    /// Removes `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    /// Removes and returns the stored key equal to `key`.
    pub fn take(&mut self, key: &K) -> Option<K> {
        self.map.remove_entry(key).map(|(k, _)| k)
    }

    /// Removes the key at `index` in the order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> K {
        self.map.remove_at(index).0
    }

    /// Keeps only the keys for which `f` returns `true`, preserving the order of
    /// the survivors.
    pub fn retain(&mut self, mut f: impl FnMut(&K) -> bool) {
        self.map.retain(|k, _| f(k));
    }

    /// Removes every key past the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.map.truncate(len);
    }

    /// Removes the keys at positions `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn remove_range(&mut self, range: Range<usize>) {
        self.map.remove_range(range);
    }

    /// Sorts the order.
    pub fn sort(&mut self)
    where
        K: Ord,
    {
        self.map.sort();
    }

    /// Sorts the order with a comparator.
    pub fn sort_by(&mut self, compare: impl FnMut(&K, &K) -> Ordering) {
        self.map.sort_by_key_order(compare);
    }

    /// Removes every key, keeping the allocations.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Removes every key and shrinks the table to at most `max_capacity` slots.
    pub fn clear_to(&mut self, max_capacity: usize) {
        self.map.clear_to(max_capacity);
    }

    /// Grows the set so `additional` more keys fit without reallocating.
    pub fn ensure_capacity(&mut self, additional: usize) {
        self.map.ensure_capacity(additional);
    }

    /// Shrinks the table towards `max_capacity` slots without dropping below
    /// what the current keys need.
    pub fn shrink(&mut self, max_capacity: usize) {
        self.map.shrink(max_capacity);
    }

    /// Shrinks the set as much as the current keys allow.
    pub fn shrink_to_fit(&mut self) {
        self.map.shrink_to_fit();
    }

    /// Rebuilds the table with a fresh hash multiplier. The order is
    /// unaffected.
    pub fn resize(&mut self, new_capacity: usize) {
        self.map.resize(new_capacity);
    }

    /// Iterates over the keys in order.
    pub fn iter(&self) -> slice::Iter<'_, K> {
        self.map.keys()
    }

    /// Removes and yields every key in order.
    pub fn drain(&mut self) -> Drain<'_, K, R, S> {
        Drain {
            inner: self.map.drain(),
        }
    }

    /// Returns a cursor that walks the keys in order and can remove the one it
    /// last returned.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, R, S> {
        CursorMut {
            inner: self.map.cursor_mut(),
        }
    }

    /// Returns `true` if `self` and `other` share no keys.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.iter().all(|k| !other.contains(k))
    }

    /// Returns `true` if every key of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|k| other.contains(k))
    }

    /// Returns `true` if every key of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Keys of `self` in order, then keys only in `other` in their order.
    pub fn union<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = &'a K> {
        self.iter().chain(other.difference(self))
    }

    /// Keys of `self` that are also in `other`, in `self`'s order.
    pub fn intersection<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = &'a K> {
        self.iter().filter(move |k| other.contains(k))
    }

    /// Keys of `self` that are not in `other`, in `self`'s order.
    pub fn difference<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = &'a K> {
        self.iter().filter(move |k| !other.contains(k))
    }

    /// Writes the set in order, formatting keys with `append_key`.
    pub fn append_to<W>(
        &self,
        out: &mut W,
        separators: &Separators<'_>,
        append_key: impl FnMut(&mut W, &K) -> fmt::Result,
    ) -> fmt::Result
    where
        W: fmt::Write + ?Sized,
    {
        text::append_items(out, self.iter(), separators, append_key)
    }
}

impl<K, R, S> OrderedSet<K, R, S>
where
    K: Clone,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Adds `key` to the end of the order. Returns `true` if it was not
    /// already present; a present key keeps its position.
    pub fn insert(&mut self, key: K) -> bool {
        self.map.put_if_absent(key, ())
    }

    /// Puts `key` at position `index`, moving it there if it is already
    /// present. Returns `true` if the key is new.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` for a new key, or `index >= len` for a present
    /// one.
    pub fn insert_at(&mut self, index: usize, key: K) -> bool {
        self.map.insert_at(index, key, ()).is_none()
    }

    /// Replaces `before` with `after` at the same position.
    ///
    /// Returns `false`, changing nothing, if `before` is absent or `after` is
    /// already present.
    pub fn alter(&mut self, before: &K, after: K) -> bool {
        self.map.alter(before, after)
    }

    /// Replaces the key at `index` with `after`.
    ///
    /// Returns `false`, changing nothing, if `index` is out of bounds or
    /// `after` is already present.
    pub fn alter_at(&mut self, index: usize, after: K) -> bool {
        self.map.alter_at(index, after)
    }
}

impl<K, R, S> OrderedSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    /// Creates an empty list-mode set.
    pub fn new() -> Self {
        Self {
            map: OrderedMap::new(),
        }
    }

    /// Creates an empty set with the given order mode.
    pub fn with_mode(mode: OrderMode) -> Self {
        Self {
            map: OrderedMap::with_mode(mode),
        }
    }

    /// Creates an empty list-mode set with at least `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: OrderedMap::with_capacity(capacity),
        }
    }

    /// Creates an empty list-mode set with at least `capacity` slots and the
    /// given load factor.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Self {
        Self {
            map: OrderedMap::with_capacity_and_load_factor(capacity, load_factor),
        }
    }
}

impl<K, R, S> OrderedSet<K, R, S>
where
    K: Clone,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    /// Reads a list-mode set from text, keeping the textual order.
    pub fn parse_with(
        text: &str,
        separators: &Separators<'_>,
        parse_key: impl FnMut(&str) -> Option<K>,
    ) -> Result<Self, ParseError> {
        let mut set = Self::new();
        text::parse_items(text, separators, parse_key, |k| {
            set.insert(k);
        })?;
        Ok(set)
    }
}

impl<K, R, S> Default for OrderedSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, R, S> FromStr for OrderedSet<K, R, S>
where
    K: FromStr + Clone,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, &Separators::DEFAULT, |k| k.parse().ok())
    }
}

impl<K, R, S> FromIterator<K> for OrderedSet<K, R, S>
where
    K: Clone,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K, R, S> Extend<K> for OrderedSet<K, R, S>
where
    K: Clone,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, R, S> IntoIterator for OrderedSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = K;
    type IntoIter = IntoIter<K, R, S>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, K, R, S> IntoIterator for &'a OrderedSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = &'a K;
    type IntoIter = slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator over the keys of an [`OrderedSet`], in order.
pub struct IntoIter<K, R: SlotRepr<K>, S> {
    inner: ordered_map::IntoIter<K, (), R, S>,
}

impl<K, R, S> Iterator for IntoIter<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the keys of an [`OrderedSet`], in order.
pub struct Drain<'a, K, R: SlotRepr<K>, S> {
    inner: ordered_map::Drain<'a, K, (), R, S>,
}

impl<K, R, S> Iterator for Drain<'_, K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A cursor over an [`OrderedSet`] that can remove the key it last returned.
pub struct CursorMut<'a, K, R: SlotRepr<K>, S> {
    inner: ordered_map::CursorMut<'a, K, (), R, S>,
}

impl<K, R, S> CursorMut<'_, K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Advances to the next key in order.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&K> {
        self.inner.next().map(|(k, _)| k)
    }

    /// Removes the key last returned by [`next`](Self::next).
    ///
    /// # Panics
    ///
    /// Panics if there is no such key.
    pub fn remove(&mut self) -> K {
        self.inner.remove().0
    }
}
