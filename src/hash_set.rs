use core::fmt;
use core::fmt::Debug;
use core::str::FromStr;

use crate::error::ParseError;
use crate::hash_table;
use crate::hash_table::HashTable;
use crate::key::KeyHasher;
use crate::key::SlotRepr;
use crate::text;
use crate::text::Separators;

/// A hash set backed by the linear-probing [`HashTable`].
///
/// `HashSet<K, R, S>` stores keys with the empty-slot representation `R` and
/// the hashing and equality strategy `S`. Iteration order is unspecified.
pub struct HashSet<K, R: SlotRepr<K>, S> {
    table: HashTable<K, (), R, S>,
}

impl<K, R, S> Clone for HashSet<K, R, S>
where
    K: Clone,
    R: SlotRepr<K>,
    R::Slot: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K, R, S> PartialEq for HashSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|k| other.contains(k))
    }
}

impl<K, R, S> Eq for HashSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
}

impl<K, R, S> Debug for HashSet<K, R, S>
where
    K: Debug,
    R: SlotRepr<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.iter().map(|(k, _)| k)).finish()
    }
}

impl<K, R, S> fmt::Display for HashSet<K, R, S>
where
    K: fmt::Display,
    R: SlotRepr<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        text::append_items(
            f,
            self.table.iter().map(|(k, _)| k),
            &Separators::DEFAULT,
            |w, k| write!(w, "{k}"),
        )
    }
}

impl<K, R, S> HashSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Creates an empty set with every setting spelled out.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in `(0, 1]`.
    pub fn with_config(capacity: usize, load_factor: f32, hasher: S) -> Self {
        Self {
            table: HashTable::with_capacity_and_hasher(capacity, load_factor, hasher),
        }
    }

    /// Creates an empty set with the given key strategy.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(crate::DEFAULT_CAPACITY, hasher)
    }

    /// Creates an empty set with at least `capacity` slots.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::with_config(capacity, crate::DEFAULT_LOAD_FACTOR, hasher)
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Number of keys the set holds before its table doubles.
    pub fn threshold(&self) -> usize {
        self.table.threshold()
    }

    /// The load factor.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Changes the load factor, growing the table if needed.
    pub fn set_load_factor(&mut self, load_factor: f32) {
        self.table.set_load_factor(load_factor);
    }

    /// The current hash multiplier of the backing table.
    pub fn hash_multiplier(&self) -> u64 {
        self.table.hash_multiplier()
    }

    /// The key hashing and equality strategy.
    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    /// Adds a key to the set.
    ///
    /// Returns `true` if the key was not already present. An equal key that is
    /// already present is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::PrimitiveSet;
    ///
    /// let mut set: PrimitiveSet<i32> = PrimitiveSet::new();
    /// assert!(set.insert(0));
    /// assert!(!set.insert(0));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        if self.table.contains_key(&key) {
            return false;
        }
        self.table.insert(key, ());
        true
    }

    /// Returns `true` if the set contains `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Returns the stored key equal to `key`.
    pub fn get(&self, key: &K) -> Option<&K> {
        self.table.get_key_value(key).map(|(k, _)| k)
    }

    /// Removes `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.table.remove(key).is_some()
    }

    /// Removes and returns the stored key equal to `key`.
    pub fn take(&mut self, key: &K) -> Option<K> {
        self.table.remove_entry(key).map(|(k, _)| k)
    }

    /// Keeps only the keys for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&K) -> bool) {
        self.table.retain(|k, _| f(k));
    }

    /// Removes every key, keeping the allocation.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Removes every key and shrinks the table to at most `max_capacity` slots.
    pub fn clear_to(&mut self, max_capacity: usize) {
        self.table.clear_to(max_capacity);
    }

    /// Grows the table so `additional` more keys fit without a resize.
    pub fn ensure_capacity(&mut self, additional: usize) {
        self.table.ensure_capacity(additional);
    }

    /// Shrinks the table towards `max_capacity` slots without dropping below
    /// what the current keys need.
    pub fn shrink(&mut self, max_capacity: usize) {
        self.table.shrink(max_capacity);
    }

    /// Shrinks the table as much as the current keys allow.
    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Rebuilds the table with `new_capacity` slots (or more, if the keys need
    /// it) and a fresh hash multiplier.
    pub fn resize(&mut self, new_capacity: usize) {
        self.table.resize(new_capacity);
    }

    /// Iterates over the keys in table order.
    pub fn iter(&self) -> Iter<'_, K, R> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes and yields every key.
    pub fn drain(&mut self) -> Drain<'_, K, R> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns a cursor that can remove keys while walking the set.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, R, S> {
        CursorMut {
            inner: self.table.cursor_mut(),
        }
    }

    /// Returns `true` if `self` and `other` share no keys.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().all(|k| !large.contains(k))
    }

    /// Returns `true` if every key of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|k| other.contains(k))
    }

    /// Returns `true` if every key of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Keys in `self` or `other`, each yielded once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::PrimitiveSet;
    ///
    /// let a: PrimitiveSet<u8> = [1, 2, 3].into_iter().collect();
    /// let b: PrimitiveSet<u8> = [3, 4].into_iter().collect();
    ///
    /// let mut union: Vec<u8> = a.union(&b).copied().collect();
    /// union.sort();
    /// assert_eq!(union, [1, 2, 3, 4]);
    /// ```
    pub fn union<'a>(&'a self, other: &'a Self) -> Union<'a, K, R, S> {
        Union {
            iter: self.iter(),
            rest: other.difference(self),
        }
    }

    /// Keys in both `self` and `other`.
    pub fn intersection<'a>(&'a self, other: &'a Self) -> Intersection<'a, K, R, S> {
        Intersection {
            iter: self.iter(),
            other,
        }
    }

    /// Keys in `self` but not in `other`.
    pub fn difference<'a>(&'a self, other: &'a Self) -> Difference<'a, K, R, S> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Writes the set in its text form, formatting keys with `append_key`.
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

impl<K, R, S> HashSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty set with at least `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    /// Creates an empty set with at least `capacity` slots and the given load
    /// factor.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Self {
        Self::with_config(capacity, load_factor, S::default())
    }

    /// Reads a set from text, converting each item with `parse_key`.
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

impl<K, R, S> Default for HashSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, R, S> FromStr for HashSet<K, R, S>
where
    K: FromStr,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, &Separators::DEFAULT, |k| k.parse().ok())
    }
}

impl<K, R, S> FromIterator<K> for HashSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K, R, S> Extend<K> for HashSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, R: SlotRepr<K>, S> IntoIterator for HashSet<K, R, S> {
    type Item = K;
    type IntoIter = IntoIter<K, R>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, R, S> IntoIterator for &'a HashSet<K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = &'a K;
    type IntoIter = Iter<'a, K, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the keys of a [`HashSet`].
pub struct Iter<'a, K, R: SlotRepr<K>> {
    inner: hash_table::Iter<'a, K, (), R>,
}

impl<'a, K, R: SlotRepr<K>> Iterator for Iter<'a, K, R> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, R: SlotRepr<K>> ExactSizeIterator for Iter<'_, K, R> {}

/// An owning iterator over the keys of a [`HashSet`].
pub struct IntoIter<K, R: SlotRepr<K>> {
    inner: hash_table::IntoIter<K, (), R>,
}

impl<K, R: SlotRepr<K>> Iterator for IntoIter<K, R> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the keys of a [`HashSet`].
pub struct Drain<'a, K, R: SlotRepr<K>> {
    inner: hash_table::Drain<'a, K, (), R>,
}

impl<K, R: SlotRepr<K>> Iterator for Drain<'_, K, R> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A cursor over a [`HashSet`] that can remove the key it last returned.
pub struct CursorMut<'a, K, R: SlotRepr<K>, S> {
    inner: hash_table::CursorMut<'a, K, (), R, S>,
}

impl<K, R, S> CursorMut<'_, K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Advances to the next key.
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

/// An iterator over the union of two sets.
pub struct Union<'a, K, R: SlotRepr<K>, S> {
    iter: Iter<'a, K, R>,
    rest: Difference<'a, K, R, S>,
}

impl<'a, K, R, S> Iterator for Union<'a, K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().or_else(|| self.rest.next())
    }
}

/// An iterator over the intersection of two sets.
pub struct Intersection<'a, K, R: SlotRepr<K>, S> {
    iter: Iter<'a, K, R>,
    other: &'a HashSet<K, R, S>,
}

impl<'a, K, R, S> Iterator for Intersection<'a, K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let k = self.iter.next()?;
            if self.other.contains(k) {
                return Some(k);
            }
        }
    }
}

/// An iterator over the difference of two sets.
pub struct Difference<'a, K, R: SlotRepr<K>, S> {
    iter: Iter<'a, K, R>,
    other: &'a HashSet<K, R, S>,
}

impl<'a, K, R, S> Iterator for Difference<'a, K, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let k = self.iter.next()?;
            if !self.other.contains(k) {
                return Some(k);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::fmt::Write;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::key::BitMix;
    use crate::key::Nullable;
    use crate::key::ZeroSentinel;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type SipSet<K> = HashSet<K, Nullable, SipHashBuilder>;
    type IntSet = HashSet<i64, ZeroSentinel, BitMix>;

    fn sorted(set: &IntSet) -> Vec<i64> {
        let mut keys: Vec<_> = set.iter().copied().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_insert_contains_remove() {
        let mut set = SipSet::new();
        assert!(set.insert("a".to_string()));
        assert!(set.insert("b".to_string()));
        assert!(!set.insert("a".to_string()));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&"a".to_string()));
        assert!(set.remove(&"a".to_string()));
        assert!(!set.remove(&"a".to_string()));
        assert_eq!(set.take(&"b".to_string()), Some("b".to_string()));
        assert!(set.is_empty());
    }

    #[test]
    fn test_zero_key() {
        let mut set = IntSet::new();
        assert!(set.insert(0));
        assert!(set.insert(-1));
        assert!(set.contains(&0));
        assert_eq!(set.get(&0), Some(&0));
        assert!(set.remove(&0));
        assert!(!set.contains(&0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_set_algebra() {
        let a: IntSet = (0..10).collect();
        let b: IntSet = (5..15).collect();

        let mut union: Vec<_> = a.union(&b).copied().collect();
        union.sort();
        assert_eq!(union, (0..15).collect::<Vec<_>>());

        let mut both: Vec<_> = a.intersection(&b).copied().collect();
        both.sort();
        assert_eq!(both, vec![5, 6, 7, 8, 9]);

        let mut only_a: Vec<_> = a.difference(&b).copied().collect();
        only_a.sort();
        assert_eq!(only_a, vec![0, 1, 2, 3, 4]);

        let small: IntSet = (2..4).collect();
        assert!(small.is_subset(&a));
        assert!(a.is_superset(&small));
        assert!(!a.is_subset(&small));
        assert!(small.is_disjoint(&(20..30).collect()));
        assert!(!a.is_disjoint(&b));
    }

    #[test]
    fn test_retain_and_cursor() {
        let mut set: IntSet = (-50..50).collect();
        set.retain(|k| k % 5 == 0);
        assert_eq!(set.len(), 20);

        let mut cursor = set.cursor_mut();
        while let Some(&k) = cursor.next() {
            if k < 0 {
                assert_eq!(cursor.remove(), k);
            }
        }
        assert_eq!(sorted(&set), vec![0, 5, 10, 15, 20, 25, 30, 35, 40, 45]);
    }

    #[test]
    fn test_equality_and_text() {
        let a: IntSet = [3, 1, 2].into_iter().collect();
        let b: IntSet = [1, 2, 3].into_iter().collect();
        assert_eq!(a, b);

        let single: IntSet = [42].into_iter().collect();
        assert_eq!(single.to_string(), "{42}");

        let parsed: IntSet = "{1, 2, 3}".parse().unwrap();
        assert_eq!(parsed, a);
        assert!(matches!(
            "{1, two}".parse::<IntSet>(),
            Err(ParseError::InvalidKey { .. })
        ));

        let mut out = String::new();
        single
            .append_to(&mut out, &Separators::new("|", "", false), |w, k| {
                write!(w, "<{k}>")
            })
            .unwrap();
        assert_eq!(out, "<42>");
    }

    #[test]
    fn test_drain_and_debug() {
        let mut set: IntSet = (1..4).collect();
        assert_eq!(alloc::format!("{:?}", IntSet::new()), "{}");
        let mut drained: Vec<_> = set.drain().collect();
        drained.sort();
        assert_eq!(drained, vec![1, 2, 3]);
        assert!(set.is_empty());
        set.insert(9);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![9]);
    }
}
