use core::fmt;
use core::fmt::Debug;
use core::mem;
use core::str::FromStr;

use crate::error::ParseError;
use crate::hash_table::CursorMut;
use crate::hash_table::Drain;
use crate::hash_table::HashTable;
use crate::hash_table::IntoIter;
use crate::hash_table::Iter;
use crate::hash_table::IterMut;
use crate::key::KeyHasher;
use crate::key::SlotRepr;
use crate::text;
use crate::text::Separators;

/// A hash map backed by the linear-probing [`HashTable`].
///
/// Iteration order is unspecified. Lookups of absent keys can fall back to a
/// per-map default value (see [`get_or_default`](HashMap::get_or_default) and
/// [`put`](HashMap::put)).
///
/// `R` picks the empty-slot representation and `S` hashes and compares keys;
/// the crate root has aliases such as [`PrimitiveMap`](crate::PrimitiveMap)
/// for the common combinations.
pub struct HashMap<K, V, R: SlotRepr<K>, S> {
    table: HashTable<K, V, R, S>,
    default_value: V,
}

impl<K, V, R, S> Clone for HashMap<K, V, R, S>
where
    K: Clone,
    V: Clone,
    R: SlotRepr<K>,
    R::Slot: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            default_value: self.default_value.clone(),
        }
    }
}

impl<K, V, R, S> Debug for HashMap<K, V, R, S>
where
    K: Debug,
    V: Debug,
    R: SlotRepr<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.table.iter()).finish()
    }
}

impl<K, V, R, S> fmt::Display for HashMap<K, V, R, S>
where
    K: fmt::Display,
    V: fmt::Display,
    R: SlotRepr<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        text::append_entries(
            f,
            self.table.iter(),
            &Separators::DEFAULT,
            |w, k| write!(w, "{k}"),
            |w, v| write!(w, "{v}"),
        )
    }
}

/// Maps are equal when they hold the same keys mapped to equal values.
/// Default values and capacities are ignored.
impl<K, V, R, S> PartialEq for HashMap<K, V, R, S>
where
    V: PartialEq,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, R, S> Eq for HashMap<K, V, R, S>
where
    V: Eq,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
}

impl<K, V, R: SlotRepr<K>, S> HashMap<K, V, R, S> {
    /// Removes every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Removes every entry and shrinks the table to at most `max_capacity`
    /// slots.
    pub fn clear_to(&mut self, max_capacity: usize) {
        self.table.clear_to(max_capacity);
    }
}

impl<K, V, R, S> HashMap<K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Creates an empty map with every setting spelled out.
    ///
    /// `capacity` is a slot count, rounded up to a power of two.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in `(0, 1]`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::BitMix;
    /// use probe_hash::PrimitiveMap;
    ///
    /// let mut map: PrimitiveMap<u32, i32> = PrimitiveMap::with_config(8, 0.5, BitMix, -1);
    /// map.insert(1, 10);
    ///
    /// assert_eq!(map.get_or_default(&1), &10);
    /// assert_eq!(map.get_or_default(&2), &-1);
    /// assert_eq!(map.capacity(), 8);
    /// ```
    pub fn with_config(capacity: usize, load_factor: f32, hasher: S, default_value: V) -> Self {
        Self {
            table: HashTable::with_capacity_and_hasher(capacity, load_factor, hasher),
            default_value,
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Number of entries the map holds before its table doubles.
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

    /// The value returned for absent keys by
    /// [`get_or_default`](Self::get_or_default) and [`put`](Self::put).
    pub fn default_value(&self) -> &V {
        &self.default_value
    }

    /// Replaces the default value, returning the old one.
    pub fn set_default_value(&mut self, default_value: V) -> V {
        mem::replace(&mut self.default_value, default_value)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Returns the previous value if the key was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::ObjectMap;
    ///
    /// let mut map: ObjectMap<&str, i32> = ObjectMap::new();
    /// assert_eq!(map.insert("a", 1), None);
    /// assert_eq!(map.insert("a", 2), Some(1));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    /// Inserts a key-value pair, returning the previous value or a copy of the
    /// default value if the key was absent.
    pub fn put(&mut self, key: K, value: V) -> V
    where
        V: Clone,
    {
        self.table
            .insert(key, value)
            .unwrap_or_else(|| self.default_value.clone())
    }

    /// Inserts the pair only if `key` is absent. Returns `true` if it was
    /// inserted.
    pub fn put_if_absent(&mut self, key: K, value: V) -> bool {
        if self.table.contains_key(&key) {
            return false;
        }
        self.table.insert(key, value);
        true
    }

    /// Overwrites the value of a present key, returning the old value. Absent
    /// keys are left absent.
    pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
        self.table.get_mut(key).map(|old| mem::replace(old, value))
    }

    /// Copies every entry of `other` into this map.
    pub fn put_all(&mut self, other: &Self)
    where
        K: Clone,
        V: Clone,
    {
        self.table.ensure_capacity(other.len());
        for (k, v) in other.iter() {
            self.table.insert(k.clone(), v.clone());
        }
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::PrimitiveMap;
    ///
    /// let mut map: PrimitiveMap<i64, &str> = PrimitiveMap::new();
    /// map.insert(0, "zero");
    /// assert_eq!(map.get(&0), Some(&"zero"));
    /// assert_eq!(map.get(&1), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key)
    }

    /// Returns the stored key equal to `key` together with its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.table.get_key_value(key)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key)
    }

    /// Returns the value for `key`, or the map's default value.
    pub fn get_or_default(&self, key: &K) -> &V {
        self.table.get(key).unwrap_or(&self.default_value)
    }

    /// Returns the value for `key`, or `fallback`.
    pub fn get_or<'a>(&'a self, key: &K, fallback: &'a V) -> &'a V {
        self.table.get(key).unwrap_or(fallback)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Returns `true` if some key maps to `value`. Scans every entry.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.iter().any(|(_, v)| v == value)
    }

    /// Returns some key mapped to `value`. Scans every entry.
    pub fn find_key(&self, value: &V) -> Option<&K>
    where
        V: PartialEq,
    {
        self.table.iter().find(|(_, v)| *v == value).map(|(k, _)| k)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.table.remove(key)
    }

    /// Removes `key`, returning the stored key and value if it was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.table.remove_entry(key)
    }

    /// Keeps only the entries for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::PrimitiveMap;
    ///
    /// let mut map: PrimitiveMap<i32, i32> = (0..10).map(|i| (i, i * i)).collect();
    /// map.retain(|k, _| k % 2 == 0);
    /// assert_eq!(map.len(), 5);
    /// ```
    pub fn retain(&mut self, f: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(f);
    }

    /// Grows the table so `additional` more entries fit without a resize.
    pub fn ensure_capacity(&mut self, additional: usize) {
        self.table.ensure_capacity(additional);
    }

    /// Shrinks the table towards `max_capacity` slots without dropping below
    /// what the current entries need.
    pub fn shrink(&mut self, max_capacity: usize) {
        self.table.shrink(max_capacity);
    }

    /// Shrinks the table as much as the current entries allow.
    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Rebuilds the table with `new_capacity` slots (or more, if the entries
    /// need it) and a fresh hash multiplier.
    pub fn resize(&mut self, new_capacity: usize) {
        self.table.resize(new_capacity);
    }

    /// Iterates over the entries in table order.
    pub fn iter(&self) -> Iter<'_, K, V, R> {
        self.table.iter()
    }

    /// Iterates over the entries with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, R> {
        self.table.iter_mut()
    }

    /// Iterates over the keys.
    pub fn keys(&self) -> Keys<'_, K, V, R> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Iterates over the values.
    pub fn values(&self) -> Values<'_, K, V, R> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Iterates over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V, R> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Removes and yields every entry.
    pub fn drain(&mut self) -> Drain<'_, K, V, R> {
        self.table.drain()
    }

    /// Returns a cursor that can remove entries while walking the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::PrimitiveMap;
    ///
    /// let mut map: PrimitiveMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
    /// let mut cursor = map.cursor_mut();
    /// while let Some((k, v)) = cursor.next() {
    ///     *v += 1;
    ///     if k % 10 != 0 {
    ///         cursor.remove();
    ///     }
    /// }
    /// assert_eq!(map.len(), 10);
    /// assert_eq!(map.get(&30), Some(&31));
    /// ```
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V, R, S> {
        self.table.cursor_mut()
    }

    /// Writes the map in its text form, formatting keys and values with the
    /// given closures.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use core::fmt::Write;
    ///
    /// use probe_hash::PrimitiveMap;
    /// use probe_hash::Separators;
    ///
    /// let mut map: PrimitiveMap<u8, u8> = PrimitiveMap::new();
    /// map.insert(7, 255);
    ///
    /// let mut out = String::new();
    /// map.append_to(
    ///     &mut out,
    ///     &Separators::new("; ", ": ", false),
    ///     |w, k| write!(w, "{k}"),
    ///     |w, v| write!(w, "{v:#04x}"),
    /// )
    /// .unwrap();
    /// assert_eq!(out, "7: 0xff");
    /// ```
    pub fn append_to<W>(
        &self,
        out: &mut W,
        separators: &Separators<'_>,
        append_key: impl FnMut(&mut W, &K) -> fmt::Result,
        append_value: impl FnMut(&mut W, &V) -> fmt::Result,
    ) -> fmt::Result
    where
        W: fmt::Write + ?Sized,
    {
        text::append_entries(out, self.table.iter(), separators, append_key, append_value)
    }
}

impl<K, V, R, S> HashMap<K, V, R, S>
where
    V: Default,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Creates an empty map with the given key strategy.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(crate::DEFAULT_CAPACITY, hasher)
    }

    /// Creates an empty map with at least `capacity` slots and the given key
    /// strategy.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::with_config(capacity, crate::DEFAULT_LOAD_FACTOR, hasher, V::default())
    }
}

impl<K, V, R, S> HashMap<K, V, R, S>
where
    V: Default,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map with at least `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    /// Creates an empty map with at least `capacity` slots and the given load
    /// factor.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Self {
        Self::with_config(capacity, load_factor, S::default(), V::default())
    }

    /// Reads a map from text, converting keys and values with the given
    /// closures. A converter returning `None` rejects its input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::PrimitiveMap;
    /// use probe_hash::Separators;
    ///
    /// let map: PrimitiveMap<u16, bool> = PrimitiveMap::parse_with(
    ///     "1:y|2:n",
    ///     &Separators::new("|", ":", false),
    ///     |k| k.parse().ok(),
    ///     |v| Some(v == "y"),
    /// )
    /// .unwrap();
    /// assert_eq!(map.get(&1), Some(&true));
    /// assert_eq!(map.get(&2), Some(&false));
    /// ```
    pub fn parse_with(
        text: &str,
        separators: &Separators<'_>,
        parse_key: impl FnMut(&str) -> Option<K>,
        parse_value: impl FnMut(&str) -> Option<V>,
    ) -> Result<Self, ParseError> {
        let mut map = Self::new();
        text::parse_entries(text, separators, parse_key, parse_value, |k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }
}

impl<K, V, R, S> Default for HashMap<K, V, R, S>
where
    V: Default,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, R, S> FromStr for HashMap<K, V, R, S>
where
    K: FromStr,
    V: FromStr + Default,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(
            s,
            &Separators::DEFAULT,
            |k| k.parse().ok(),
            |v| v.parse().ok(),
        )
    }
}

impl<K, V, R, S> FromIterator<(K, V)> for HashMap<K, V, R, S>
where
    V: Default,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, R, S> Extend<(K, V)> for HashMap<K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let reserve = if self.is_empty() {
            iter.size_hint().0
        } else {
            iter.size_hint().0.div_ceil(2)
        };
        self.table.ensure_capacity(reserve);
        for (k, v) in iter {
            self.table.insert(k, v);
        }
    }
}

impl<K, V, R: SlotRepr<K>, S> IntoIterator for HashMap<K, V, R, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

impl<'a, K, V, R: SlotRepr<K>, S> IntoIterator for &'a HashMap<K, V, R, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}

impl<'a, K, V, R: SlotRepr<K>, S> IntoIterator for &'a mut HashMap<K, V, R, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter_mut()
    }
}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V, R: SlotRepr<K>> {
    inner: Iter<'a, K, V, R>,
}

impl<'a, K, V, R: SlotRepr<K>> Iterator for Keys<'a, K, V, R> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, R: SlotRepr<K>> ExactSizeIterator for Keys<'_, K, V, R> {}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V, R: SlotRepr<K>> {
    inner: Iter<'a, K, V, R>,
}

impl<'a, K, V, R: SlotRepr<K>> Iterator for Values<'a, K, V, R> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, R: SlotRepr<K>> ExactSizeIterator for Values<'_, K, V, R> {}

/// An iterator over mutable references to the values of a [`HashMap`].
pub struct ValuesMut<'a, K, V, R: SlotRepr<K>> {
    inner: IterMut<'a, K, V, R>,
}

impl<'a, K, V, R: SlotRepr<K>> Iterator for ValuesMut<'a, K, V, R> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, R: SlotRepr<K>> ExactSizeIterator for ValuesMut<'_, K, V, R> {}
