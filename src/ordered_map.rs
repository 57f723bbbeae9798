use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::mem;
use core::ops::Range;
use core::slice;
use core::str::FromStr;

use crate::error::ParseError;
use crate::hash_map::HashMap;
use crate::key::KeyHasher;
use crate::key::SlotRepr;
use crate::order::OrderIndex;
use crate::order::OrderMode;
use crate::order::Reorder;
use crate::text;
use crate::text::Separators;

/// Value of a key taken from the order index, which only ever holds live keys.
#[inline]
fn live<'a, K, V, R, S>(map: &'a HashMap<K, V, R, S>, key: &K) -> &'a V
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    map.get(key).expect("order index holds only live keys")
}

/// A hash map that iterates in insertion order and supports positional
/// access.
///
/// Entries live in a [`HashMap`]; a separate order index holds a clone of each
/// key. In [`OrderMode::List`] removal keeps the order of the survivors at the
/// cost of shifting later keys; [`OrderMode::Bag`] removes in constant time by
/// moving the last key into the gap.
///
/// # Examples
///
/// ```rust
/// use probe_hash::ObjectOrderedMap;
///
/// let mut map: ObjectOrderedMap<&str, i32> = ObjectOrderedMap::with_capacity_and_load_factor(4, 0.8);
/// for (i, key) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
///     map.insert(key, i as i32 + 1);
/// }
/// assert_eq!(map.order(), ["a", "b", "c", "d", "e"]);
/// assert_eq!(map.get_at(2), Some(&3));
///
/// map.remove(&"b");
/// assert_eq!(map.order(), ["a", "c", "d", "e"]);
/// ```
pub struct OrderedMap<K, V, R: SlotRepr<K>, S> {
    map: HashMap<K, V, R, S>,
    order: OrderIndex<K>,
}

impl<K, V, R, S> Clone for OrderedMap<K, V, R, S>
where
    K: Clone,
    V: Clone,
    R: SlotRepr<K>,
    R::Slot: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            order: self.order.clone(),
        }
    }
}

impl<K, V, R, S> Debug for OrderedMap<K, V, R, S>
where
    K: Debug,
    V: Debug,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, R, S> fmt::Display for OrderedMap<K, V, R, S>
where
    K: fmt::Display,
    V: fmt::Display,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.append_to(
            f,
            &Separators::DEFAULT,
            |w, k| write!(w, "{k}"),
            |w, v| write!(w, "{v}"),
        )
    }
}

/// Equal when both maps hold the same entries, in any order.
impl<K, V, R, S> PartialEq for OrderedMap<K, V, R, S>
where
    V: PartialEq,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K, V, R, S> Eq for OrderedMap<K, V, R, S>
where
    V: Eq,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
}

impl<K, V, R, S> OrderedMap<K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Creates an empty map with every setting spelled out.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in `(0, 1]`.
    pub fn with_config(
        capacity: usize,
        load_factor: f32,
        hasher: S,
        default_value: V,
        mode: OrderMode,
    ) -> Self {
        let map = HashMap::with_config(capacity, load_factor, hasher, default_value);
        let order = OrderIndex::with_capacity(mode, map.threshold());
        Self { map, order }
    }

    /// Position of `key` in the order index. Linear in the number of entries.
    fn position_of(&self, key: &K) -> Option<usize> {
        let hasher = self.map.hasher();
        self.order.position(|k| hasher.key_eq(k, key))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.len() == 0
    }

    /// Number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Number of entries the map holds before its table doubles.
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
        self.order.mode()
    }

    /// The value returned for absent keys by
    /// [`get_or_default`](Self::get_or_default) and [`put`](Self::put).
    pub fn default_value(&self) -> &V {
        self.map.default_value()
    }

    /// Replaces the default value, returning the old one.
    pub fn set_default_value(&mut self, default_value: V) -> V {
        self.map.set_default_value(default_value)
    }

    /// The keys in iteration order.
    pub fn order(&self) -> &[K] {
        self.order.as_slice()
    }

    /// Gives permutation-only access to the order.
    ///
    /// ```rust
    /// use probe_hash::PrimitiveOrderedMap;
    ///
    /// let mut map: PrimitiveOrderedMap<u8, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
    /// map.reorder().rotate_left(1);
    /// assert_eq!(map.order(), [2, 3, 1]);
    /// ```
    pub fn reorder(&mut self) -> Reorder<'_, K> {
        self.order.reorder()
    }

    /// Returns a reference to the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// Returns the stored key equal to `key` together with its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.map.get_key_value(key)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.map.get_mut(key)
    }

    /// Returns the value for `key`, or the map's default value.
    pub fn get_or_default(&self, key: &K) -> &V {
        self.map.get_or_default(key)
    }

    /// Returns the value for `key`, or `fallback`.
    pub fn get_or<'a>(&'a self, key: &K, fallback: &'a V) -> &'a V {
        self.map.get_or(key, fallback)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns `true` if some key maps to `value`.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.map.contains_value(value)
    }

    /// Returns the first key in order that maps to `value`.
    pub fn find_key(&self, value: &V) -> Option<&K>
    where
        V: PartialEq,
    {
        self.iter().find(|(_, v)| *v == value).map(|(k, _)| k)
    }

    /// Overwrites the value of a present key without touching the order.
    pub fn replace(&mut self, key: &K, value: V) -> Option<V> {
        self.map.replace(key, value)
    }

    /// Returns the key at `index` in the order.
    pub fn key_at(&self, index: usize) -> Option<&K> {
        self.order.get(index)
    }

    /// Returns the value of the key at `index` in the order.
    pub fn get_at(&self, index: usize) -> Option<&V> {
        self.order.get(index).map(|k| live(&self.map, k))
    }

    /// Returns the entry at `index` in the order.
    pub fn entry_at(&self, index: usize) -> Option<(&K, &V)> {
        self.order.get(index).map(|k| (k, live(&self.map, k)))
    }

    /// Returns a mutable reference to the value at `index` in the order.
    pub fn get_at_mut(&mut self, index: usize) -> Option<&mut V> {
        let key = self.order.get(index)?;
        self.map.get_mut(key)
    }

    /// Returns the first entry in order.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entry_at(0)
    }

    /// Replaces the value at `index`, returning the old value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn set_at(&mut self, index: usize, value: V) -> V {
        let len = self.order.len();
        let key = self
            .order
            .get(index)
            .unwrap_or_else(|| panic!("index {index} out of bounds for length {len}"));
        let slot = self
            .map
            .get_mut(key)
            .expect("order index holds only live keys");
        mem::replace(slot, value)
    }

    /// Removes the entry at `index` in the order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> (K, V) {
        assert!(
            index < self.order.len(),
            "index {index} out of bounds for length {}",
            self.order.len()
        );
        let key = self.order.remove(index);
        let value = self
            .map
            .remove(&key)
            .expect("order index holds only live keys");
        (key, value)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and value if it was present.
    ///
    /// In list mode this shifts every later key down by one.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let (key, value) = self.map.remove_entry(key)?;
        if let Some(index) = self.position_of(&key) {
            self.order.remove(index);
        }
        Some((key, value))
    }

    /// Keeps only the entries for which `f` returns `true`, preserving the
    /// order of the survivors.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        let map = &mut self.map;
        self.order.retain(|k| {
            let keep = map.get_mut(k).is_some_and(|v| f(k, v));
            if !keep {
                map.remove(k);
            }
            keep
        });
    }

    /// Removes every entry past the first `len`.
    pub fn truncate(&mut self, len: usize) {
        for key in self.order.truncate(len) {
            self.map.remove(&key);
        }
    }

    /// Removes the entries at positions `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn remove_range(&mut self, range: Range<usize>) {
        for key in self.order.drain(range) {
            self.map.remove(&key);
        }
    }

    /// Calls `f` on every entry in order, with mutable access to the values.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&K, &mut V)) {
        for key in self.order.as_slice() {
            if let Some(value) = self.map.get_mut(key) {
                f(key, value);
            }
        }
    }

    /// Sorts the order by key.
    pub fn sort(&mut self)
    where
        K: Ord,
    {
        self.order.reorder().sort_by(K::cmp);
    }

    /// Sorts the order by key with a comparator.
    pub fn sort_by_key_order(&mut self, compare: impl FnMut(&K, &K) -> Ordering) {
        self.order.reorder().sort_by(compare);
    }

    /// Sorts the order by value with a comparator. The table is untouched.
    pub fn sort_by_value(&mut self, mut compare: impl FnMut(&V, &V) -> Ordering) {
        let map = &self.map;
        self.order
            .reorder()
            .sort_by(|a, b| compare(live(map, a), live(map, b)));
    }

    /// Removes every entry, keeping the allocations.
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    /// Removes every entry and shrinks the table to at most `max_capacity`
    /// slots.
    pub fn clear_to(&mut self, max_capacity: usize) {
        self.map.clear_to(max_capacity);
        self.order.clear();
        self.order.shrink_to_fit();
    }

    /// Grows the table and the order index so `additional` more entries fit
    /// without reallocating.
    pub fn ensure_capacity(&mut self, additional: usize) {
        self.map.ensure_capacity(additional);
        self.order.reserve(additional);
    }

    /// Shrinks the table towards `max_capacity` slots without dropping below
    /// what the current entries need.
    pub fn shrink(&mut self, max_capacity: usize) {
        self.map.shrink(max_capacity);
        self.order.shrink_to_fit();
    }

    /// Shrinks the table and the order index as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.shrink(0);
    }

    /// Rebuilds the table with `new_capacity` slots (or more, if the entries
    /// need it) and a fresh hash multiplier. The order is unaffected.
    pub fn resize(&mut self, new_capacity: usize) {
        self.map.resize(new_capacity);
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> Iter<'_, K, V, R, S> {
        Iter {
            keys: self.order.as_slice().iter(),
            map: &self.map,
        }
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> slice::Iter<'_, K> {
        self.order.as_slice().iter()
    }

    /// Iterates over the values in order.
    pub fn values(&self) -> Values<'_, K, V, R, S> {
        Values { inner: self.iter() }
    }

    /// Removes and yields every entry in order.
    ///
    /// The map is empty as soon as this returns, whether or not the iterator
    /// is consumed.
    pub fn drain(&mut self) -> Drain<'_, K, V, R, S> {
        let mode = self.order.mode();
        let keys = mem::replace(&mut self.order, OrderIndex::with_capacity(mode, 0)).into_vec();
        let entries: Vec<(K, V)> = keys
            .iter()
            .map(|key| {
                self.map
                    .remove_entry(key)
                    .expect("order index holds only live keys")
            })
            .collect();
        Drain {
            entries: entries.into_iter(),
            _map: PhantomData,
        }
    }

    /// Returns a cursor that walks the entries in order and can remove the one
    /// it last returned.
    ///
    /// ```rust
    /// use probe_hash::PrimitiveOrderedMap;
    ///
    /// let mut map: PrimitiveOrderedMap<i32, i32> = (1..=6).map(|i| (i, i * 10)).collect();
    /// let mut cursor = map.cursor_mut();
    /// while let Some((k, v)) = cursor.next() {
    ///     if k % 2 == 0 {
    ///         cursor.remove();
    ///     } else {
    ///         *v += 1;
    ///     }
    /// }
    /// assert_eq!(map.order(), [1, 3, 5]);
    /// assert_eq!(map.get(&3), Some(&31));
    /// ```
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V, R, S> {
        CursorMut {
            map: self,
            next: 0,
            current: None,
        }
    }

    /// Writes the map in order, formatting keys and values with the given
    /// closures.
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
        text::append_entries(out, self.iter(), separators, append_key, append_value)
    }
}

impl<K, V, R, S> OrderedMap<K, V, R, S>
where
    K: Clone,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Inserts a key-value pair. A new key goes to the end of the order; an
    /// existing key keeps its position and gets the new value.
    ///
    /// Returns the previous value if the key was present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.map.get_mut(&key) {
            return Some(mem::replace(slot, value));
        }
        self.order.push(key.clone());
        self.map.insert(key, value);
        None
    }

    /// Like [`insert`](Self::insert), but returns a copy of the default value
    /// when the key was absent.
    pub fn put(&mut self, key: K, value: V) -> V
    where
        V: Clone,
    {
        self.insert(key, value)
            .unwrap_or_else(|| self.map.default_value().clone())
    }

    /// Inserts the pair only if `key` is absent. Returns `true` if it was
    /// inserted.
    pub fn put_if_absent(&mut self, key: K, value: V) -> bool {
        if self.map.contains_key(&key) {
            return false;
        }
        self.order.push(key.clone());
        self.map.insert(key, value);
        true
    }

    /// Copies every entry of `other` into this map, in `other`'s order.
    pub fn put_all(&mut self, other: &Self)
    where
        V: Clone,
    {
        self.ensure_capacity(other.len());
        for (k, v) in other.iter() {
            self.insert(k.clone(), v.clone());
        }
    }

    /// Inserts `key -> value` at position `index` of the order.
    ///
    /// If the key is already present its value is replaced and it moves to
    /// `index`; otherwise it is inserted there. Returns the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` for a new key, or `index >= len` for a present
    /// one.
    ///
    /// ```rust
    /// use probe_hash::PrimitiveOrderedMap;
    ///
    /// let mut map: PrimitiveOrderedMap<u8, u8> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
    /// assert_eq!(map.insert_at(0, 3, 30), Some(3));
    /// assert_eq!(map.order(), [3, 1, 2]);
    /// assert_eq!(map.insert_at(1, 9, 90), None);
    /// assert_eq!(map.order(), [3, 9, 1, 2]);
    /// ```
    pub fn insert_at(&mut self, index: usize, key: K, value: V) -> Option<V> {
        let len = self.order.len();
        if self.map.contains_key(&key) {
            assert!(index < len, "index {index} out of bounds for length {len}");
            let old = self.map.replace(&key, value);
            let current = self
                .position_of(&key)
                .expect("order index holds only live keys");
            if current != index {
                let moved = self.order.remove(current);
                self.order.insert(index, moved);
            }
            return old;
        }

        assert!(index <= len, "insertion index {index} out of bounds for length {len}");
        self.order.insert(index, key.clone());
        self.map.insert(key, value);
        None
    }

    /// Renames `before` to `after`, keeping the value and the position.
    ///
    /// Returns `false`, changing nothing, if `before` is absent or `after` is
    /// already present. Locating `before` in the order is linear; prefer
    /// [`alter_at`](Self::alter_at) when the position is known.
    pub fn alter(&mut self, before: &K, after: K) -> bool {
        if self.map.contains_key(&after) || !self.map.contains_key(before) {
            return false;
        }
        let Some(index) = self.position_of(before) else {
            return false;
        };
        self.alter_at(index, after)
    }

    /// Renames the key at `index` to `after`, keeping the value and the
    /// position.
    ///
    /// Returns `false`, changing nothing, if `index` is out of bounds or
    /// `after` is already present.
    pub fn alter_at(&mut self, index: usize, after: K) -> bool {
        if index >= self.order.len() || self.map.contains_key(&after) {
            return false;
        }
        let before = self.order.replace(index, after.clone());
        let value = self
            .map
            .remove(&before)
            .expect("order index holds only live keys");
        self.map.insert(after, value);
        true
    }
}

impl<K, V, R, S> OrderedMap<K, V, R, S>
where
    V: Default,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Creates an empty list-mode map with the given key strategy.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(crate::DEFAULT_CAPACITY, hasher)
    }

    /// Creates an empty list-mode map with at least `capacity` slots.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::with_config(
            capacity,
            crate::DEFAULT_LOAD_FACTOR,
            hasher,
            V::default(),
            OrderMode::List,
        )
    }
}

impl<K, V, R, S> OrderedMap<K, V, R, S>
where
    V: Default,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    /// Creates an empty list-mode map.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map with the given order mode.
    pub fn with_mode(mode: OrderMode) -> Self {
        Self::with_config(
            crate::DEFAULT_CAPACITY,
            crate::DEFAULT_LOAD_FACTOR,
            S::default(),
            V::default(),
            mode,
        )
    }

    /// Creates an empty list-mode map with at least `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    /// Creates an empty list-mode map with at least `capacity` slots and the
    /// given load factor.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Self {
        Self::with_config(
            capacity,
            load_factor,
            S::default(),
            V::default(),
            OrderMode::List,
        )
    }
}

impl<K, V, R, S> OrderedMap<K, V, R, S>
where
    K: Clone,
    V: Default,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    /// Reads a list-mode map from text, keeping the textual order.
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

impl<K, V, R, S> Default for OrderedMap<K, V, R, S>
where
    V: Default,
    R: SlotRepr<K>,
    S: KeyHasher<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, R, S> FromStr for OrderedMap<K, V, R, S>
where
    K: FromStr + Clone,
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

impl<K, V, R, S> FromIterator<(K, V)> for OrderedMap<K, V, R, S>
where
    K: Clone,
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

impl<K, V, R, S> Extend<(K, V)> for OrderedMap<K, V, R, S>
where
    K: Clone,
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.map.ensure_capacity(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, R, S> IntoIterator for OrderedMap<K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, R, S>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            keys: self.order.into_vec().into_iter(),
            map: self.map,
        }
    }
}

impl<'a, K, V, R, S> IntoIterator for &'a OrderedMap<K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, R, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of an [`OrderedMap`], in order.
pub struct Iter<'a, K, V, R: SlotRepr<K>, S> {
    keys: slice::Iter<'a, K>,
    map: &'a HashMap<K, V, R, S>,
}

impl<'a, K, V, R, S> Iterator for Iter<'a, K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        Some((key, live(self.map, key)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K, V, R, S> DoubleEndedIterator for Iter<'_, K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let key = self.keys.next_back()?;
        Some((key, live(self.map, key)))
    }
}

impl<K, V, R, S> ExactSizeIterator for Iter<'_, K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
}

/// An iterator over the values of an [`OrderedMap`], in order.
pub struct Values<'a, K, V, R: SlotRepr<K>, S> {
    inner: Iter<'a, K, V, R, S>,
}

impl<'a, K, V, R, S> Iterator for Values<'a, K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An owning iterator over the entries of an [`OrderedMap`], in order.
pub struct IntoIter<K, V, R: SlotRepr<K>, S> {
    keys: vec::IntoIter<K>,
    map: HashMap<K, V, R, S>,
}

impl<K, V, R, S> Iterator for IntoIter<K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        self.map.remove_entry(&key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

/// A draining iterator over the entries of an [`OrderedMap`], in order.
///
/// This struct is created by [`OrderedMap::drain`]. The map is already empty
/// when the iterator is handed out; dropping it early drops the rest.
pub struct Drain<'a, K, V, R: SlotRepr<K>, S> {
    entries: vec::IntoIter<(K, V)>,
    _map: PhantomData<&'a mut OrderedMap<K, V, R, S>>,
}

impl<K, V, R: SlotRepr<K>, S> Iterator for Drain<'_, K, V, R, S> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V, R: SlotRepr<K>, S> ExactSizeIterator for Drain<'_, K, V, R, S> {}

/// A cursor over an [`OrderedMap`] that walks the order and can remove the
/// entry it last returned.
///
/// After a removal the cursor continues at the same position, which now holds
/// the next key (list mode) or the former last key (bag mode).
pub struct CursorMut<'a, K, V, R: SlotRepr<K>, S> {
    map: &'a mut OrderedMap<K, V, R, S>,
    next: usize,
    current: Option<usize>,
}

impl<K, V, R, S> CursorMut<'_, K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Advances to the next entry in order.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(&K, &mut V)> {
        let index = self.next;
        let Some(key) = self.map.order.get(index) else {
            self.current = None;
            return None;
        };
        self.current = Some(index);
        self.next = index + 1;
        let value = self.map.map.get_mut(key)?;
        Some((key, value))
    }

    /// Position of the entry last returned by [`next`](Self::next).
    pub fn index(&self) -> Option<usize> {
        self.current
    }

    /// Removes the entry last returned by [`next`](Self::next).
    ///
    /// # Panics
    ///
    /// Panics if `next` has not returned an entry since the cursor was created
    /// or since the previous `remove`.
    pub fn remove(&mut self) -> (K, V) {
        let Some(index) = self.current.take() else {
            panic!("remove() called before next() or twice for the same entry");
        };
        self.next = index;
        self.map.remove_at(index)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
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

    type StrMap<V> = OrderedMap<String, V, Nullable, SipHashBuilder>;
    type IntMap<V> = OrderedMap<i32, V, ZeroSentinel, BitMix>;

    fn s(text: &str) -> String {
        text.to_string()
    }

    fn letters() -> StrMap<i32> {
        let mut map = StrMap::with_capacity_and_load_factor(4, 0.8);
        for (i, key) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
            map.insert(s(key), i as i32 + 1);
        }
        map
    }

    #[test]
    fn test_insertion_order_survives_resize() {
        let map = letters();
        assert!(map.capacity() > 4);
        assert_eq!(map.order(), ["a", "b", "c", "d", "e"]);
        assert_eq!(map.get_at(2), Some(&3));
        assert_eq!(map.key_at(4).map(String::as_str), Some("e"));
        assert_eq!(map.first(), Some((&s("a"), &1)));
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let mut map = letters();
        assert_eq!(map.remove(&s("b")), Some(2));
        assert_eq!(map.len(), 4);
        assert!(!map.contains_key(&s("b")));
        assert_eq!(map.order(), ["a", "c", "d", "e"]);
        assert_eq!(map.remove(&s("b")), None);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_bag_mode_swaps_last_into_gap() {
        let mut map: IntMap<i32> = OrderedMap::with_mode(OrderMode::Bag);
        for i in 1..=5 {
            map.insert(i, i);
        }
        assert_eq!(map.order_mode(), OrderMode::Bag);
        map.remove(&2);
        assert_eq!(map.order(), [1, 5, 3, 4]);
        assert_eq!(map.remove_at(0), (1, 1));
        assert_eq!(map.order(), [4, 5, 3]);
    }

    #[test]
    fn test_existing_key_keeps_position() {
        let mut map = letters();
        assert_eq!(map.insert(s("a"), 10), Some(1));
        assert_eq!(map.put(s("c"), 30), 3);
        assert_eq!(map.put(s("z"), 26), 0);
        assert_eq!(map.order(), ["a", "b", "c", "d", "e", "z"]);
        assert_eq!(map.get(&s("a")), Some(&10));
    }

    #[test]
    fn test_insert_at_relocates_existing_key() {
        let mut map = letters();
        assert_eq!(map.insert_at(0, s("d"), 40), Some(4));
        assert_eq!(map.order(), ["d", "a", "b", "c", "e"]);
        assert_eq!(map.insert_at(4, s("a"), 11), Some(1));
        assert_eq!(map.order(), ["d", "b", "c", "e", "a"]);
        assert_eq!(map.insert_at(5, s("f"), 6), None);
        assert_eq!(map.order(), ["d", "b", "c", "e", "a", "f"]);
        assert_eq!(map.get(&s("a")), Some(&11));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_insert_at_past_end_panics() {
        let mut map = letters();
        map.insert_at(7, s("x"), 0);
    }

    #[test]
    fn test_alter_renames_in_place() {
        let mut map = letters();
        assert!(map.alter(&s("c"), s("see")));
        assert_eq!(map.order(), ["a", "b", "see", "d", "e"]);
        assert_eq!(map.get(&s("see")), Some(&3));
        assert!(!map.contains_key(&s("c")));

        assert!(!map.alter(&s("missing"), s("x")));
        assert!(!map.alter(&s("a"), s("b")));
        assert_eq!(map.len(), 5);

        assert!(map.alter_at(0, s("A")));
        assert_eq!(map.key_at(0).map(String::as_str), Some("A"));
        assert_eq!(map.get(&s("A")), Some(&1));
        assert!(!map.alter_at(9, s("q")));
        assert!(!map.alter_at(1, s("d")));
    }

    #[test]
    fn test_positional_setters() {
        let mut map = letters();
        assert_eq!(map.set_at(1, 20), 2);
        assert_eq!(map.get(&s("b")), Some(&20));
        if let Some(v) = map.get_at_mut(4) {
            *v = 50;
        }
        assert_eq!(map.entry_at(4), Some((&s("e"), &50)));
        assert_eq!(map.get_at_mut(5), None);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_set_at_out_of_bounds_panics() {
        let mut map = letters();
        map.set_at(5, 0);
    }

    #[test]
    fn test_sorting_touches_only_order() {
        let mut map: IntMap<i32> = [(3, 1), (1, 3), (2, 2)].into_iter().collect();
        map.sort();
        assert_eq!(map.order(), [1, 2, 3]);
        map.sort_by_value(|a, b| a.cmp(b));
        assert_eq!(map.order(), [3, 2, 1]);
        map.sort_by_key_order(|a, b| b.cmp(a));
        assert_eq!(map.order(), [3, 2, 1]);
        assert_eq!(map.get(&1), Some(&3));
    }

    #[test]
    fn test_truncate_and_remove_range() {
        let mut map: IntMap<i32> = (0..10).map(|i| (i, i)).collect();
        map.truncate(8);
        assert_eq!(map.len(), 8);
        assert!(!map.contains_key(&9));
        map.remove_range(2..5);
        assert_eq!(map.order(), [0, 1, 5, 6, 7]);
        assert!(!map.contains_key(&3));
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_retain_and_for_each_mut() {
        let mut map: IntMap<i32> = (0..10).map(|i| (i, i)).collect();
        map.retain(|k, v| {
            *v *= 2;
            k % 3 != 0
        });
        assert_eq!(map.order(), [1, 2, 4, 5, 7, 8]);
        map.for_each_mut(|k, v| *v += k);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [3, 6, 12, 15, 21, 24]);
    }

    #[test]
    fn test_cursor_continues_after_removal() {
        let mut map: IntMap<i32> = (0..6).map(|i| (i, i)).collect();
        let mut cursor = map.cursor_mut();
        let mut seen = Vec::new();
        while let Some((&k, _)) = cursor.next() {
            seen.push(k);
            if k == 1 || k == 2 {
                assert_eq!(cursor.remove(), (k, k));
            }
        }
        assert_eq!(seen, [0, 1, 2, 3, 4, 5]);
        assert_eq!(map.order(), [0, 3, 4, 5]);
    }

    #[test]
    #[should_panic(expected = "before next()")]
    fn test_cursor_remove_without_next_panics() {
        let mut map: IntMap<i32> = (0..2).map(|i| (i, i)).collect();
        map.cursor_mut().remove();
    }

    #[test]
    fn test_drain_yields_in_order_and_clears_on_drop() {
        let mut map: IntMap<i32> = (0..5).map(|i| (4 - i, i)).collect();
        let first_two: Vec<_> = map.drain().take(2).collect();
        assert_eq!(first_two, [(4, 0), (3, 1)]);
        assert!(map.is_empty());
        assert!(!map.contains_key(&0));
        map.insert(7, 7);
        assert_eq!(map.order(), [7]);
    }

    #[test]
    fn test_leaked_drain_leaves_map_consistent() {
        let mut map: IntMap<i32> = (1..=3).map(|i| (i, i)).collect();
        mem::forget(map.drain());
        assert!(map.is_empty());
        assert!(!map.contains_key(&2));

        map.insert(2, 20);
        assert_eq!(map.order(), [2]);
        assert_eq!(map.order().len(), map.iter().count());
        assert_eq!(map.get(&2), Some(&20));
    }

    #[test]
    fn test_text_round_trip_keeps_order() {
        let map = letters();
        let text = map.to_string();
        assert_eq!(text, "{a=1, b=2, c=3, d=4, e=5}");
        let parsed: StrMap<i32> = text.parse().unwrap();
        assert_eq!(parsed, map);
        assert_eq!(parsed.order(), map.order());
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: IntMap<i32> = [(1, 1), (2, 2)].into_iter().collect();
        let b: IntMap<i32> = [(2, 2), (1, 1)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(alloc::format!("{b:?}"), "{2: 2, 1: 1}");
    }

    #[test]
    fn test_zero_key_ordered() {
        let mut map: IntMap<&str> = OrderedMap::new();
        map.insert(5, "five");
        map.insert(0, "zero");
        assert_eq!(map.order(), [5, 0]);
        assert_eq!(map.get_at(1), Some(&"zero"));
        assert_eq!(map.remove(&0), Some("zero"));
        assert_eq!(map.order(), [5]);
        assert_eq!(map.get_or_default(&0), &"");
    }

    #[test]
    fn test_into_iter_in_order() {
        let map = letters();
        let keys: Vec<String> = map.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_find_key_and_put_all() {
        let mut map = letters();
        assert_eq!(map.find_key(&4).map(String::as_str), Some("d"));
        let mut other = StrMap::new();
        other.insert(s("y"), 25);
        other.insert(s("a"), 100);
        map.put_all(&other);
        assert_eq!(map.order(), ["a", "b", "c", "d", "e", "y"]);
        assert_eq!(map.get(&s("a")), Some(&100));
    }
}
