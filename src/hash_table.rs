//! The open-addressing table shared by every map and set in this crate.
//!
//! Keys live in a power-of-two array probed linearly from their ideal slot
//! (see [`placement`](crate::placement)). Removal uses backward-shift deletion,
//! so the table never holds tombstones: for every occupied slot, probing
//! forward from the key's ideal slot reaches it before reaching an empty slot.
//!
//! Keys that coincide with the empty marker of the [`SlotRepr`] (the zero key
//! of a [`ZeroSentinel`](crate::ZeroSentinel) table) are stored in a side slot
//! and still count towards [`len`](HashTable::len).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::mem;

use crate::key::KeyHasher;
use crate::key::SlotRepr;
use crate::placement::Placement;

/// Smallest number of slots a table allocates.
pub const MIN_CAPACITY: usize = 2;

#[inline]
pub(crate) fn validate_load_factor(load_factor: f32) {
    assert!(
        load_factor > 0.0 && load_factor <= 1.0,
        "load factor must be in (0, 1], got {load_factor}"
    );
}

#[inline]
fn table_size(requested: usize) -> usize {
    requested
        .max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .expect("capacity overflow")
}

/// Number of entries a table of `capacity` slots holds before it grows. At
/// least one slot always stays empty.
#[inline]
fn threshold_for(capacity: usize, load_factor: f32) -> usize {
    ((capacity as f64 * load_factor as f64) as usize).clamp(1, capacity - 1)
}

/// Smallest table size whose threshold admits `items` entries.
fn capacity_for(items: usize, load_factor: f32) -> usize {
    let mut capacity = table_size(items);
    while threshold_for(capacity, load_factor) < items {
        capacity = capacity.checked_mul(2).expect("capacity overflow");
    }
    capacity
}

fn vacant_keys<K, R: SlotRepr<K>>(capacity: usize) -> Box<[R::Slot]> {
    (0..capacity).map(|_| R::vacant()).collect()
}

fn vacant_values<V>(capacity: usize) -> Box<[Option<V>]> {
    (0..capacity).map(|_| None).collect()
}

/// A linear-probing hash table of `K -> V` entries.
///
/// `R` chooses how empty slots are marked and `S` hashes and compares keys.
/// Sets use `V = ()`.
///
/// ## Example
///
/// ```rust
/// use probe_hash::BitMix;
/// use probe_hash::HashTable;
/// use probe_hash::ZeroSentinel;
///
/// let mut table: HashTable<u64, &str, ZeroSentinel, BitMix> =
///     HashTable::with_capacity_and_hasher(8, 0.75, BitMix);
///
/// assert_eq!(table.insert(0, "zero"), None);
/// assert_eq!(table.insert(7, "seven"), None);
/// assert_eq!(table.insert(7, "SEVEN"), Some("seven"));
///
/// assert_eq!(table.get(&0), Some(&"zero"));
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.remove(&0), Some("zero"));
/// assert_eq!(table.get(&0), None);
/// ```
pub struct HashTable<K, V, R: SlotRepr<K>, S> {
    keys: Box<[R::Slot]>,
    values: Box<[Option<V>]>,
    zero: Option<(K, V)>,

    len: usize,
    load_factor: f32,
    threshold: usize,
    placement: Placement,

    hasher: S,
    _repr: PhantomData<R>,
}

impl<K, V, R, S> Debug for HashTable<K, V, R, S>
where
    K: Debug,
    V: Debug,
    R: SlotRepr<K>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.len)
            .field("capacity", &self.keys.len())
            .field("threshold", &self.threshold)
            .field(
                "hash_multiplier",
                &format_args!("{:#018x}", self.placement.multiplier()),
            )
            .field("zero", &self.zero)
            .field(
                "slots",
                &self
                    .keys
                    .iter()
                    .zip(self.values.iter())
                    .map(|(k, v)| R::key(k).zip(v.as_ref()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<K, V, R, S> Clone for HashTable<K, V, R, S>
where
    K: Clone,
    V: Clone,
    R: SlotRepr<K>,
    R::Slot: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            values: self.values.clone(),
            zero: self.zero.clone(),
            len: self.len,
            load_factor: self.load_factor,
            threshold: self.threshold,
            placement: self.placement,
            hasher: self.hasher.clone(),
            _repr: PhantomData,
        }
    }
}

impl<K, V, R, S> HashTable<K, V, R, S>
where
    R: SlotRepr<K>,
{
    /// Creates an empty table with at least `capacity` slots (rounded up to a
    /// power of two) and the given load factor.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in `(0, 1]`.
    pub fn with_capacity_and_hasher(capacity: usize, load_factor: f32, hasher: S) -> Self {
        validate_load_factor(load_factor);
        let capacity = table_size(capacity);
        Self {
            keys: vacant_keys::<K, R>(capacity),
            values: vacant_values(capacity),
            zero: None,
            len: 0,
            load_factor,
            threshold: threshold_for(capacity, load_factor),
            placement: Placement::new(capacity),
            hasher,
            _repr: PhantomData,
        }
    }

    /// Number of entries, including the side-slot entry if present.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the key array. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Number of entries the table holds before it doubles.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// The configured load factor.
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// The multiplier currently mixed into every hash. Changes on each resize.
    pub fn hash_multiplier(&self) -> u64 {
        self.placement.multiplier()
    }

    /// The key hashing and equality strategy.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Removes every entry, keeping the allocated slots.
    pub fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        self.keys.iter_mut().for_each(|slot| *slot = R::vacant());
        self.values.iter_mut().for_each(|value| *value = None);
        self.zero = None;
        self.len = 0;
    }

    /// Removes every entry and, if the table is larger than `max_capacity`
    /// slots (rounded up to a power of two), reallocates it at that size.
    pub fn clear_to(&mut self, max_capacity: usize) {
        let max_capacity = table_size(max_capacity);
        if self.capacity() <= max_capacity {
            self.clear();
            return;
        }
        self.keys = vacant_keys::<K, R>(max_capacity);
        self.values = vacant_values(max_capacity);
        self.zero = None;
        self.len = 0;
        self.placement.resize(max_capacity);
        self.threshold = threshold_for(max_capacity, self.load_factor);
    }

    /// Returns an iterator over the entries in slot order. The side-slot entry
    /// comes first.
    pub fn iter(&self) -> Iter<'_, K, V, R> {
        Iter {
            zero: self.zero.as_ref().map(|(k, v)| (k, v)),
            slots: self.keys.iter().zip(self.values.iter()),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the entries with mutable access to values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, R> {
        IterMut {
            zero: self.zero.as_mut().map(|(k, v)| (&*k, v)),
            slots: self.keys.iter().zip(self.values.iter_mut()),
            remaining: self.len,
        }
    }

    /// Removes and yields every entry. The table keeps its capacity.
    pub fn drain(&mut self) -> Drain<'_, K, V, R> {
        let capacity = self.capacity();
        let keys = mem::replace(&mut self.keys, vacant_keys::<K, R>(capacity));
        let values = mem::replace(&mut self.values, vacant_values(capacity));
        Drain {
            inner: IntoIter {
                zero: self.zero.take(),
                slots: keys.into_vec().into_iter().zip(values.into_vec()),
                remaining: mem::replace(&mut self.len, 0),
            },
            _table: PhantomData,
        }
    }
}

impl<K, V, R, S> HashTable<K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    #[inline(always)]
    fn place(&self, key: &K) -> usize {
        self.placement.place(self.hasher.hash_key(key))
    }

    /// Finds the slot holding `key`, or the empty slot that ends its probe
    /// sequence.
    #[inline]
    fn locate(&self, key: &K) -> Result<usize, usize> {
        let mask = self.placement.mask();
        let mut slot = self.place(key);
        loop {
            match R::key(&self.keys[slot]) {
                None => return Err(slot),
                Some(k) if self.hasher.key_eq(k, key) => return Ok(slot),
                Some(_) => slot = (slot + 1) & mask,
            }
        }
    }

    /// Returns a reference to the value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key equal to `key` and its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        if R::is_reserved(key) {
            return self.zero.as_ref().map(|(k, v)| (k, v));
        }
        let slot = self.locate(key).ok()?;
        Some((R::key(&self.keys[slot])?, self.values[slot].as_ref()?))
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if R::is_reserved(key) {
            return self.zero.as_mut().map(|(_, v)| v);
        }
        let slot = self.locate(key).ok()?;
        self.values[slot].as_mut()
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        if R::is_reserved(key) {
            return self.zero.is_some();
        }
        self.locate(key).is_ok()
    }

    /// Inserts `key -> value`, returning the previous value if `key` was
    /// present. A new key that would push the table past its threshold doubles
    /// the table first.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if R::is_reserved(&key) {
            if let Some((_, old)) = self.zero.as_mut() {
                return Some(mem::replace(old, value));
            }
            self.grow_for_one();
            self.zero = Some((key, value));
            self.len += 1;
            return None;
        }

        match self.locate(&key) {
            Ok(slot) => self.values[slot].replace(value),
            Err(slot) => {
                if self.len >= self.threshold {
                    self.grow_for_one();
                    self.insert_fresh(key, value);
                } else {
                    self.keys[slot] = R::fill(key);
                    self.values[slot] = Some(value);
                }
                self.len += 1;
                None
            }
        }
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and value if it was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        if R::is_reserved(key) {
            let entry = self.zero.take()?;
            self.len -= 1;
            return Some(entry);
        }
        let slot = self.locate(key).ok()?;
        self.remove_slot(slot).map(|(entry, _)| entry)
    }

    /// Empties `slot` and closes the gap by shifting later entries of the
    /// cluster backwards.
    ///
    /// Returns the removed entry and the slot left empty once the shift ends.
    fn remove_slot(&mut self, slot: usize) -> Option<((K, V), usize)> {
        let key = R::take(&mut self.keys[slot])?;
        let value = self.values[slot].take()?;
        self.len -= 1;

        let mask = self.placement.mask();
        let mut hole = slot;
        let mut next = (slot + 1) & mask;
        loop {
            let ideal = match R::key(&self.keys[next]) {
                Some(k) => self.place(k),
                None => break,
            };
            // The entry at `next` may fill the hole only if the hole lies on
            // its probe path, i.e. strictly closer to its ideal slot.
            if (next.wrapping_sub(ideal) & mask) > (hole.wrapping_sub(ideal) & mask) {
                self.keys.swap(hole, next);
                self.values.swap(hole, next);
                hole = next;
            }
            next = (next + 1) & mask;
        }

        Some(((key, value), hole))
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        let mut cursor = self.cursor_mut();
        while let Some((key, value)) = cursor.next() {
            if !f(key, value) {
                cursor.remove();
            }
        }
    }

    /// Returns a cursor that walks every entry once and can remove the entry
    /// it last returned.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V, R, S> {
        let start = self
            .keys
            .iter()
            .position(|slot| R::key(slot).is_none())
            .unwrap_or(0);
        CursorMut {
            table: self,
            start,
            visited: 0,
            zero_pending: true,
            current: None,
        }
    }

    /// Grows the table so that it holds at least `additional` more entries
    /// without resizing.
    pub fn ensure_capacity(&mut self, additional: usize) {
        let needed = capacity_for(
            self.len.checked_add(additional).expect("capacity overflow"),
            self.load_factor,
        );
        if needed > self.capacity() {
            self.resize(needed);
        }
    }

    /// Shrinks the table to `max_capacity` slots (rounded up to a power of
    /// two), or to the smallest size that still fits every entry.
    pub fn shrink(&mut self, max_capacity: usize) {
        let target = table_size(max_capacity).max(capacity_for(self.len, self.load_factor));
        if target < self.capacity() {
            self.resize(target);
        }
    }

    /// Shrinks the table to the smallest size that fits every entry.
    pub fn shrink_to_fit(&mut self) {
        self.shrink(0);
    }

    /// Changes the load factor, growing the table if its entries no longer fit.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in `(0, 1]`.
    pub fn set_load_factor(&mut self, load_factor: f32) {
        validate_load_factor(load_factor);
        self.load_factor = load_factor;
        self.threshold = threshold_for(self.capacity(), load_factor);
        if self.len > self.threshold {
            self.resize(capacity_for(self.len, load_factor));
        }
    }

    /// Reallocates the table with `new_capacity` slots, rounded up to a power
    /// of two and to the smallest size that fits every entry. Rotates the hash
    /// multiplier and re-inserts every entry.
    pub fn resize(&mut self, new_capacity: usize) {
        let new_capacity = table_size(new_capacity).max(capacity_for(self.len, self.load_factor));

        let old_keys = mem::replace(&mut self.keys, vacant_keys::<K, R>(new_capacity));
        let old_values = mem::replace(&mut self.values, vacant_values(new_capacity));
        self.placement.resize(new_capacity);
        self.threshold = threshold_for(new_capacity, self.load_factor);

        for (mut slot, value) in old_keys.into_vec().into_iter().zip(old_values.into_vec()) {
            if let (Some(key), Some(value)) = (R::take(&mut slot), value) {
                self.insert_fresh(key, value);
            }
        }
    }

    #[cold]
    fn grow_for_one(&mut self) {
        if self.len >= self.threshold {
            let doubled = self.capacity().checked_mul(2).expect("capacity overflow");
            self.resize(doubled.max(capacity_for(self.len + 1, self.load_factor)));
        }
    }

    /// Places a key known to be absent without comparing it to anything.
    fn insert_fresh(&mut self, key: K, value: V) {
        let mask = self.placement.mask();
        let mut slot = self.place(&key);
        while R::key(&self.keys[slot]).is_some() {
            slot = (slot + 1) & mask;
        }
        self.keys[slot] = R::fill(key);
        self.values[slot] = Some(value);
    }

    /// Counts occupied slots by distance from their ideal slot.
    ///
    /// Index `d` of the result holds the number of keys found `d` slots past
    /// their ideal slot. The side-slot entry is not counted.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mask = self.placement.mask();
        let mut bins: Vec<usize> = Vec::new();
        for (slot, key) in self.keys.iter().enumerate() {
            if let Some(key) = R::key(key) {
                let distance = slot.wrapping_sub(self.place(key)) & mask;
                if bins.len() <= distance {
                    bins.resize(distance + 1, 0);
                }
                bins[distance] += 1;
            }
        }
        ProbeHistogram { bins }
    }

    /// Returns utilization and probe-length statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let occupied: usize = histogram.bins.iter().sum();
        let total_distance: usize = histogram
            .bins
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();

        DebugStats {
            len: self.len,
            capacity: self.capacity(),
            threshold: self.threshold,
            occupied_slots: occupied,
            load: self.len as f64 / self.capacity() as f64,
            longest_probe: histogram.bins.len().saturating_sub(1),
            mean_probe: if occupied == 0 {
                0.0
            } else {
                total_distance as f64 / occupied as f64
            },
            hash_multiplier: self.placement.multiplier(),
        }
    }

    /// Asserts that every occupied slot is reachable from its ideal slot
    /// without crossing an empty slot, and that the bookkeeping agrees.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self)
    where
        K: Debug,
    {
        let mask = self.placement.mask();
        let mut occupied = 0;
        for (slot, (key, value)) in self.keys.iter().zip(self.values.iter()).enumerate() {
            assert_eq!(R::key(key).is_some(), value.is_some(), "slot {slot} misaligned");
            let Some(key) = R::key(key) else { continue };
            occupied += 1;
            let mut probe = self.place(key);
            while probe != slot {
                assert!(
                    R::key(&self.keys[probe]).is_some(),
                    "{key:?} in slot {slot} unreachable: slot {probe} is empty"
                );
                probe = (probe + 1) & mask;
            }
        }
        assert_eq!(occupied + usize::from(self.zero.is_some()), self.len);
        assert!(self.len <= self.threshold);
        assert!(self.threshold < self.capacity());
        assert!(self.capacity().is_power_of_two());
    }
}

/// Probe-distance counts produced by [`HashTable::probe_histogram`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// `bins[d]` is the number of keys stored `d` slots past their ideal slot.
    pub bins: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Pretty-prints the histogram as a horizontal bar chart.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }
        let max_bar = 60usize;
        println!("probe histogram:");
        for (distance, &count) in self.bins.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{distance:>3} | {} ({count})", "█".repeat(width));
        }
    }
}

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries, including the side-slot entry.
    pub len: usize,
    /// Number of slots.
    pub capacity: usize,
    /// Entries allowed before the next resize.
    pub threshold: usize,
    /// Slots holding a key.
    pub occupied_slots: usize,
    /// `len / capacity`.
    pub load: f64,
    /// Largest distance between a key's slot and its ideal slot.
    pub longest_probe: usize,
    /// Mean distance between a key's slot and its ideal slot.
    pub mean_probe: f64,
    /// Current hash multiplier.
    pub hash_multiplier: u64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} slots ({:.2}% load, threshold {})",
            self.len,
            self.capacity,
            self.load * 100.0,
            self.threshold
        );
        println!("Occupied slots: {}", self.occupied_slots);
        println!(
            "Probe length: longest {}, mean {:.3}",
            self.longest_probe, self.mean_probe
        );
        println!("Hash multiplier: {:#018x}", self.hash_multiplier);
    }
}

/// Cursor position of a [`CursorMut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Zero,
    Slot(usize),
}

/// A cursor over a [`HashTable`] that can remove the entry it last returned.
///
/// The walk starts right after a slot that was empty when the cursor was
/// created and wraps once around the table. Backward shifts never move an
/// entry across an empty slot, so removals only pull not-yet-visited entries
/// into the current slot, which the cursor then looks at again.
pub struct CursorMut<'a, K, V, R: SlotRepr<K>, S> {
    table: &'a mut HashTable<K, V, R, S>,
    start: usize,
    visited: usize,
    zero_pending: bool,
    current: Option<Position>,
}

impl<K, V, R, S> CursorMut<'_, K, V, R, S>
where
    R: SlotRepr<K>,
    S: KeyHasher<K>,
{
    /// Advances to the next entry.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(&K, &mut V)> {
        if mem::take(&mut self.zero_pending) && self.table.zero.is_some() {
            self.current = Some(Position::Zero);
            return self.table.zero.as_mut().map(|(k, v)| (&*k, v));
        }

        let mask = self.table.placement.mask();
        while self.visited < self.table.capacity() {
            let slot = (self.start + 1 + self.visited) & mask;
            self.visited += 1;
            if R::key(&self.table.keys[slot]).is_some() {
                self.current = Some(Position::Slot(slot));
                let key = R::key(&self.table.keys[slot])?;
                let value = self.table.values[slot].as_mut()?;
                return Some((key, value));
            }
        }

        self.current = None;
        None
    }

    /// Removes the entry last returned by [`next`](Self::next).
    ///
    /// # Panics
    ///
    /// Panics if `next` has not returned an entry since the cursor was created
    /// or since the previous `remove`.
    pub fn remove(&mut self) -> (K, V) {
        match self.current.take() {
            Some(Position::Zero) => {
                let entry = self.table.zero.take().expect("side slot emptied under cursor");
                self.table.len -= 1;
                entry
            }
            Some(Position::Slot(slot)) => {
                let (entry, hole) = self
                    .table
                    .remove_slot(slot)
                    .expect("cursor slot emptied under cursor");
                if hole != slot {
                    self.visited -= 1;
                }
                entry
            }
            None => panic!("remove() called before next() or twice for the same entry"),
        }
    }
}

/// An iterator over the entries of a [`HashTable`].
pub struct Iter<'a, K, V, R: SlotRepr<K>> {
    zero: Option<(&'a K, &'a V)>,
    slots: core::iter::Zip<core::slice::Iter<'a, R::Slot>, core::slice::Iter<'a, Option<V>>>,
    remaining: usize,
}

impl<'a, K, V, R: SlotRepr<K>> Iterator for Iter<'a, K, V, R> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.zero.take() {
            self.remaining -= 1;
            return Some(entry);
        }
        for (slot, value) in &mut self.slots {
            if let (Some(key), Some(value)) = (R::key(slot), value.as_ref()) {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, R: SlotRepr<K>> ExactSizeIterator for Iter<'_, K, V, R> {}

/// An iterator over the entries of a [`HashTable`] with mutable values.
pub struct IterMut<'a, K, V, R: SlotRepr<K>> {
    zero: Option<(&'a K, &'a mut V)>,
    slots: core::iter::Zip<core::slice::Iter<'a, R::Slot>, core::slice::IterMut<'a, Option<V>>>,
    remaining: usize,
}

impl<'a, K, V, R: SlotRepr<K>> Iterator for IterMut<'a, K, V, R> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.zero.take() {
            self.remaining -= 1;
            return Some(entry);
        }
        for (slot, value) in &mut self.slots {
            if let (Some(key), Some(value)) = (R::key(slot), value.as_mut()) {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, R: SlotRepr<K>> ExactSizeIterator for IterMut<'_, K, V, R> {}

/// An owning iterator over the entries of a [`HashTable`].
pub struct IntoIter<K, V, R: SlotRepr<K>> {
    zero: Option<(K, V)>,
    slots: core::iter::Zip<alloc::vec::IntoIter<R::Slot>, alloc::vec::IntoIter<Option<V>>>,
    remaining: usize,
}

impl<K, V, R: SlotRepr<K>> Iterator for IntoIter<K, V, R> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.zero.take() {
            self.remaining -= 1;
            return Some(entry);
        }
        for (mut slot, value) in &mut self.slots {
            if let (Some(key), Some(value)) = (R::take(&mut slot), value) {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, R: SlotRepr<K>> ExactSizeIterator for IntoIter<K, V, R> {}

impl<K, V, R: SlotRepr<K>, S> IntoIterator for HashTable<K, V, R, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, R>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            zero: self.zero,
            slots: self.keys.into_vec().into_iter().zip(self.values.into_vec()),
            remaining: self.len,
        }
    }
}

/// A draining iterator over the entries of a [`HashTable`].
///
/// This struct is created by [`HashTable::drain`]. The table is already empty
/// when the iterator is handed out; dropping it early drops the rest.
pub struct Drain<'a, K, V, R: SlotRepr<K>> {
    inner: IntoIter<K, V, R>,
    _table: PhantomData<&'a mut ()>,
}

impl<K, V, R: SlotRepr<K>> Iterator for Drain<'_, K, V, R> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, R: SlotRepr<K>> ExactSizeIterator for Drain<'_, K, V, R> {}
