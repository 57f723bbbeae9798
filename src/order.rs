use alloc::vec::Vec;
use core::cmp::Ordering;
use core::ops::Range;

/// How an ordered collection keeps its order index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderMode {
    /// Insertion order is preserved. Removing from the middle shifts every
    /// later key down.
    #[default]
    List,
    /// Removal swaps the last key into the vacated position, so order is only
    /// stable until the first removal.
    Bag,
}

/// The sequence of live keys of an ordered map or set.
#[derive(Debug, Clone)]
pub(crate) struct OrderIndex<K> {
    keys: Vec<K>,
    mode: OrderMode,
}

impl<K> OrderIndex<K> {
    pub(crate) fn with_capacity(mode: OrderMode, capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            mode,
        }
    }

    pub(crate) fn mode(&self) -> OrderMode {
        self.mode
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn as_slice(&self) -> &[K] {
        &self.keys
    }

    pub(crate) fn get(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    pub(crate) fn push(&mut self, key: K) {
        self.keys.push(key);
    }

    /// Puts `key` at `index`. In bag mode the key previously at `index` moves
    /// to the end instead of shifting everything after it.
    pub(crate) fn insert(&mut self, index: usize, key: K) {
        assert!(
            index <= self.keys.len(),
            "insertion index {index} out of bounds for length {}",
            self.keys.len()
        );
        match self.mode {
            OrderMode::List => self.keys.insert(index, key),
            OrderMode::Bag => {
                self.keys.push(key);
                let last = self.keys.len() - 1;
                self.keys.swap(index, last);
            }
        }
    }

    pub(crate) fn remove(&mut self, index: usize) -> K {
        match self.mode {
            OrderMode::List => self.keys.remove(index),
            OrderMode::Bag => self.keys.swap_remove(index),
        }
    }

    pub(crate) fn replace(&mut self, index: usize, key: K) -> K {
        core::mem::replace(&mut self.keys[index], key)
    }

    pub(crate) fn position(&self, mut is_key: impl FnMut(&K) -> bool) -> Option<usize> {
        self.keys.iter().position(|k| is_key(k))
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&K) -> bool) {
        self.keys.retain(keep);
    }

    pub(crate) fn truncate(&mut self, len: usize) -> alloc::vec::Drain<'_, K> {
        let end = self.keys.len();
        self.keys.drain(len.min(end)..)
    }

    pub(crate) fn drain(&mut self, range: Range<usize>) -> alloc::vec::Drain<'_, K> {
        self.keys.drain(range)
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional);
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.keys.shrink_to_fit();
    }

    pub(crate) fn reorder(&mut self) -> Reorder<'_, K> {
        Reorder { keys: &mut self.keys }
    }

    pub(crate) fn into_vec(self) -> Vec<K> {
        self.keys
    }
}

/// Mutable access to the order of an ordered collection.
///
/// Only permutations are possible, so the order index always holds exactly the
/// collection's keys.
#[derive(Debug)]
pub struct Reorder<'a, K> {
    keys: &'a mut [K],
}

impl<K> Reorder<'_, K> {
    /// The keys in their current order.
    pub fn as_slice(&self) -> &[K] {
        self.keys
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Swaps the keys at positions `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either position is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.keys.swap(a, b);
    }

    /// Reverses the order.
    pub fn reverse(&mut self) {
        self.keys.reverse();
    }

    /// Moves the first `mid` keys to the end.
    pub fn rotate_left(&mut self, mid: usize) {
        self.keys.rotate_left(mid);
    }

    /// Moves the last `k` keys to the front.
    pub fn rotate_right(&mut self, k: usize) {
        self.keys.rotate_right(k);
    }

    /// Stable sort with a comparator.
    pub fn sort_by(&mut self, compare: impl FnMut(&K, &K) -> Ordering) {
        self.keys.sort_by(compare);
    }

    /// Stable sort by an extracted key.
    pub fn sort_by_key<T: Ord>(&mut self, f: impl FnMut(&K) -> T) {
        self.keys.sort_by_key(f);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn index(mode: OrderMode, keys: &[i32]) -> OrderIndex<i32> {
        let mut order = OrderIndex::with_capacity(mode, keys.len());
        keys.iter().for_each(|&k| order.push(k));
        order
    }

    #[test]
    fn list_remove_preserves_order() {
        let mut order = index(OrderMode::List, &[1, 2, 3, 4]);
        assert_eq!(order.remove(1), 2);
        assert_eq!(order.as_slice(), &[1, 3, 4]);
    }

    #[test]
    fn bag_remove_swaps_last_in() {
        let mut order = index(OrderMode::Bag, &[1, 2, 3, 4]);
        assert_eq!(order.remove(1), 2);
        assert_eq!(order.as_slice(), &[1, 4, 3]);
    }

    #[test]
    fn list_insert_shifts() {
        let mut order = index(OrderMode::List, &[1, 2, 3]);
        order.insert(1, 9);
        assert_eq!(order.as_slice(), &[1, 9, 2, 3]);
        order.insert(4, 7);
        assert_eq!(order.as_slice(), &[1, 9, 2, 3, 7]);
    }

    #[test]
    fn bag_insert_moves_displaced_key_to_end() {
        let mut order = index(OrderMode::Bag, &[1, 2, 3]);
        order.insert(0, 9);
        assert_eq!(order.as_slice(), &[9, 2, 3, 1]);
        order.insert(4, 5);
        assert_eq!(order.as_slice(), &[9, 2, 3, 1, 5]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn insert_past_end_panics() {
        let mut order = index(OrderMode::Bag, &[1]);
        order.insert(3, 2);
    }

    #[test]
    fn reorder_only_permutes() {
        let mut order = index(OrderMode::List, &[3, 1, 2]);
        let mut view = order.reorder();
        view.sort_by(|a, b| a.cmp(b));
        assert_eq!(view.as_slice(), &[1, 2, 3]);
        view.rotate_left(1);
        assert_eq!(view.as_slice(), &[2, 3, 1]);
        view.reverse();
        view.swap(0, 2);
        assert_eq!(order.as_slice(), &[2, 3, 1]);
    }

    #[test]
    fn truncate_and_drain_return_removed_keys() {
        let mut order = index(OrderMode::List, &[1, 2, 3, 4, 5]);
        assert_eq!(order.truncate(3).collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(order.truncate(10).count(), 0);
        assert_eq!(order.drain(0..1).collect::<Vec<_>>(), vec![1]);
        assert_eq!(order.as_slice(), &[2, 3]);
        assert_eq!(order.position(|&k| k == 3), Some(1));
        assert_eq!(order.position(|&k| k == 1), None);
    }
}
