use crate::raw::util::{likely, InsertSlot};

pub mod iter;
pub mod util;

use self::iter::{RawIntoIter, RawIter};

/// State tag of one table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Ctrl {
    /// Never written since the table was built or cleared. Ends a probe.
    Free,
    /// Holds a live entry.
    Full,
    /// Held an entry that was removed. Probes continue past it.
    Removed,
}

/// A prime-length slot table probed with double hashing.
///
/// The table knows nothing about hashers or load factors: callers pass the
/// key hash in, and decide when to `resize`. It does keep the one invariant
/// probing depends on, that at least one slot stays `Free`.
#[derive(Clone)]
pub(crate) struct RawTable {
    ctrl: Vec<Ctrl>,
    data: Vec<(i64, i16)>,
    len: usize,
    // Free slots left. Reusing a `Removed` slot does not consume one.
    free: usize,
}

impl RawTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity >= 2);
        Self {
            ctrl: vec![Ctrl::Free; capacity],
            data: vec![(0, 0); capacity],
            len: 0,
            free: capacity,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.ctrl.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn free(&self) -> usize {
        self.free
    }

    /// First slot and step of the probe sequence for `hash`.
    ///
    /// The length is prime, so stepping backwards by any `step` in
    /// `1..length` visits every slot before repeating.
    #[inline]
    fn probe_start(&self, hash: u64) -> (usize, usize) {
        let length = self.capacity() as u64;
        let index = (hash % length) as usize;
        let step = if length > 2 {
            (hash % (length - 2)) as usize
        } else {
            0
        };
        (index, step.max(1))
    }

    #[inline]
    fn probe_next(&self, index: usize, step: usize) -> usize {
        if index >= step {
            index - step
        } else {
            index + self.capacity() - step
        }
    }

    /// Searches for `key`, returning its slot index.
    #[inline]
    pub(crate) fn find(&self, hash: u64, key: i64) -> Option<usize> {
        let (mut index, step) = self.probe_start(hash);
        loop {
            match self.ctrl[index] {
                Ctrl::Free => return None,
                Ctrl::Full if self.data[index].0 == key => return Some(index),
                Ctrl::Full | Ctrl::Removed => {}
            }
            index = self.probe_next(index, step);
        }
    }

    /// Searches for `key`. If it is absent, returns `Err` with the slot it
    /// should be written to: the first `Removed` slot on its probe sequence,
    /// or the `Free` slot that ended the search.
    #[inline]
    pub(crate) fn find_or_find_insert_slot(
        &self,
        hash: u64,
        key: i64,
    ) -> Result<usize, InsertSlot> {
        let (mut index, step) = self.probe_start(hash);
        let mut insert_slot = None;
        loop {
            match self.ctrl[index] {
                Ctrl::Free => {
                    return Err(InsertSlot {
                        index: insert_slot.unwrap_or(index),
                    })
                }
                Ctrl::Full => {
                    if self.data[index].0 == key {
                        return Ok(index);
                    }
                }
                Ctrl::Removed => {
                    if likely(insert_slot.is_none()) {
                        insert_slot = Some(index);
                    }
                }
            }
            index = self.probe_next(index, step);
        }
    }

    /// First non-full slot on the probe sequence. Only valid when the key is
    /// known to be absent.
    #[inline]
    fn find_insert_slot(&self, hash: u64) -> InsertSlot {
        let (mut index, step) = self.probe_start(hash);
        while self.ctrl[index] == Ctrl::Full {
            index = self.probe_next(index, step);
        }
        InsertSlot { index }
    }

    /// Writes a new entry into `slot`.
    #[inline]
    pub(crate) fn insert_in_slot(&mut self, slot: InsertSlot, key: i64, value: i16) {
        let index = slot.index;
        debug_assert_ne!(self.ctrl[index], Ctrl::Full);
        if self.ctrl[index] == Ctrl::Free {
            self.free -= 1;
        }
        self.ctrl[index] = Ctrl::Full;
        self.data[index] = (key, value);
        self.len += 1;
    }

    /// Inserts a key known to be absent.
    #[inline]
    pub(crate) fn insert_unique(&mut self, hash: u64, key: i64, value: i16) {
        let slot = self.find_insert_slot(hash);
        self.insert_in_slot(slot, key, value);
    }

    #[inline]
    pub(crate) fn value(&self, index: usize) -> i16 {
        debug_assert_eq!(self.ctrl[index], Ctrl::Full);
        self.data[index].1
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, index: usize) -> &mut i16 {
        debug_assert_eq!(self.ctrl[index], Ctrl::Full);
        &mut self.data[index].1
    }

    /// Tombstones the entry at `index`.
    #[inline]
    pub(crate) fn erase(&mut self, index: usize) {
        debug_assert_eq!(self.ctrl[index], Ctrl::Full);
        self.ctrl[index] = Ctrl::Removed;
        self.data[index] = (0, 0);
        self.len -= 1;
    }

    /// Marks every slot `Free` without reallocating.
    pub(crate) fn clear(&mut self) {
        self.ctrl.fill(Ctrl::Free);
        self.data.fill((0, 0));
        self.len = 0;
        self.free = self.capacity();
    }

    /// Rebuilds the table at `capacity`, dropping every tombstone.
    pub(crate) fn resize(&mut self, capacity: usize, hasher: impl Fn(i64) -> u64) {
        debug_assert!(capacity > self.len);
        let mut new_table = Self::with_capacity(capacity);
        for (key, value) in self.iter() {
            new_table.insert_unique(hasher(key), key, value);
        }
        debug_assert_eq!(new_table.len, self.len);
        *self = new_table;
    }

    #[inline]
    pub(crate) fn iter(&self) -> RawIter<'_> {
        RawIter {
            ctrl: self.ctrl.iter(),
            data: self.data.iter(),
            len: self.len,
        }
    }

    /// Debug check that the counters agree with the slot tags.
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn assert_counts(&self) {
        let full = self.ctrl.iter().filter(|c| **c == Ctrl::Full).count();
        let free = self.ctrl.iter().filter(|c| **c == Ctrl::Free).count();
        assert_eq!(full, self.len);
        assert_eq!(free, self.free);
        assert!(free >= 1);
    }
}

impl IntoIterator for RawTable {
    type Item = (i64, i16);
    type IntoIter = RawIntoIter;

    #[inline]
    fn into_iter(self) -> RawIntoIter {
        RawIntoIter {
            ctrl: self.ctrl.into_iter(),
            data: self.data.into_iter(),
            len: self.len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Identity hashing makes probe positions predictable.
    fn id(key: i64) -> u64 {
        key as u64
    }

    #[test]
    fn tombstone_keeps_later_keys_reachable() {
        let mut table = RawTable::with_capacity(7);
        // All three share start slot 3 and step 3: slots 3, 0, 4.
        for key in [3, 38, 73] {
            let slot = table.find_or_find_insert_slot(id(key), key).unwrap_err();
            table.insert_in_slot(slot, key, key as i16);
        }
        let middle = table.find(id(38), 38).unwrap();
        table.erase(middle);
        assert_eq!(table.find(id(38), 38), None);
        assert!(table.find(id(73), 73).is_some());
        assert_eq!(table.len(), 2);

        // Re-inserting 38 reuses its tombstone.
        let slot = table.find_or_find_insert_slot(id(38), 38).unwrap_err();
        assert_eq!(slot.index, middle);
        let free = table.free();
        table.insert_in_slot(slot, 38, 1);
        assert_eq!(table.free(), free);
        table.assert_counts();
    }

    #[test]
    fn existing_key_found_past_tombstone() {
        let mut table = RawTable::with_capacity(7);
        for key in [3, 38, 73] {
            table.insert_unique(id(key), key, 0);
        }
        let first = table.find(id(3), 3).unwrap();
        table.erase(first);
        assert_eq!(
            table.find_or_find_insert_slot(id(73), 73),
            Ok(table.find(id(73), 73).unwrap())
        );
    }

    #[test]
    fn resize_drops_tombstones() {
        let mut table = RawTable::with_capacity(11);
        for key in 0..5 {
            table.insert_unique(id(key), key, key as i16 * 10);
        }
        let index = table.find(id(2), 2).unwrap();
        table.erase(index);
        table.resize(23, id);
        assert_eq!(table.capacity(), 23);
        assert_eq!(table.len(), 4);
        assert_eq!(table.free(), 19);
        for key in [0, 1, 3, 4] {
            let index = table.find(id(key), key).unwrap();
            assert_eq!(table.value(index), key as i16 * 10);
        }
        table.assert_counts();
    }

    #[test]
    fn two_slot_table_probes_both_slots() {
        let mut table = RawTable::with_capacity(2);
        table.insert_unique(id(0), 0, 1);
        assert_eq!(table.find(id(2), 2), None);
        assert!(table.find(id(0), 0).is_some());
        table.assert_counts();
    }
}
