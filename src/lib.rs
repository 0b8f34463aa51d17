//! An open addressing hash map from `i64` keys to `i16` values.
//!
//! Entries live unboxed in a prime-length slot table probed with double
//! hashing. Removed entries leave tombstones that are reclaimed when the
//! table is rebuilt, which happens whenever the load leaves the configured
//! `[min, max]` load factor band.

use core::{hash::BuildHasher, iter::FusedIterator};
use std::{
    collections::hash_map::RandomState,
    fmt::{self, Debug},
};

use raw::{
    iter::{RawIntoIter, RawIter},
    util::{make_hash, unlikely, InsertSlot},
    RawTable,
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod primes;
mod raw;

pub use config::{InternalFactors, LoadFactors};
pub use error::{Error, Result};

use crate::{config::DEFAULT_CAPACITY, primes::next_prime};

#[cfg(feature = "fxhash")]
pub type FxLongShortMap = LongShortMap<core::hash::BuildHasherDefault<rustc_hash::FxHasher>>;
#[cfg(feature = "ahash")]
pub type ALongShortMap = LongShortMap<core::hash::BuildHasherDefault<ahash::AHasher>>;

/// A hash map from `i64` to `i16` without per-entry boxing.
///
/// Absent keys read as `0` through [`get`](Self::get); use
/// [`contains_key`](Self::contains_key) or [`get_value`](Self::get_value)
/// when the difference matters.
///
/// Cloning copies the whole table, so a clone is fully independent of its
/// source.
#[derive(Clone)]
pub struct LongShortMap<S = RandomState> {
    raw: RawTable,
    factors: LoadFactors,
    low_water_mark: usize,
    high_water_mark: usize,
    hash_builder: S,
}

impl<S> Debug for LongShortMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<S: Default> Default for LongShortMap<S> {
    /// Creates an empty map with the default capacity and load factors.
    #[inline]
    fn default() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl LongShortMap<RandomState> {
    /// Creates an empty map with [`DEFAULT_CAPACITY`] slots and the default
    /// load factors.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_short_map::{config, LongShortMap};
    ///
    /// let map = LongShortMap::new();
    /// let factors = map.internal_factors();
    /// assert_eq!(factors.capacity, config::DEFAULT_CAPACITY);
    /// assert_eq!(factors.min_load_factor, config::DEFAULT_MIN_LOAD_FACTOR);
    /// assert_eq!(factors.max_load_factor, config::DEFAULT_MAX_LOAD_FACTOR);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty map whose table length is `capacity` rounded up to
    /// the next prime.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_short_map::{primes::next_prime, LongShortMap};
    ///
    /// let map = LongShortMap::with_capacity(1000);
    /// assert_eq!(map.capacity(), next_prime(1000));
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// Creates an empty map with explicit load factors.
    ///
    /// Fails with [`Error::InvalidArgument`] unless
    /// `0 < min_load_factor < max_load_factor < 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_short_map::{Error, LongShortMap};
    ///
    /// let map = LongShortMap::with_capacity_and_factors(907, 0.4, 0.8).unwrap();
    /// assert_eq!(map.internal_factors().max_load_factor, 0.8);
    ///
    /// let err = LongShortMap::with_capacity_and_factors(907, 0.8, 0.4).unwrap_err();
    /// assert!(matches!(err, Error::InvalidArgument(_)));
    /// ```
    pub fn with_capacity_and_factors(
        capacity: usize,
        min_load_factor: f64,
        max_load_factor: f64,
    ) -> Result<Self> {
        let factors = LoadFactors::new(min_load_factor, max_load_factor)?;
        Ok(Self::with_factors_and_hasher(
            capacity,
            factors,
            RandomState::new(),
        ))
    }
}

impl<S> LongShortMap<S> {
    /// Creates an empty map which will use the given hash builder to hash
    /// keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::hash::BuildHasherDefault;
    ///
    /// use long_short_map::LongShortMap;
    ///
    /// let s = BuildHasherDefault::<ahash::AHasher>::default();
    /// let mut map = LongShortMap::with_hasher(s);
    /// map.put(1, 2);
    /// ```
    #[inline]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hash_builder)
    }

    #[inline]
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::with_factors_and_hasher(capacity, LoadFactors::default(), hash_builder)
    }

    /// Creates an empty map from already validated load factors.
    pub fn with_factors_and_hasher(
        capacity: usize,
        factors: LoadFactors,
        hash_builder: S,
    ) -> Self {
        let table_capacity = next_prime(capacity);
        Self {
            raw: RawTable::with_capacity(table_capacity),
            factors,
            // A fresh table never shrinks; only a rehash sets the low mark.
            low_water_mark: 0,
            high_water_mark: factors.high_water_mark(table_capacity),
            hash_builder,
        }
    }

    /// Returns a reference to the map's [`BuildHasher`].
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Number of slots in the table. Always prime.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Current capacity and load factors.
    #[inline]
    pub fn internal_factors(&self) -> InternalFactors {
        InternalFactors {
            capacity: self.raw.capacity(),
            min_load_factor: self.factors.min(),
            max_load_factor: self.factors.max(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// An iterator over `(key, value)` pairs in slot order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.raw.iter(),
        }
    }

    #[inline]
    pub fn keys_iter(&self) -> Keys<'_> {
        Keys { inner: self.iter() }
    }

    #[inline]
    pub fn values_iter(&self) -> Values<'_> {
        Values { inner: self.iter() }
    }

    /// Calls `visit` with each key in slot order until it returns `false`.
    ///
    /// Returns `false` if the walk was stopped early.
    #[inline]
    pub fn for_each_key<F>(&self, mut visit: F) -> bool
    where
        F: FnMut(i64) -> bool,
    {
        self.iter().all(|(key, _)| visit(key))
    }

    /// Calls `visit` with each pair in slot order until it returns `false`.
    ///
    /// Returns `false` if the walk was stopped early.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_short_map::LongShortMap;
    ///
    /// let map: LongShortMap = (0..10).map(|k| (k, 1)).collect();
    /// let mut seen = 0;
    /// let completed = map.for_each_pair(|_, _| {
    ///     seen += 1;
    ///     seen < 2
    /// });
    /// assert!(!completed);
    /// assert_eq!(seen, 2);
    /// ```
    #[inline]
    pub fn for_each_pair<F>(&self, mut visit: F) -> bool
    where
        F: FnMut(i64, i16) -> bool,
    {
        self.iter().all(|(key, value)| visit(key, value))
    }

    /// Replaces the contents of `keys` and `values` with every pair accepted
    /// by `condition`, as parallel sequences in slot order.
    pub fn pairs_matching<F>(
        &self,
        mut condition: F,
        keys: &mut Vec<i64>,
        values: &mut Vec<i16>,
    ) where
        F: FnMut(i64, i16) -> bool,
    {
        keys.clear();
        values.clear();
        for (key, value) in self.iter() {
            if condition(key, value) {
                keys.push(key);
                values.push(value);
            }
        }
    }

    /// All keys in slot order.
    #[inline]
    pub fn keys(&self) -> Vec<i64> {
        self.keys_iter().collect()
    }

    /// Replaces the contents of `keys` with all keys in slot order.
    #[inline]
    pub fn keys_into(&self, keys: &mut Vec<i64>) {
        keys.clear();
        keys.extend(self.keys_iter());
    }

    /// All values in slot order, matching the order of [`keys`](Self::keys).
    #[inline]
    pub fn values(&self) -> Vec<i16> {
        self.values_iter().collect()
    }

    /// Replaces the contents of `values` with all values in slot order.
    #[inline]
    pub fn values_into(&self, values: &mut Vec<i16>) {
        values.clear();
        values.extend(self.values_iter());
    }

    /// Returns `true` if some key maps to `value`. Scans the whole table.
    #[inline]
    pub fn contains_value(&self, value: i16) -> bool {
        self.values_iter().any(|v| v == value)
    }

    /// The first key in slot order that maps to `value`.
    #[inline]
    pub fn key_of(&self, value: i16) -> Option<i64> {
        // Avoid `Option::map` because it bloats LLVM IR.
        match self.iter().find(|&(_, v)| v == value) {
            Some((key, _)) => Some(key),
            None => None,
        }
    }

    /// Replaces the contents of `keys` with all keys ordered by ascending
    /// value. Keys with equal values are ordered by key.
    pub fn keys_sorted_by_value(&self, keys: &mut Vec<i64>) {
        let pairs = self.sorted_pairs(|&(key, value)| (value, key));
        keys.clear();
        keys.extend(pairs.iter().map(|&(key, _)| key));
    }

    /// Replaces the contents of `keys` and `values` with all pairs, co-sorted
    /// by ascending key.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_short_map::LongShortMap;
    ///
    /// let map: LongShortMap = [(12, 70), (11, 100), (13, 30)].into_iter().collect();
    /// let (mut keys, mut values) = (Vec::new(), Vec::new());
    /// map.pairs_sorted_by_key(&mut keys, &mut values);
    /// assert_eq!(keys, [11, 12, 13]);
    /// assert_eq!(values, [100, 70, 30]);
    /// ```
    pub fn pairs_sorted_by_key(&self, keys: &mut Vec<i64>, values: &mut Vec<i16>) {
        let pairs = self.sorted_pairs(|&(key, _)| key);
        unzip_into(pairs, keys, values);
    }

    /// Replaces the contents of `keys` and `values` with all pairs, co-sorted
    /// by ascending value. Pairs with equal values are ordered by key.
    pub fn pairs_sorted_by_value(&self, keys: &mut Vec<i64>, values: &mut Vec<i16>) {
        let pairs = self.sorted_pairs(|&(key, value)| (value, key));
        unzip_into(pairs, keys, values);
    }

    fn sorted_pairs<T, F>(&self, sort_key: F) -> Vec<(i64, i16)>
    where
        T: Ord,
        F: FnMut(&(i64, i16)) -> T,
    {
        let mut pairs: Vec<(i64, i16)> = self.iter().collect();
        pairs.sort_unstable_by_key(sort_key);
        pairs
    }
}

fn unzip_into(pairs: Vec<(i64, i16)>, keys: &mut Vec<i64>, values: &mut Vec<i16>) {
    keys.clear();
    values.clear();
    keys.reserve(pairs.len());
    values.reserve(pairs.len());
    for (key, value) in pairs {
        keys.push(key);
        values.push(value);
    }
}

impl<S> LongShortMap<S>
where
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: i64) -> u64 {
        make_hash(&self.hash_builder, key)
    }

    /// Returns the value for `key`, or `0` if it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_short_map::LongShortMap;
    ///
    /// let mut map = LongShortMap::new();
    /// map.put(11, 22);
    /// map.put(12, 0);
    /// assert_eq!(map.get(11), 22);
    /// assert_eq!(map.get(12), 0);
    /// assert_eq!(map.get(13), 0);
    /// assert!(map.contains_key(12));
    /// assert!(!map.contains_key(13));
    /// ```
    #[inline]
    pub fn get(&self, key: i64) -> i16 {
        match self.get_value(key) {
            Some(value) => value,
            None => 0,
        }
    }

    /// Returns the value for `key`, if present.
    #[inline]
    pub fn get_value(&self, key: i64) -> Option<i16> {
        // Avoid `Option::map` because it bloats LLVM IR.
        match self.raw.find(self.hash(key), key) {
            Some(index) => Some(self.raw.value(index)),
            None => None,
        }
    }

    #[inline]
    pub fn contains_key(&self, key: i64) -> bool {
        self.raw.find(self.hash(key), key).is_some()
    }

    /// Associates `value` with `key`.
    ///
    /// Returns `true` if the key was newly added, `false` if an existing
    /// value was overwritten.
    #[inline]
    pub fn put(&mut self, key: i64, value: i16) -> bool {
        match self.raw.find_or_find_insert_slot(self.hash(key), key) {
            Ok(index) => {
                *self.raw.value_mut(index) = value;
                false
            }
            Err(slot) => {
                self.insert_in_slot(slot, key, value);
                true
            }
        }
    }

    /// Adds `delta` to the value of `key` if it is present, wrapping on
    /// overflow, otherwise inserts `if_absent`. Returns the stored value.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_short_map::LongShortMap;
    ///
    /// let mut map = LongShortMap::new();
    /// map.put(11, 22);
    /// assert_eq!(map.adjust_or_put_value(11, 1, 3), 25);
    /// assert_eq!(map.adjust_or_put_value(15, 1, 3), 1);
    /// ```
    pub fn adjust_or_put_value(&mut self, key: i64, if_absent: i16, delta: i16) -> i16 {
        match self.raw.find_or_find_insert_slot(self.hash(key), key) {
            Ok(index) => {
                let value = self.raw.value_mut(index);
                *value = value.wrapping_add(delta);
                *value
            }
            Err(slot) => {
                self.insert_in_slot(slot, key, if_absent);
                if_absent
            }
        }
    }

    #[inline]
    fn insert_in_slot(&mut self, slot: InsertSlot, key: i64, value: i16) {
        self.raw.insert_in_slot(slot, key, value);
        // Growing on free slots too bounds probe length when churn has
        // filled the table with tombstones.
        if unlikely(self.raw.len() > self.high_water_mark || self.raw.free() == 0) {
            let capacity = self.factors.grow_capacity(self.raw.len());
            self.rehash(capacity);
        }
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove_key(&mut self, key: i64) -> bool {
        let index = match self.raw.find(self.hash(key), key) {
            Some(index) => index,
            None => return false,
        };
        self.raw.erase(index);
        if unlikely(self.raw.len() < self.low_water_mark) {
            let capacity = self.factors.shrink_capacity(self.raw.len());
            if capacity < self.raw.capacity() {
                self.rehash(capacity);
            }
        }
        true
    }

    /// Removes every entry and trims the table to its minimum size.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.trim_to_size();
    }

    /// Shrinks the table to the smallest prime capacity that holds the
    /// current entries without exceeding the max load factor.
    pub fn trim_to_size(&mut self) {
        let capacity = self.factors.minimum_capacity(self.raw.len());
        if capacity < self.raw.capacity() {
            self.rehash(capacity);
        }
    }

    /// Grows the table, if needed, so that `additional` entries in total fit
    /// without exceeding the max load factor. Never shrinks.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_short_map::LongShortMap;
    ///
    /// let mut map = LongShortMap::new();
    /// map.ensure_capacity(1000);
    /// let capacity = map.capacity();
    /// for key in 0..1000 {
    ///     map.put(key, 1);
    /// }
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    pub fn ensure_capacity(&mut self, entries: usize) {
        if self.high_water_mark < entries {
            let capacity = self.factors.minimum_capacity(entries);
            if capacity > self.raw.capacity() {
                self.rehash(capacity);
            }
        }
    }

    fn rehash(&mut self, capacity: usize) {
        let old_capacity = self.raw.capacity();
        let hash_builder = &self.hash_builder;
        self.raw.resize(capacity, |key| make_hash(hash_builder, key));
        self.low_water_mark = self.factors.low_water_mark(capacity);
        self.high_water_mark = self.factors.high_water_mark(capacity);
        tracing::event!(
            Level::DEBUG,
            old_capacity = old_capacity,
            new_capacity = capacity,
            len = self.raw.len(),
            "rehash"
        );
        #[cfg(debug_assertions)]
        self.raw.assert_counts();
    }
}

impl<S1, S2> PartialEq<LongShortMap<S2>> for LongShortMap<S1>
where
    S2: BuildHasher,
{
    /// Maps are equal when they hold the same pairs, whatever their capacity,
    /// load factors or slot layout.
    fn eq(&self, other: &LongShortMap<S2>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get_value(key) == Some(value))
    }
}

impl<S: BuildHasher> Eq for LongShortMap<S> {}

impl<S> FromIterator<(i64, i16)> for LongShortMap<S>
where
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (i64, i16)>>(iter: T) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<S: BuildHasher> Extend<(i64, i16)> for LongShortMap<S> {
    fn extend<T: IntoIterator<Item = (i64, i16)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        // Later keys may already be present, so only trust half the hint
        // once the map has entries.
        let reserve = if self.is_empty() {
            iter.size_hint().0
        } else {
            (iter.size_hint().0 + 1) / 2
        };
        self.ensure_capacity(self.len() + reserve);
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

pub struct Iter<'a> {
    inner: RawIter<'a>,
}

impl Iterator for Iter<'_> {
    type Item = (i64, i16);

    #[inline]
    fn next(&mut self) -> Option<(i64, i16)> {
        self.inner.next()
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}
impl FusedIterator for Iter<'_> {}

pub struct Keys<'a> {
    inner: Iter<'a>,
}

impl Iterator for Keys<'_> {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<i64> {
        match self.inner.next() {
            Some((key, _)) => Some(key),
            None => None,
        }
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}
impl FusedIterator for Keys<'_> {}

pub struct Values<'a> {
    inner: Iter<'a>,
}

impl Iterator for Values<'_> {
    type Item = i16;

    #[inline]
    fn next(&mut self) -> Option<i16> {
        match self.inner.next() {
            Some((_, value)) => Some(value),
            None => None,
        }
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Values<'_> {}
impl FusedIterator for Values<'_> {}

pub struct IntoIter {
    inner: RawIntoIter,
}

impl Iterator for IntoIter {
    type Item = (i64, i16);

    #[inline]
    fn next(&mut self) -> Option<(i64, i16)> {
        self.inner.next()
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for IntoIter {}
impl FusedIterator for IntoIter {}

impl<S> IntoIterator for LongShortMap<S> {
    type Item = (i64, i16);
    type IntoIter = IntoIter;

    /// Creates a consuming iterator over the pairs in slot order.
    #[inline]
    fn into_iter(self) -> IntoIter {
        IntoIter {
            inner: self.raw.into_iter(),
        }
    }
}

impl<'a, S> IntoIterator for &'a LongShortMap<S> {
    type Item = (i64, i16);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
