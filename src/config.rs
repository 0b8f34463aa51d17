use crate::{
    error::{Error, Result},
    primes::next_prime,
};

/// Table length used by [`LongShortMap::new`](crate::LongShortMap::new).
pub const DEFAULT_CAPACITY: usize = 277;
/// Below this load a removal shrinks the table.
pub const DEFAULT_MIN_LOAD_FACTOR: f64 = 0.2;
/// Above this load an insertion grows the table.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.5;

/// Snapshot of a map's sizing parameters, as returned by
/// [`LongShortMap::internal_factors`](crate::LongShortMap::internal_factors).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalFactors {
    pub capacity: usize,
    pub min_load_factor: f64,
    pub max_load_factor: f64,
}

/// A validated `(min, max)` load factor pair, `0 < min < max < 1`.
///
/// Besides holding the two bounds it decides every capacity the map rehashes
/// into, so all sizing arithmetic lives here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadFactors {
    min: f64,
    max: f64,
}

impl Default for LoadFactors {
    #[inline]
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_LOAD_FACTOR,
            max: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl LoadFactors {
    /// Validates a load factor pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_short_map::config::LoadFactors;
    ///
    /// assert!(LoadFactors::new(0.4, 0.8).is_ok());
    /// assert!(LoadFactors::new(0.8, 0.4).is_err());
    /// assert!(LoadFactors::new(0.0, 0.5).is_err());
    /// assert!(LoadFactors::new(0.2, 1.0).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self> {
        // Written positively so NaN is rejected too.
        if !(0.0 < min && min < max && max < 1.0) {
            return Err(Error::InvalidArgument(format!(
                "load factors must satisfy 0 < min < max < 1, got min={min}, max={max}"
            )));
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Live entry count below which a removal shrinks a table of `capacity`.
    #[inline]
    pub(crate) fn low_water_mark(&self, capacity: usize) -> usize {
        (capacity as f64 * self.min) as usize
    }

    /// Live entry count above which an insertion grows a table of `capacity`.
    /// Two slots are always held back so probing finds a free slot.
    #[inline]
    pub(crate) fn high_water_mark(&self, capacity: usize) -> usize {
        capacity
            .saturating_sub(2)
            .min((capacity as f64 * self.max) as usize)
    }

    /// Capacity to grow into once `size` entries overflow the current table.
    pub(crate) fn grow_capacity(&self, size: usize) -> usize {
        let target = 4.0 * size as f64 / (3.0 * self.min + self.max);
        self.fit(size, target as usize)
    }

    /// Capacity to shrink into once `size` entries underflow the current table.
    pub(crate) fn shrink_capacity(&self, size: usize) -> usize {
        let target = 4.0 * size as f64 / (self.min + 3.0 * self.max);
        self.fit(size, target as usize)
    }

    /// Smallest capacity holding `size` entries without crossing `max`.
    pub(crate) fn minimum_capacity(&self, size: usize) -> usize {
        let target = (size as f64 / self.max).ceil();
        self.fit(size, target as usize)
    }

    fn fit(&self, size: usize, target: usize) -> usize {
        let mut capacity = next_prime(target.max(size + 1));
        while self.high_water_mark(capacity) < size {
            capacity = next_prime(capacity + 1);
        }
        capacity
    }
}
