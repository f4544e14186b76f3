//! Table construction parameters.

use crate::hash::DEFAULT_SEED;

/// Bucket count requested when none is given.
pub const DEFAULT_BUCKET_COUNT: usize = 16;

/// Load factor above which a table grows when none is configured.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 1.0;

/// Construction parameters shared by every table flavor.
///
/// ```
/// use chained_hash::TableConfig;
///
/// let config = TableConfig::default().bucket_count(10).seed(7).fixed_capacity();
/// assert_eq!(config.requested_buckets(), 10);
/// assert_eq!(config.max_load(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    bucket_count: usize,
    seed: u64,
    max_load_factor: Option<f64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            seed: DEFAULT_SEED,
            max_load_factor: Some(DEFAULT_MAX_LOAD_FACTOR),
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested bucket count; rounded up to a prime at construction.
    pub fn bucket_count(mut self, n: usize) -> Self {
        self.bucket_count = n;
        self
    }

    /// Seed folded into every digest for the table's lifetime.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Grow once `len / bucket_count` exceeds `factor`.
    ///
    /// Values that are not finite and positive fall back to
    /// [`DEFAULT_MAX_LOAD_FACTOR`].
    pub fn max_load_factor(mut self, factor: f64) -> Self {
        self.max_load_factor = Some(if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            DEFAULT_MAX_LOAD_FACTOR
        });
        self
    }

    /// Never grow automatically; the bucket count stays as constructed
    /// unless `rehash`/`reserve` is called explicitly.
    pub fn fixed_capacity(mut self) -> Self {
        self.max_load_factor = None;
        self
    }

    pub fn requested_buckets(&self) -> usize {
        self.bucket_count
    }

    pub fn seed_value(&self) -> u64 {
        self.seed
    }

    pub fn max_load(&self) -> Option<f64> {
        self.max_load_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = TableConfig::default();
        assert_eq!(c.requested_buckets(), DEFAULT_BUCKET_COUNT);
        assert_eq!(c.seed_value(), DEFAULT_SEED);
        assert_eq!(c.max_load(), Some(DEFAULT_MAX_LOAD_FACTOR));
    }

    #[test]
    fn invalid_load_factor_clamps_to_default() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let c = TableConfig::new().max_load_factor(bad);
            assert_eq!(c.max_load(), Some(DEFAULT_MAX_LOAD_FACTOR));
        }
        assert_eq!(TableConfig::new().max_load_factor(0.5).max_load(), Some(0.5));
    }
}
