//! Label cache configuration
//!
//! [`CacheConfig`] carries the three tunables of a [`LabelCache`](crate::LabelCache):
//!
//! - `initial_capacity`: number of entries pre-allocated in the interning maps
//! - `max_ordinal`: exclusive upper bound on ordinals handed to string labels
//! - `numeric_threshold`: numeric labels below it skip the cache entirely in
//!   [`LabelCache::get_or_create_numeric`](crate::LabelCache::get_or_create_numeric)
//!
//! # Environment Variables
//!
//! [`CacheConfig::from_env`] overrides the defaults with:
//!
//! - `TENADDR_LABEL_CAPACITY`
//! - `TENADDR_MAX_ORDINAL`
//! - `TENADDR_NUMERIC_THRESHOLD`
//!
//! Unparseable values are ignored and the default is kept.

use crate::error::{LabelError, LabelResult};

/// Default number of pre-allocated cache entries
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Default exclusive upper bound on string label ordinals
pub const DEFAULT_MAX_ORDINAL: u64 = i64::MAX as u64;

/// Default exclusive upper bound on numeric labels.
///
/// Numeric labels below this value are thin value wrappers that never touch
/// the cache. With the default only `i64::MAX` itself takes the slow path.
pub const DEFAULT_NUMERIC_THRESHOLD: i64 = i64::MAX;

/// Configuration for a [`LabelCache`](crate::LabelCache)
///
/// # Examples
///
/// ```
/// use tenaddr_label::CacheConfig;
///
/// let config = CacheConfig::default()
///     .initial_capacity(64)
///     .max_ordinal(1 << 20);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_ordinal, 1 << 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    /// Pre-allocated entries in the label and ordinal maps
    pub initial_capacity: usize,
    /// Ordinals are drawn from `0..max_ordinal`
    pub max_ordinal: u64,
    /// Numeric labels below this value skip the cache
    pub numeric_threshold: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_ordinal: DEFAULT_MAX_ORDINAL,
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
        }
    }
}

impl CacheConfig {
    /// Create a configuration with the given capacity and ordinal bound
    pub fn new(initial_capacity: usize, max_ordinal: u64) -> Self {
        Self {
            initial_capacity,
            max_ordinal,
            ..Self::default()
        }
    }

    /// Defaults overridden by `TENADDR_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(capacity) = env_value::<usize>("TENADDR_LABEL_CAPACITY") {
            config.initial_capacity = capacity;
        }
        if let Some(max_ordinal) = env_value::<u64>("TENADDR_MAX_ORDINAL") {
            config.max_ordinal = max_ordinal;
        }
        if let Some(threshold) = env_value::<i64>("TENADDR_NUMERIC_THRESHOLD") {
            config.numeric_threshold = threshold;
        }
        config
    }

    /// Set the initial capacity
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the exclusive ordinal bound
    pub fn max_ordinal(mut self, max_ordinal: u64) -> Self {
        self.max_ordinal = max_ordinal;
        self
    }

    /// Set the bound below which numeric labels skip the cache
    pub fn numeric_threshold(mut self, threshold: i64) -> Self {
        self.numeric_threshold = threshold;
        self
    }

    /// Check that the configuration can back a cache
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::InvalidConfig`] if `max_ordinal` is zero or
    /// `numeric_threshold` is negative.
    pub fn validate(&self) -> LabelResult<()> {
        if self.max_ordinal == 0 {
            return Err(LabelError::invalid_config("max_ordinal must be positive"));
        }
        if self.numeric_threshold < 0 {
            return Err(LabelError::invalid_config(format!(
                "numeric_threshold must be non-negative, got {}",
                self.numeric_threshold
            )));
        }
        Ok(())
    }
}

fn env_value<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|raw| raw.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CacheConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert_eq!(config.numeric_threshold, i64::MAX);
    }

    #[test]
    fn test_zero_max_ordinal_rejected() {
        let err = CacheConfig::new(16, 0).validate().unwrap_err();
        assert!(err.to_string().contains("max_ordinal"));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = CacheConfig::default().numeric_threshold(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_setters() {
        let config = CacheConfig::default()
            .initial_capacity(8)
            .max_ordinal(100)
            .numeric_threshold(1000);
        assert_eq!(config, CacheConfig::new(8, 100).numeric_threshold(1000));
    }
}
