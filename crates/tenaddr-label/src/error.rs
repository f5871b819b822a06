//! Error types for label construction and interning
//!
//! Every failure in this crate is an invalid-argument or capacity condition
//! reported synchronously to the caller. Races inside the cache are resolved
//! locally and never show up here.
//!
//! # Examples
//!
//! ```
//! use tenaddr_label::{Label, LabelError};
//!
//! let err = Label::numeric(-1).unwrap_err();
//! assert!(matches!(err, LabelError::NegativeNumeric { value: -1 }));
//! assert_eq!(err.to_string(), "Numeric label must be non-negative, got -1");
//! ```

use thiserror::Error;

/// Errors raised while creating or interning labels
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// A numeric label was requested for a negative value
    #[error("Numeric label must be non-negative, got {value}")]
    NegativeNumeric { value: i64 },

    /// Every ordinal below `max_ordinal` is held by a live label
    #[error("All {max_ordinal} label ordinals are in use by live labels")]
    OrdinalsExhausted { max_ordinal: u64 },

    /// Cache configuration rejected by [`CacheConfig::validate`](crate::CacheConfig::validate)
    #[error("Invalid cache configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Result type alias for label operations
pub type LabelResult<T> = Result<T, LabelError>;

impl LabelError {
    /// Create a configuration error with a message
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        LabelError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by the caller's argument rather than cache capacity
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LabelError::NegativeNumeric { .. })
    }
}
