//! Unified error types for tensor address construction
//!
//! # Design
//!
//! - **`AddressError`**: top-level enum for address, builder and cell-map failures
//! - Label failures (negative numeric coordinate, exhausted ordinals) are
//!   wrapped through `#[from] LabelError`
//!
//! # Examples
//!
//! ```
//! use tenaddr_core::{AddressError, TensorAddress};
//!
//! let address = TensorAddress::of_indices(&[1, 2]);
//! let err = address.object_label(5).unwrap_err();
//! assert!(matches!(err, AddressError::DimensionOutOfRange { index: 5, arity: 2 }));
//! ```

use tenaddr_label::LabelError;
use thiserror::Error;

/// Top-level error type for address operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Label creation or interning failed
    #[error("Label error: {0}")]
    Label(#[from] LabelError),

    /// Dimension index outside `0..arity`
    #[error("Dimension index {index} out of range for address of arity {arity}")]
    DimensionOutOfRange { index: usize, arity: usize },

    /// Address arity does not match the container or type it is used with
    #[error("Arity mismatch: expected {expected}, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// Dimension name not part of the address type
    #[error("Unknown dimension '{name}'")]
    UnknownDimension { name: String },

    /// Dimension left unbound when building
    #[error("Dimension '{name}' has no label")]
    MissingDimension { name: String },

    /// Dimension name listed or bound twice
    #[error("Dimension '{name}' given more than once")]
    DuplicateDimension { name: String },
}

/// Result type alias for address operations
pub type AddressResult<T> = Result<T, AddressError>;

impl AddressError {
    /// Create a dimension out of range error
    pub fn out_of_range(index: usize, arity: usize) -> Self {
        AddressError::DimensionOutOfRange { index, arity }
    }

    /// Create an arity mismatch error
    pub fn arity_mismatch(expected: usize, got: usize) -> Self {
        AddressError::ArityMismatch { expected, got }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = AddressError::out_of_range(3, 2);
        assert_eq!(
            err.to_string(),
            "Dimension index 3 out of range for address of arity 2"
        );
    }

    #[test]
    fn test_from_label_error() {
        let err: AddressError = LabelError::NegativeNumeric { value: -4 }.into();
        assert!(matches!(err, AddressError::Label(_)));
        assert_eq!(
            err.to_string(),
            "Label error: Numeric label must be non-negative, got -4"
        );
    }

    #[test]
    fn test_dimension_errors() {
        let err = AddressError::UnknownDimension {
            name: "z".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown dimension 'z'");
    }
}
