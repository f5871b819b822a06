//! Ordered dimension names of a tensor type
//!
//! [`Dimensions`] is the small piece of tensor type information addresses
//! need: the ordered list of dimension names, used by
//! [`AddressBuilder`](crate::AddressBuilder) to place named coordinates and by
//! [`TensorAddress::to_string_with`](crate::TensorAddress::to_string_with) to
//! render them.

use std::sync::Arc;

use crate::error::{AddressError, AddressResult};

/// Ordered, unique dimension names
///
/// Cloning is cheap; the names are shared.
///
/// # Examples
///
/// ```
/// use tenaddr_core::Dimensions;
///
/// let dims = Dimensions::new(["batch", "feature"]).unwrap();
/// assert_eq!(dims.len(), 2);
/// assert_eq!(dims.index_of("feature"), Some(1));
/// assert!(Dimensions::new(["x", "x"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimensions {
    names: Arc<[String]>,
}

impl Dimensions {
    /// Create from names in dimension order
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::DuplicateDimension`] if a name repeats.
    pub fn new<I, S>(names: I) -> AddressResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(AddressError::DuplicateDimension { name: name.clone() });
            }
        }
        Ok(Self {
            names: names.into(),
        })
    }

    /// Number of dimensions
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no dimensions (scalar type)
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of `name`, if present
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Name of dimension `index`
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Names in dimension order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}
