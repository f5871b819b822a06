//! Immutable tensor cell addresses
//!
//! A [`TensorAddress`] is a fixed-arity tuple of [`Label`]s naming one cell
//! of a tensor. Addresses are created once per cell and used as hash-map keys,
//! so their layout is kept compact:
//!
//! - **Indexed**: every coordinate is numeric and is stored as a plain `u64`,
//!   without label handles or reference counts
//! - **Labeled**: at least one coordinate is a string label
//!
//! Both layouts keep up to [`INLINE_ARITY`] coordinates inline and only spill
//! to the heap for higher arities. The layout is never observable: equality,
//! hashing, ordering and formatting all go through [`LabelValue`], so an
//! indexed address equals a labeled address holding the same numeric labels.
//!
//! # Examples
//!
//! ```
//! use tenaddr_core::TensorAddress;
//! use tenaddr_label::{Label, LabelCache};
//!
//! let cache = LabelCache::new(16, 1 << 20);
//!
//! let by_index = TensorAddress::of_indices(&[1, 2]);
//! let by_label = TensorAddress::of_labels([Label::index(1), Label::index(2)]);
//! assert_eq!(by_index, by_label);
//!
//! let by_string = TensorAddress::of_strings_in(&cache, &["1", "2"]).unwrap();
//! assert_ne!(by_index, by_string);
//! assert_eq!(by_string.to_string(), "(1, 2)");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;
use tenaddr_label::{Label, LabelCache, LabelValue};

use crate::dimensions::Dimensions;
use crate::error::{AddressError, AddressResult};

/// Number of coordinates stored inline before spilling to the heap
pub const INLINE_ARITY: usize = 4;

#[derive(Clone)]
enum Coordinates {
    Indexed(SmallVec<[u64; INLINE_ARITY]>),
    Labeled(SmallVec<[Label; INLINE_ARITY]>),
}

/// Immutable tuple of labels identifying one tensor cell
#[derive(Clone)]
pub struct TensorAddress {
    coords: Coordinates,
}

impl TensorAddress {
    /// The zero-arity address of a scalar tensor
    pub fn empty() -> Self {
        Self {
            coords: Coordinates::Indexed(SmallVec::new()),
        }
    }

    /// Address from numeric coordinates
    ///
    /// No cache interaction; arity is `indices.len()`.
    pub fn of_indices(indices: &[u64]) -> Self {
        Self {
            coords: Coordinates::Indexed(SmallVec::from_slice(indices)),
        }
    }

    /// Address from signed numeric coordinates
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Label`] wrapping `NegativeNumeric` for the
    /// first negative coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenaddr_core::TensorAddress;
    ///
    /// assert_eq!(
    ///     TensorAddress::of_numeric(&[3, 4]).unwrap(),
    ///     TensorAddress::of_indices(&[3, 4])
    /// );
    /// assert!(TensorAddress::of_numeric(&[3, -4]).is_err());
    /// ```
    pub fn of_numeric(values: &[i64]) -> AddressResult<Self> {
        let indices = values
            .iter()
            .map(|&value| Label::numeric(value).map(|label| label.to_numeric()))
            .collect::<Result<SmallVec<[u64; INLINE_ARITY]>, _>>()?;
        Ok(Self {
            coords: Coordinates::Indexed(indices),
        })
    }

    /// Address from string coordinates interned in the active cache
    pub fn of_strings<S: AsRef<str>>(values: &[S]) -> AddressResult<Self> {
        Self::of_strings_in(&LabelCache::active(), values)
    }

    /// Address from string coordinates interned in `cache`
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Label`] if the cache cannot issue a new ordinal.
    pub fn of_strings_in<S: AsRef<str>>(cache: &LabelCache, values: &[S]) -> AddressResult<Self> {
        let labels = values
            .iter()
            .map(|value| cache.get_or_create_label(value.as_ref()))
            .collect::<Result<SmallVec<[Label; INLINE_ARITY]>, _>>()?;
        Ok(Self {
            coords: Coordinates::Labeled(labels),
        })
    }

    /// Address from labels, choosing the compact layout when all are numeric
    pub fn of_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = Label>,
    {
        let labels: SmallVec<[Label; INLINE_ARITY]> = labels.into_iter().collect();
        if labels.iter().all(Label::is_numeric) {
            Self {
                coords: Coordinates::Indexed(labels.iter().map(Label::to_numeric).collect()),
            }
        } else {
            Self {
                coords: Coordinates::Labeled(labels),
            }
        }
    }

    /// Arity of this address
    #[inline]
    pub fn size(&self) -> usize {
        match &self.coords {
            Coordinates::Indexed(indices) => indices.len(),
            Coordinates::Labeled(labels) => labels.len(),
        }
    }

    /// Whether this is the zero-arity address
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[cfg(test)]
    fn is_indexed(&self) -> bool {
        matches!(self.coords, Coordinates::Indexed(_))
    }

    /// Value of coordinate `dimension`, or `None` if out of range
    #[inline]
    pub fn value(&self, dimension: usize) -> Option<LabelValue<'_>> {
        match &self.coords {
            Coordinates::Indexed(indices) => {
                indices.get(dimension).map(|&i| LabelValue::Numeric(i))
            }
            Coordinates::Labeled(labels) => labels.get(dimension).map(Label::value),
        }
    }

    /// Coordinate values in dimension order
    pub fn values(&self) -> impl Iterator<Item = LabelValue<'_>> + '_ {
        (0..self.size()).filter_map(move |dimension| self.value(dimension))
    }

    /// Label of coordinate `dimension`
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::DimensionOutOfRange`] unless `dimension < size()`.
    pub fn object_label(&self, dimension: usize) -> AddressResult<Label> {
        let label = match &self.coords {
            Coordinates::Indexed(indices) => indices.get(dimension).map(|&i| Label::index(i)),
            Coordinates::Labeled(labels) => labels.get(dimension).cloned(),
        };
        label.ok_or_else(|| AddressError::out_of_range(dimension, self.size()))
    }

    /// Numeric handle of coordinate `dimension`
    ///
    /// The index for numeric coordinates, the cache ordinal for string ones.
    pub fn numeric_label(&self, dimension: usize) -> AddressResult<u64> {
        match &self.coords {
            Coordinates::Indexed(indices) => indices
                .get(dimension)
                .copied()
                .ok_or_else(|| AddressError::out_of_range(dimension, self.size())),
            Coordinates::Labeled(_) => Ok(self.object_label(dimension)?.to_numeric()),
        }
    }

    /// Labels in dimension order
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        (0..self.size()).filter_map(move |dimension| self.object_label(dimension).ok())
    }

    /// Copy of this address with coordinate `dimension` replaced
    pub fn with_label(&self, dimension: usize, label: Label) -> AddressResult<Self> {
        if dimension >= self.size() {
            return Err(AddressError::out_of_range(dimension, self.size()));
        }
        let mut labels: SmallVec<[Label; INLINE_ARITY]> = self.labels().collect();
        labels[dimension] = label;
        Ok(Self::of_labels(labels))
    }

    /// Address made of the coordinates at `dimensions`, in that order
    ///
    /// # Examples
    ///
    /// ```
    /// use tenaddr_core::TensorAddress;
    ///
    /// let address = TensorAddress::of_indices(&[7, 8, 9]);
    /// let partial = address.partial_copy(&[2, 0]).unwrap();
    /// assert_eq!(partial, TensorAddress::of_indices(&[9, 7]));
    /// ```
    pub fn partial_copy(&self, dimensions: &[usize]) -> AddressResult<Self> {
        let labels = dimensions
            .iter()
            .map(|&dimension| self.object_label(dimension))
            .collect::<AddressResult<SmallVec<[Label; INLINE_ARITY]>>>()?;
        Ok(Self::of_labels(labels))
    }

    /// Render as `{dim:label,...}` using the given dimension names
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::ArityMismatch`] if `dimensions` has a different arity.
    pub fn to_string_with(&self, dimensions: &Dimensions) -> AddressResult<String> {
        if dimensions.len() != self.size() {
            return Err(AddressError::arity_mismatch(dimensions.len(), self.size()));
        }
        let cells: Vec<String> = dimensions
            .names()
            .zip(self.values())
            .map(|(name, value)| format!("{name}:{value}"))
            .collect();
        Ok(format!("{{{}}}", cells.join(",")))
    }
}

impl Default for TensorAddress {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Label> for TensorAddress {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self::of_labels(iter)
    }
}

impl PartialEq for TensorAddress {
    fn eq(&self, other: &Self) -> bool {
        match (&self.coords, &other.coords) {
            (Coordinates::Indexed(a), Coordinates::Indexed(b)) => a == b,
            _ => self.size() == other.size() && self.values().eq(other.values()),
        }
    }
}

impl Eq for TensorAddress {}

impl Hash for TensorAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size().hash(state);
        for value in self.values() {
            value.hash(state);
        }
    }
}

impl PartialOrd for TensorAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TensorAddress {
    fn cmp(&self, other: &Self) -> Ordering {
        self.values().cmp(other.values())
    }
}

impl fmt::Display for TensorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for TensorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("TensorAddress");
        for label in self.labels() {
            tuple.field(&label);
        }
        tuple.finish()
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::TensorAddress;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use tenaddr_label::Label;

    impl Serialize for TensorAddress {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.size()))?;
            for label in self.labels() {
                seq.serialize_element(&label)?;
            }
            seq.end()
        }
    }

    impl<'de> Deserialize<'de> for TensorAddress {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let labels = Vec::<Label>::deserialize(deserializer)?;
            Ok(TensorAddress::of_labels(labels))
        }
    }
}
