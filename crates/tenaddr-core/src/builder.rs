//! Named-dimension address builder
//!
//! [`AddressBuilder`] binds labels to dimension names in any order and
//! produces a [`TensorAddress`] in the dimension order of its
//! [`Dimensions`]. Building fails if a dimension is left unbound.
//!
//! # Examples
//!
//! ```
//! use tenaddr_core::{AddressBuilder, Dimensions, TensorAddress};
//! use tenaddr_label::LabelCache;
//!
//! let cache = LabelCache::new(16, 1 << 20);
//! let dims = Dimensions::new(["x", "key"]).unwrap();
//!
//! let mut builder = AddressBuilder::new(&dims);
//! builder.add_string(&cache, "key", "a").unwrap();
//! builder.add_index("x", 3).unwrap();
//! let address = builder.build().unwrap();
//!
//! assert_eq!(address.to_string_with(&dims).unwrap(), "{x:3,key:a}");
//! ```

use smallvec::SmallVec;
use tenaddr_label::{Label, LabelCache};

use crate::address::{TensorAddress, INLINE_ARITY};
use crate::dimensions::Dimensions;
use crate::error::{AddressError, AddressResult};

/// Builder binding labels to named dimensions
#[derive(Debug, Clone)]
pub struct AddressBuilder {
    dimensions: Dimensions,
    labels: SmallVec<[Option<Label>; INLINE_ARITY]>,
}

impl AddressBuilder {
    /// Start an address of the given dimensions with every coordinate unbound
    pub fn new(dimensions: &Dimensions) -> Self {
        Self {
            dimensions: dimensions.clone(),
            labels: SmallVec::from_elem(None, dimensions.len()),
        }
    }

    /// Dimensions this builder produces addresses for
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Bind `label` to dimension `name`, replacing any earlier binding
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::UnknownDimension`] if `name` is not a dimension.
    pub fn add(&mut self, name: &str, label: Label) -> AddressResult<&mut Self> {
        let index = self
            .dimensions
            .index_of(name)
            .ok_or_else(|| AddressError::UnknownDimension {
                name: name.to_string(),
            })?;
        self.labels[index] = Some(label);
        Ok(self)
    }

    /// Bind a numeric label to dimension `name`
    pub fn add_index(&mut self, name: &str, index: u64) -> AddressResult<&mut Self> {
        self.add(name, Label::index(index))
    }

    /// Bind a string label, interned in `cache`, to dimension `name`
    pub fn add_string(
        &mut self,
        cache: &LabelCache,
        name: &str,
        value: &str,
    ) -> AddressResult<&mut Self> {
        let label = cache.get_or_create_label(value)?;
        self.add(name, label)
    }

    /// Whether every dimension has a label
    pub fn is_complete(&self) -> bool {
        self.labels.iter().all(Option::is_some)
    }

    /// Build the address
    ///
    /// The builder is left untouched and can be reused.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingDimension`] naming the first unbound dimension.
    pub fn build(&self) -> AddressResult<TensorAddress> {
        let labels = self
            .labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                label.clone().ok_or_else(|| AddressError::MissingDimension {
                    name: self.dimensions.name(index).unwrap_or_default().to_string(),
                })
            })
            .collect::<AddressResult<SmallVec<[Label; INLINE_ARITY]>>>()?;
        Ok(TensorAddress::of_labels(labels))
    }
}
