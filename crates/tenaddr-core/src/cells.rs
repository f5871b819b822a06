//! Sparse cell storage keyed by tensor addresses
//!
//! [`CellMap`] stores the non-empty cells of a sparse tensor as
//! (address, value) pairs, the same shape of data a COO tensor holds but with
//! [`TensorAddress`] keys so that string-labelled dimensions work as well as
//! numeric ones. All addresses in one map share the map's arity.
//!
//! # Examples
//!
//! ```
//! use tenaddr_core::{CellMap, TensorAddress};
//! use tenaddr_label::LabelCache;
//!
//! let cache = LabelCache::new(16, 1 << 20);
//! let mut cells = CellMap::new(2);
//! cells.insert(TensorAddress::of_strings_in(&cache, &["a", "x"]).unwrap(), 1.5).unwrap();
//! cells.insert(TensorAddress::of_strings_in(&cache, &["b", "x"]).unwrap(), 2.5).unwrap();
//!
//! let key = TensorAddress::of_strings_in(&cache, &["a", "x"]).unwrap();
//! assert_eq!(cells.get(&key), Some(&1.5));
//! assert_eq!(cells.nnz(), 2);
//! ```

use std::collections::HashMap;
use std::ops::Index;

use crate::address::TensorAddress;
use crate::error::{AddressError, AddressResult};

/// Sparse cell store with a fixed address arity
#[derive(Debug, Clone)]
pub struct CellMap<T> {
    arity: usize,
    cells: HashMap<TensorAddress, T>,
}

impl<T> CellMap<T> {
    /// Create an empty map for addresses of `arity` coordinates
    pub fn new(arity: usize) -> Self {
        Self {
            arity,
            cells: HashMap::new(),
        }
    }

    /// Create an empty map with room for `capacity` cells
    pub fn with_capacity(arity: usize, capacity: usize) -> Self {
        Self {
            arity,
            cells: HashMap::with_capacity(capacity),
        }
    }

    /// Build a map from (address, value) pairs; later duplicates overwrite earlier ones
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::ArityMismatch`] for the first address of the wrong arity.
    pub fn from_cells<I>(arity: usize, cells: I) -> AddressResult<Self>
    where
        I: IntoIterator<Item = (TensorAddress, T)>,
    {
        let mut map = Self::new(arity);
        for (address, value) in cells {
            map.insert(address, value)?;
        }
        Ok(map)
    }

    /// Arity every address in this map has
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of stored cells
    pub fn nnz(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is stored
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn check_arity(&self, address: &TensorAddress) -> AddressResult<()> {
        if address.size() != self.arity {
            return Err(AddressError::arity_mismatch(self.arity, address.size()));
        }
        Ok(())
    }

    /// Store `value` at `address`, returning the value it replaced
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::ArityMismatch`] if the address has the wrong arity.
    pub fn insert(&mut self, address: TensorAddress, value: T) -> AddressResult<Option<T>> {
        self.check_arity(&address)?;
        Ok(self.cells.insert(address, value))
    }

    /// Value at `address`
    pub fn get(&self, address: &TensorAddress) -> Option<&T> {
        self.cells.get(address)
    }

    /// Mutable value at `address`
    pub fn get_mut(&mut self, address: &TensorAddress) -> Option<&mut T> {
        self.cells.get_mut(address)
    }

    /// Whether a value is stored at `address`
    pub fn contains(&self, address: &TensorAddress) -> bool {
        self.cells.contains_key(address)
    }

    /// Remove and return the value at `address`
    pub fn remove(&mut self, address: &TensorAddress) -> Option<T> {
        self.cells.remove(address)
    }

    /// Cells in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&TensorAddress, &T)> {
        self.cells.iter()
    }

    /// Addresses in label order (numeric before string, then lexicographic)
    pub fn sorted_addresses(&self) -> Vec<&TensorAddress> {
        let mut addresses: Vec<&TensorAddress> = self.cells.keys().collect();
        addresses.sort();
        addresses
    }

    /// Merge `other` into this map, combining values stored at equal addresses
    ///
    /// `combine` receives this map's value first.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::ArityMismatch`] if the maps have different arities;
    /// nothing is merged in that case.
    pub fn merge_with<F>(&mut self, other: CellMap<T>, mut combine: F) -> AddressResult<()>
    where
        F: FnMut(T, T) -> T,
    {
        if other.arity != self.arity {
            return Err(AddressError::arity_mismatch(self.arity, other.arity));
        }
        for (address, incoming) in other.cells {
            let merged = match self.cells.remove(&address) {
                Some(existing) => combine(existing, incoming),
                None => incoming,
            };
            self.cells.insert(address, merged);
        }
        Ok(())
    }
}

impl<T> Index<&TensorAddress> for CellMap<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if no value is stored at `address`.
    fn index(&self, address: &TensorAddress) -> &T {
        &self.cells[address]
    }
}

impl<T> IntoIterator for CellMap<T> {
    type Item = (TensorAddress, T);
    type IntoIter = std::collections::hash_map::IntoIter<TensorAddress, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}
