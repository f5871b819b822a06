//! # TenAddr - Tensor Label Interning and Cell Addressing
//!
//! This is the **meta crate** that re-exports all TenAddr components for convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use tenaddr::prelude::*;
//!
//! let cache = LabelCache::new(64, 1 << 20);
//! let address = TensorAddress::of_strings_in(&cache, &["user42", "clicks"])?;
//! assert_eq!(address.size(), 2);
//! assert_eq!(cache.size(), 2);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Labels ([`label`])
//!
//! Numeric and interned string labels, the concurrent [`LabelCache`](label::LabelCache)
//! and its configuration.
//!
//! ```
//! use tenaddr::label::{Label, LabelCache};
//!
//! let cache = LabelCache::new(16, 1 << 16);
//! let a = cache.get_or_create_label("a").unwrap();
//! assert!(a.ptr_eq(&cache.get_or_create_label("a").unwrap()));
//! assert_ne!(Label::numeric(1).unwrap(), cache.get_or_create_label("1").unwrap());
//! ```
//!
//! ### Addresses ([`core`])
//!
//! Tensor cell addresses, named-dimension builders and sparse cell storage.
//!
//! ```
//! use tenaddr::core::{CellMap, TensorAddress};
//!
//! let mut cells = CellMap::new(2);
//! cells.insert(TensorAddress::of_indices(&[0, 1]), 1.0).unwrap();
//! assert_eq!(cells.nnz(), 1);
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): batch address construction on the rayon pool
//! - `serde`: serialization of labels, addresses and cache configuration
//! - `tracing`: structured logging through `tracing`

#![deny(warnings)]

/// Labels and the label cache
pub mod label {
    pub use tenaddr_label::*;
}

/// Tensor addresses and cell storage
pub mod core {
    pub use tenaddr_core::*;
}

/// Commonly used items
pub mod prelude {
    pub use tenaddr_core::{
        AddressBuilder, AddressError, AddressResult, CellMap, Dimensions, TensorAddress,
    };
    pub use tenaddr_label::{CacheConfig, Label, LabelCache, LabelError, LabelResult};
}
