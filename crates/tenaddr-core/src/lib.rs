//! # tenaddr-core
//!
//! Tensor cell addresses for the TenAddr stack.
//!
//! This crate provides:
//!
//! - **Addresses** ([`TensorAddress`]): immutable label tuples with structural
//!   equality and hashing that do not depend on how they were built
//! - **Dimension metadata** ([`Dimensions`]) and a named-dimension
//!   [`AddressBuilder`]
//! - **Sparse cell storage** ([`CellMap`]) keyed by addresses
//! - **Batch construction** ([`parallel`]) over the rayon pool (`parallel` feature)
//!
//! ## Quick Start
//!
//! ```
//! use tenaddr_core::{CellMap, TensorAddress};
//! use tenaddr_label::{Label, LabelCache};
//!
//! let cache = LabelCache::new(64, 1 << 20);
//!
//! // Addresses from strings intern their coordinates
//! let a = TensorAddress::of_strings_in(&cache, &["1", "2"]).unwrap();
//! let b = TensorAddress::of_labels([
//!     cache.get_or_create_label("1").unwrap(),
//!     cache.get_or_create_label("2").unwrap(),
//! ]);
//! assert_eq!(a, b);
//!
//! // Numeric coordinates are a different label variant
//! assert_ne!(a, TensorAddress::of_indices(&[1, 2]));
//!
//! // Addresses as cell keys
//! let mut cells = CellMap::new(2);
//! cells.insert(a, 0.5).unwrap();
//! assert_eq!(cells.get(&b), Some(&0.5));
//! ```
//!
//! ## Error Handling
//!
//! Invalid input fails immediately with [`AddressError`]:
//!
//! ```
//! use tenaddr_core::TensorAddress;
//!
//! assert!(TensorAddress::of_numeric(&[-1]).is_err());
//! assert!(TensorAddress::of_indices(&[1, 2]).object_label(2).is_err());
//! ```
//!
//! ## Features
//!
//! - `parallel`: batch construction on the rayon thread pool
//! - `serde`: serialize addresses as label sequences
//! - `tracing`: structured logging of cache and batch events

#![deny(warnings)]

pub mod address;
pub mod builder;
pub mod cells;
pub mod dimensions;
pub mod error;
pub mod parallel;

pub use address::{TensorAddress, INLINE_ARITY};
pub use builder::AddressBuilder;
pub use cells::CellMap;
pub use dimensions::Dimensions;
pub use error::{AddressError, AddressResult};
