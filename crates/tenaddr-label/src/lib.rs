//! # tenaddr-label
//!
//! Tensor dimension labels and their concurrent interning cache.
//!
//! This crate provides:
//! - [`Label`]: a numeric index or an interned string, compared by value
//! - [`LabelCache`]: a concurrent string → label table that keeps only weak
//!   references and reclaims entries when their last handle is dropped
//! - [`CacheConfig`]: capacity, ordinal and numeric-threshold tunables
//! - [`tracing_support`]: optional structured logging (`tracing` feature)
//!
//! ## Quick Start
//!
//! ```
//! use tenaddr_label::{Label, LabelCache};
//!
//! let cache = LabelCache::new(128, 1 << 32);
//! let height = cache.get_or_create_label("height").unwrap();
//! assert_eq!(cache.size(), 1);
//! assert_eq!(height.as_str(), Some("height"));
//!
//! // Numeric labels never touch the cache
//! let index = Label::numeric(42).unwrap();
//! assert_eq!(index.to_numeric(), 42);
//! assert_eq!(cache.size(), 1);
//!
//! drop(height);
//! assert_eq!(cache.size(), 0);
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit cache events through `tracing` and enable `init_tracing`
//! - `serde`: serialize labels as integers or strings, and cache configuration

#![deny(warnings)]

pub mod cache;
pub mod config;
pub mod error;
pub mod label;
pub mod tracing_support;

pub use cache::{CacheStats, LabelCache};
pub use config::CacheConfig;
pub use error::{LabelError, LabelResult};
pub use label::{Label, LabelValue};
