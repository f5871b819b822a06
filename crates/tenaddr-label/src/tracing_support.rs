//! Structured logging support for label interning
//!
//! With the `tracing` feature enabled, cache lifecycle events are emitted as
//! `tracing` events and [`init_tracing`] installs a `tracing-subscriber`
//! formatter. Without the feature every helper compiles to a no-op.
//!
//! # Example
//!
//! ```ignore
//! use tenaddr_label::tracing_support::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::default())?;
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directive (default: `tenaddr_label=info,warn`)
//! - `TENADDR_LOG_FORMAT`: `json`, `compact` or `pretty` (default: `pretty`)

use anyhow::Result;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    Pretty,
    /// JSON format for structured logging
    Json,
    /// Compact format (single line per event)
    Compact,
}

impl TracingFormat {
    /// Parse from string; unknown values fall back to `Pretty`
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => TracingFormat::Json,
            "compact" => TracingFormat::Compact,
            _ => TracingFormat::Pretty,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output format
    pub format: TracingFormat,
    /// Filter directive (e.g., "tenaddr_label=debug")
    pub filter: String,
    /// Enable ANSI colors
    pub with_ansi: bool,
    /// Show target module paths
    pub with_target: bool,
    /// Show thread IDs
    pub with_thread_ids: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var("TENADDR_LOG_FORMAT")
            .map(|s| TracingFormat::parse(&s))
            .unwrap_or(TracingFormat::Pretty);
        let filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "tenaddr_label=info,warn".to_string());

        Self {
            format,
            filter,
            with_ansi: true,
            with_target: true,
            with_thread_ids: true,
        }
    }
}

/// Install a global subscriber for the given configuration
///
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;

    match config.format {
        TracingFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_thread_ids(config.with_thread_ids)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(config.with_target)
                .with_thread_ids(config.with_thread_ids)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_thread_ids(config.with_thread_ids)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
    }

    Ok(())
}

/// Stub for when tracing feature is disabled
#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: TracingConfig) -> Result<()> {
    Ok(())
}

#[cfg(feature = "tracing")]
pub(crate) fn record_cache_created(initial_capacity: usize, max_ordinal: u64) {
    tracing::debug!(initial_capacity, max_ordinal, "label_cache_created");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn record_cache_created(_initial_capacity: usize, _max_ordinal: u64) {}

#[cfg(feature = "tracing")]
pub(crate) fn record_sweep(evicted: usize, live: usize) {
    tracing::debug!(evicted, live, "label_cache_sweep");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn record_sweep(_evicted: usize, _live: usize) {}

#[cfg(feature = "tracing")]
pub(crate) fn record_recycled_ordinal(ordinal: u64) {
    tracing::debug!(ordinal, "label_ordinal_recycled");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn record_recycled_ordinal(_ordinal: u64) {}

#[cfg(feature = "tracing")]
pub(crate) fn record_ordinals_exhausted(max_ordinal: u64, live: usize) {
    tracing::warn!(max_ordinal, live, "label_ordinals_exhausted");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn record_ordinals_exhausted(_max_ordinal: u64, _live: usize) {}

#[cfg(feature = "tracing")]
pub(crate) fn record_config_rejected(error: &crate::error::LabelError) {
    tracing::warn!(%error, "label_cache_config_rejected_using_defaults");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn record_config_rejected(_error: &crate::error::LabelError) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_format_parse() {
        assert_eq!(TracingFormat::parse("json"), TracingFormat::Json);
        assert_eq!(TracingFormat::parse("COMPACT"), TracingFormat::Compact);
        assert_eq!(TracingFormat::parse("unknown"), TracingFormat::Pretty);
    }

    #[test]
    fn test_record_helpers() {
        // No subscriber installed: these must be silent no-ops.
        record_cache_created(16, 1024);
        record_sweep(3, 1);
        record_recycled_ordinal(7);
        record_ordinals_exhausted(4, 4);
        record_config_rejected(&crate::error::LabelError::invalid_config(
            "max_ordinal must be positive",
        ));
    }

    #[cfg(not(feature = "tracing"))]
    #[test]
    fn test_init_stub() {
        assert!(init_tracing(TracingConfig::default()).is_ok());
    }
}
