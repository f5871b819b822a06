//! Concurrent label interning with reference-counted reclamation
//!
//! [`LabelCache`] maps string content to a shared [`Label`]. It holds only
//! weak references, so an entry survives exactly as long as some caller keeps
//! a `Label` handle to it. It uses:
//!
//! - `DashMap` for the string → entry and ordinal → entry maps
//! - `crossbeam::queue::SegQueue` as the reclamation queue fed by dropped labels
//! - atomics for ordinal assignment, the live count and statistics
//!
//! # Reclamation
//!
//! When the last handle to a string label is dropped, its drop hook
//! decrements the live count and posts a notification to the reclamation
//! queue. The hook never takes a map lock. Each insertion attempt drains the
//! queue before resolving its key, evicting entries whose weak reference is
//! dead. [`LabelCache::sweep`] does the same on demand and additionally scans
//! both maps.
//!
//! # Ordinals
//!
//! String labels get an ordinal from a shared counter taken modulo
//! `max_ordinal`. A candidate ordinal is claimed only if its slot is vacant or
//! its previous holder is dead, so two live labels never share an ordinal.
//! When every ordinal is held by a live label the insertion fails with
//! [`LabelError::OrdinalsExhausted`].
//!
//! # Example
//!
//! ```
//! use tenaddr_label::LabelCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = LabelCache::new(64, 1 << 20);
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let cache = cache.clone();
//!         thread::spawn(move || cache.get_or_create_label("shared").unwrap())
//!     })
//!     .collect();
//! let labels: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
//! assert!(labels.windows(2).all(|w| w[0].ptr_eq(&w[1])));
//! assert_eq!(cache.size(), 1);
//! ```

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use crossbeam::queue::SegQueue;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::config::CacheConfig;
use crate::error::{LabelError, LabelResult};
use crate::label::{Interned, Label};
use crate::tracing_support;

/// How many failed ordinal probes pass between full-occupancy checks
const OCCUPANCY_CHECK_INTERVAL: u64 = 1024;

lazy_static! {
    /// Cache used by [`Label::of_string`] and other convenience constructors
    static ref ACTIVE: RwLock<LabelCache> =
        RwLock::new(LabelCache::with_config_or_default(CacheConfig::from_env()));
}

/// Ordinal slot state
enum OrdinalSlot {
    /// Claimed by an insertion that has not bound its label yet
    Reserved,
    /// Held by an interned label
    Bound(Weak<Interned>),
}

impl OrdinalSlot {
    fn is_dead(&self) -> bool {
        match self {
            OrdinalSlot::Reserved => false,
            OrdinalSlot::Bound(weak) => weak.strong_count() == 0,
        }
    }
}

/// Notification posted by a dropped string label
struct Released {
    key: Arc<str>,
    ordinal: u64,
}

/// Point-in-time cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered by a live entry
    pub hits: u64,
    /// Lookups that created a new entry
    pub misses: u64,
    /// Dead entries removed from the string map
    pub evictions: u64,
    /// Ordinals reissued after their previous holder died
    pub recycled_ordinals: u64,
    /// Numeric labels at or above the threshold, served by the insertion path
    pub numeric_slow_path: u64,
    /// Live string labels at the time of the snapshot
    pub live: usize,
}

impl CacheStats {
    /// Fraction of lookups answered by a live entry
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    recycled_ordinals: AtomicU64,
    numeric_slow_path: AtomicU64,
}

/// State shared between a cache handle and the labels it issued
pub(crate) struct CacheShared {
    config: CacheConfig,
    labels: DashMap<Arc<str>, Weak<Interned>>,
    ordinals: DashMap<u64, OrdinalSlot>,
    released: SegQueue<Released>,
    next_ordinal: AtomicU64,
    live: AtomicUsize,
    counters: CacheCounters,
}

impl CacheShared {
    /// Drop hook of an interned entry; must not take any map lock
    pub(crate) fn release(&self, key: Arc<str>, ordinal: u64) {
        self.live.fetch_sub(1, Ordering::AcqRel);
        self.released.push(Released { key, ordinal });
    }
}

/// Concurrent interning table for string labels
///
/// Cloning a `LabelCache` is cheap and yields another handle to the same
/// table.
#[derive(Clone)]
pub struct LabelCache {
    shared: Arc<CacheShared>,
}

impl Default for LabelCache {
    fn default() -> Self {
        Self::from_valid_config(CacheConfig::default())
    }
}

impl std::fmt::Debug for LabelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelCache")
            .field("config", &self.shared.config)
            .field("size", &self.size())
            .finish()
    }
}

impl LabelCache {
    /// Create a cache with the given initial capacity and ordinal bound
    ///
    /// A `max_ordinal` of zero is raised to one.
    pub fn new(initial_capacity: usize, max_ordinal: u64) -> Self {
        Self::from_valid_config(CacheConfig::new(initial_capacity, max_ordinal.max(1)))
    }

    /// Create a cache from a configuration
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::InvalidConfig`] if the configuration does not validate.
    pub fn with_config(config: CacheConfig) -> LabelResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Cache for `config`, or the default configuration if it is rejected
    fn with_config_or_default(config: CacheConfig) -> Self {
        match Self::with_config(config) {
            Ok(cache) => cache,
            Err(err) => {
                tracing_support::record_config_rejected(&err);
                Self::default()
            }
        }
    }

    fn from_valid_config(config: CacheConfig) -> Self {
        tracing_support::record_cache_created(config.initial_capacity, config.max_ordinal);
        Self {
            shared: Arc::new(CacheShared {
                config,
                labels: DashMap::with_capacity(config.initial_capacity),
                ordinals: DashMap::with_capacity(config.initial_capacity),
                released: SegQueue::new(),
                next_ordinal: AtomicU64::new(0),
                live: AtomicUsize::new(0),
                counters: CacheCounters::default(),
            }),
        }
    }

    /// Handle to the process-wide active cache
    ///
    /// Initialized from [`CacheConfig::from_env`] on first use.
    pub fn active() -> LabelCache {
        ACTIVE.read().clone()
    }

    /// Replace the active cache, returning the previous one
    ///
    /// Labels already issued by the previous cache stay valid and keep
    /// comparing equal by content to labels from the new one.
    pub fn install_active(cache: LabelCache) -> LabelCache {
        std::mem::replace(&mut *ACTIVE.write(), cache)
    }

    /// Configuration this cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.shared.config
    }

    /// Whether two handles refer to the same table
    pub fn same_cache(&self, other: &LabelCache) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Return the live label for `value`, creating and registering it if absent
    ///
    /// Linearizable per key: concurrent callers interning the same string all
    /// receive handles to one entry.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::OrdinalsExhausted`] if a new entry is needed and
    /// every ordinal is held by a live label.
    pub fn get_or_create_label(&self, value: &str) -> LabelResult<Label> {
        if let Some(label) = self.get(value) {
            self.shared.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(label);
        }

        self.drain_released();

        match self.shared.labels.entry(Arc::from(value)) {
            Entry::Occupied(mut entry) => {
                if let Some(existing) = entry.get().upgrade() {
                    // Lost the race to another inserter.
                    self.shared.counters.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(Label::from_interned(existing));
                }
                let interned = self.register(Arc::clone(entry.key()))?;
                entry.insert(Arc::downgrade(&interned));
                self.shared.counters.evictions.fetch_add(1, Ordering::Relaxed);
                Ok(Label::from_interned(interned))
            }
            Entry::Vacant(entry) => {
                let interned = self.register(Arc::clone(entry.key()))?;
                entry.insert(Arc::downgrade(&interned));
                Ok(Label::from_interned(interned))
            }
        }
    }

    /// Create a numeric label through this cache's numeric policy
    ///
    /// Values below [`CacheConfig::numeric_threshold`] become plain numeric
    /// labels without touching the cache. Values at or above it take the
    /// insertion path: pending reclamation notifications are drained and the
    /// request is counted in [`CacheStats::numeric_slow_path`]. Numeric labels
    /// are never interned either way, so [`size`](Self::size) is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::NegativeNumeric`] if `value < 0`.
    pub fn get_or_create_numeric(&self, value: i64) -> LabelResult<Label> {
        if value < 0 {
            return Err(LabelError::NegativeNumeric { value });
        }
        if value >= self.shared.config.numeric_threshold {
            self.drain_released();
            self.shared
                .counters
                .numeric_slow_path
                .fetch_add(1, Ordering::Relaxed);
        }
        Ok(Label::index(value as u64))
    }

    /// Live label for `value`, without interning it
    pub fn get(&self, value: &str) -> Option<Label> {
        self.shared
            .labels
            .get(value)
            .and_then(|entry| entry.value().upgrade())
            .map(Label::from_interned)
    }

    /// Live label currently holding `ordinal`
    pub fn label_for_ordinal(&self, ordinal: u64) -> Option<Label> {
        self.shared
            .ordinals
            .get(&ordinal)
            .and_then(|slot| match slot.value() {
                OrdinalSlot::Bound(weak) => weak.upgrade(),
                OrdinalSlot::Reserved => None,
            })
            .map(Label::from_interned)
    }

    /// Number of live string labels issued by this cache
    ///
    /// Approximate under concurrent mutation, but never counts an entry whose
    /// last handle has been dropped.
    pub fn size(&self) -> usize {
        self.shared.live.load(Ordering::Acquire)
    }

    /// Whether no string label issued by this cache is alive
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Evict every dead entry, returning how many string entries were removed
    pub fn sweep(&self) -> usize {
        let mut evicted = self.drain_released();

        let before = self.shared.labels.len();
        self.shared.labels.retain(|_, weak| weak.strong_count() > 0);
        let scanned = before.saturating_sub(self.shared.labels.len());
        self.shared
            .counters
            .evictions
            .fetch_add(scanned as u64, Ordering::Relaxed);
        evicted += scanned;

        self.shared.ordinals.retain(|_, slot| !slot.is_dead());

        tracing_support::record_sweep(evicted, self.size());
        evicted
    }

    /// Snapshot of the cache statistics
    pub fn stats(&self) -> CacheStats {
        let counters = &self.shared.counters;
        CacheStats {
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            evictions: counters.evictions.load(Ordering::Relaxed),
            recycled_ordinals: counters.recycled_ordinals.load(Ordering::Relaxed),
            numeric_slow_path: counters.numeric_slow_path.load(Ordering::Relaxed),
            live: self.size(),
        }
    }

    /// Process pending reclamation notifications
    fn drain_released(&self) -> usize {
        let shared = &self.shared;
        let mut evicted = 0;
        while let Some(released) = shared.released.pop() {
            if shared
                .labels
                .remove_if(&*released.key, |_, weak| weak.strong_count() == 0)
                .is_some()
            {
                evicted += 1;
            }
            shared
                .ordinals
                .remove_if(&released.ordinal, |_, slot| slot.is_dead());
        }
        if evicted > 0 {
            shared
                .counters
                .evictions
                .fetch_add(evicted as u64, Ordering::Relaxed);
        }
        evicted
    }

    /// Allocate an ordinal and build the interned entry for `key`
    fn register(&self, key: Arc<str>) -> LabelResult<Arc<Interned>> {
        let ordinal = self.claim_ordinal()?;
        let interned = Arc::new(Interned::new(key, ordinal, Arc::downgrade(&self.shared)));

        let previous = self
            .shared
            .ordinals
            .insert(ordinal, OrdinalSlot::Bound(Arc::downgrade(&interned)));
        debug_assert!(
            matches!(previous, Some(OrdinalSlot::Reserved)),
            "ordinal {} was not reserved before binding",
            interned.ordinal()
        );

        self.shared.live.fetch_add(1, Ordering::AcqRel);
        self.shared.counters.misses.fetch_add(1, Ordering::Relaxed);
        Ok(interned)
    }

    /// Reserve an ordinal whose slot is vacant or held by a dead label
    ///
    /// Probes from the shared counter first. When a full round of probes
    /// misses, every slot is scanned in order. Contending threads can take
    /// each free slot just before this one reaches it, so the round repeats
    /// until the live count fills the range and no slot is vacant or dead.
    /// Reservations are bound within the same insertion, so the loop ends once
    /// a slot frees up or the range is genuinely full.
    fn claim_ordinal(&self) -> LabelResult<u64> {
        let max_ordinal = self.shared.config.max_ordinal;
        loop {
            if let Some(ordinal) = self.probe_ordinals(max_ordinal) {
                return Ok(ordinal);
            }
            if let Some(ordinal) = (0..max_ordinal).find(|&ordinal| self.try_reserve(ordinal)) {
                return Ok(ordinal);
            }
            if self.size() as u64 >= max_ordinal && self.ordinals_full(max_ordinal) {
                break;
            }
            std::thread::yield_now();
        }

        tracing_support::record_ordinals_exhausted(max_ordinal, self.size());
        Err(LabelError::OrdinalsExhausted { max_ordinal })
    }

    /// Up to `max_ordinal` candidates from the shared counter
    fn probe_ordinals(&self, max_ordinal: u64) -> Option<u64> {
        let shared = &self.shared;
        for attempt in 1..=max_ordinal {
            let candidate = shared.next_ordinal.fetch_add(1, Ordering::Relaxed) % max_ordinal;
            if self.try_reserve(candidate) {
                return Some(candidate);
            }
            if attempt % OCCUPANCY_CHECK_INTERVAL == 0 && self.ordinals_full(max_ordinal) {
                return None;
            }
        }
        None
    }

    /// Whether every slot in `0..max_ordinal` is reserved or held by a live label
    fn ordinals_full(&self, max_ordinal: u64) -> bool {
        let ordinals = &self.shared.ordinals;
        ordinals.len() as u64 >= max_ordinal
            && !ordinals.iter().any(|slot| slot.value().is_dead())
    }

    /// Mark `ordinal` reserved if its slot is vacant or its holder is dead
    fn try_reserve(&self, ordinal: u64) -> bool {
        match self.shared.ordinals.entry(ordinal) {
            Entry::Vacant(slot) => {
                slot.insert(OrdinalSlot::Reserved);
                true
            }
            Entry::Occupied(mut slot) if slot.get().is_dead() => {
                slot.insert(OrdinalSlot::Reserved);
                self.shared
                    .counters
                    .recycled_ordinals
                    .fetch_add(1, Ordering::Relaxed);
                tracing_support::record_recycled_ordinal(ordinal);
                true
            }
            Entry::Occupied(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_string_same_entry() {
        let cache = LabelCache::new(8, 1024);
        let a = cache.get_or_create_label("x").unwrap();
        let b = cache.get_or_create_label("x").unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(cache.size(), 1);
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_distinct_strings_distinct_ordinals() {
        let cache = LabelCache::new(8, 1024);
        let a = cache.get_or_create_label("a").unwrap();
        let b = cache.get_or_create_label("b").unwrap();
        assert_ne!(a.to_numeric(), b.to_numeric());
        assert_eq!(cache.size(), 2);
    }

    #[test]
    fn test_drop_reclaims_entry() {
        let cache = LabelCache::new(8, 1024);
        let first = cache.get_or_create_label("x").unwrap();
        let first_ordinal = first.to_numeric();
        drop(first);
        assert_eq!(cache.size(), 0);
        assert!(cache.get("x").is_none());

        let second = cache.get_or_create_label("x").unwrap();
        assert_ne!(second.to_numeric(), first_ordinal);
        assert_eq!(cache.size(), 1);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_clone_keeps_entry_alive() {
        let cache = LabelCache::new(8, 1024);
        let label = cache.get_or_create_label("x").unwrap();
        let ordinal = label.to_numeric();
        let copy = label.clone();
        drop(label);
        assert_eq!(cache.size(), 1);
        let again = cache.get_or_create_label("x").unwrap();
        assert!(again.ptr_eq(&copy));
        assert_eq!(again.to_numeric(), ordinal);
    }

    #[test]
    fn test_numeric_policy() {
        let cache = LabelCache::with_config(CacheConfig::new(8, 1024).numeric_threshold(100))
            .unwrap();
        assert_eq!(cache.get_or_create_numeric(99).unwrap(), Label::index(99));
        assert_eq!(cache.stats().numeric_slow_path, 0);
        assert_eq!(
            cache.get_or_create_numeric(-10).unwrap_err(),
            LabelError::NegativeNumeric { value: -10 }
        );
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_numeric_at_or_above_threshold_accepted() {
        let cache = LabelCache::with_config(CacheConfig::new(8, 1024).numeric_threshold(100))
            .unwrap();
        assert_eq!(cache.get_or_create_numeric(100).unwrap(), Label::index(100));
        assert_eq!(cache.get_or_create_numeric(5000).unwrap(), Label::index(5000));
        assert_eq!(
            cache.get_or_create_numeric(i64::MAX).unwrap().to_numeric(),
            i64::MAX as u64
        );
        assert_eq!(cache.stats().numeric_slow_path, 3);
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_numeric_slow_path_drains_released() {
        let cache = LabelCache::with_config(CacheConfig::new(8, 1024).numeric_threshold(0))
            .unwrap();
        drop(cache.get_or_create_label("gone").unwrap());
        cache.get_or_create_numeric(7).unwrap();
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.sweep(), 0);
    }

    #[test]
    fn test_ordinals_exhausted() {
        let cache = LabelCache::new(4, 2);
        let _a = cache.get_or_create_label("a").unwrap();
        let _b = cache.get_or_create_label("b").unwrap();
        assert_eq!(
            cache.get_or_create_label("c").unwrap_err(),
            LabelError::OrdinalsExhausted { max_ordinal: 2 }
        );
        // Existing entries still resolve.
        assert!(cache.get_or_create_label("a").is_ok());
    }

    #[test]
    fn test_last_free_ordinal_is_found() {
        let cache = LabelCache::new(4, 3);
        let _a = cache.get_or_create_label("a").unwrap();
        let b = cache.get_or_create_label("b").unwrap();
        let _c = cache.get_or_create_label("c").unwrap();
        let freed = b.to_numeric();
        drop(b);

        // Repeated churn through the single free slot never fails.
        for round in 0..50 {
            let label = cache.get_or_create_label(&format!("d{}", round)).unwrap();
            assert_eq!(label.to_numeric(), freed);
        }
        assert_eq!(cache.size(), 2);
    }

    #[test]
    fn test_ordinal_recycled_after_release() {
        let cache = LabelCache::new(4, 2);
        let a = cache.get_or_create_label("a").unwrap();
        let b = cache.get_or_create_label("b").unwrap();
        let freed = a.to_numeric();
        drop(a);
        let c = cache.get_or_create_label("c").unwrap();
        assert_eq!(c.to_numeric(), freed);
        assert_ne!(c.to_numeric(), b.to_numeric());
        assert_eq!(cache.size(), 2);
    }

    #[test]
    fn test_reverse_lookup() {
        let cache = LabelCache::new(8, 1024);
        let label = cache.get_or_create_label("row").unwrap();
        let found = cache.label_for_ordinal(label.to_numeric()).unwrap();
        assert!(found.ptr_eq(&label));
        drop(found);
        drop(label);
        assert!(cache.label_for_ordinal(0).is_none());
    }

    #[test]
    fn test_sweep_removes_dead_entries() {
        let cache = LabelCache::new(8, 1024);
        let kept = cache.get_or_create_label("kept").unwrap();
        for i in 0..10 {
            drop(cache.get_or_create_label(&format!("tmp{}", i)).unwrap());
        }
        cache.sweep();
        assert_eq!(cache.shared.labels.len(), 1);
        assert_eq!(cache.shared.ordinals.len(), 1);
        assert_eq!(cache.size(), 1);
        assert!(cache.get("kept").unwrap().ptr_eq(&kept));
    }

    #[test]
    fn test_labels_outlive_cache() {
        let cache = LabelCache::new(8, 1024);
        let label = cache.get_or_create_label("orphan").unwrap();
        drop(cache);
        assert_eq!(label.as_str(), Some("orphan"));
        drop(label);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(LabelCache::with_config(CacheConfig::new(8, 0)).is_err());
        assert_eq!(LabelCache::new(8, 0).config().max_ordinal, 1);
    }

    #[test]
    fn test_rejected_config_falls_back_to_default() {
        let cache = LabelCache::with_config_or_default(CacheConfig::new(8, 0));
        assert_eq!(*cache.config(), CacheConfig::default());

        let valid = CacheConfig::new(8, 16);
        assert_eq!(*LabelCache::with_config_or_default(valid).config(), valid);
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..CacheStats::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < 1e-12);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
