//! Property-based tests for label interning
//!
//! These tests use proptest to check the value semantics of labels and the
//! identity guarantees of the cache over random inputs.

use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tenaddr_label::{Label, LabelCache, LabelError};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    /// Property: interning while a handle is alive returns the same entry
    #[test]
    fn prop_interning_identity(s in ".{0,24}") {
        let cache = LabelCache::new(8, 1 << 20);
        let first = cache.get_or_create_label(&s).unwrap();
        let second = cache.get_or_create_label(&s).unwrap();
        prop_assert!(first.ptr_eq(&second));
        prop_assert_eq!(first.as_str(), Some(s.as_str()));
        prop_assert_eq!(cache.size(), 1);
    }

    /// Property: equal content means equal labels and equal hashes across caches
    #[test]
    fn prop_content_equality_across_caches(s in "[a-z0-9]{1,12}") {
        let a = LabelCache::new(4, 1024).get_or_create_label(&s).unwrap();
        let b = LabelCache::new(4, 1024).get_or_create_label(&s).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    /// Property: a numeric label never equals the string spelling of its value
    #[test]
    fn prop_numeric_differs_from_string(value in 0i64..1_000_000) {
        let cache = LabelCache::new(4, 1024);
        let number = Label::numeric(value).unwrap();
        let text = cache.get_or_create_label(&value.to_string()).unwrap();
        prop_assert_ne!(&number, &text);
        prop_assert_eq!(number.to_string(), text.to_string());
    }

    /// Property: negative numeric labels are always rejected
    #[test]
    fn prop_negative_rejected(value in i64::MIN..0) {
        prop_assert_eq!(Label::numeric(value).unwrap_err(), LabelError::NegativeNumeric { value });
        let cache = LabelCache::new(4, 1024);
        prop_assert!(cache.get_or_create_numeric(value).unwrap_err().is_invalid_argument());
    }

    /// Property: live size equals the number of distinct strings still held
    #[test]
    fn prop_size_tracks_held_labels(
        strings in prop::collection::vec("[a-e]{1,2}", 1..40),
        keep_every in 1usize..4,
    ) {
        let cache = LabelCache::new(8, 1 << 20);
        let mut held = Vec::new();
        for (i, s) in strings.iter().enumerate() {
            let label = cache.get_or_create_label(s).unwrap();
            if i % keep_every == 0 {
                held.push(label);
            }
        }
        let distinct: std::collections::HashSet<&str> =
            held.iter().map(|l| l.as_str().unwrap()).collect();
        prop_assert_eq!(cache.size(), distinct.len());
    }
}
