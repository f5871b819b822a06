//! Property-based tests for tensor addresses
//!
//! These tests use proptest to check that equality, hashing and ordering of
//! addresses depend only on coordinate values, never on how the address was
//! constructed.

use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tenaddr_core::TensorAddress;
use tenaddr_label::{Label, LabelCache};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// Strategy for coordinate tuples crossing the inline arity boundary
fn indices_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..1_000, 0..=8)
}

fn strings_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c]{1,2}", 0..=6)
}

proptest! {
    /// Property: indexed and label-built addresses agree on eq, hash and order
    #[test]
    fn prop_indexed_matches_labels(indices in indices_strategy()) {
        let indexed = TensorAddress::of_indices(&indices);
        let labeled = TensorAddress::of_labels(indices.iter().map(|&i| Label::index(i)));
        prop_assert_eq!(&indexed, &labeled);
        prop_assert_eq!(hash_of(&indexed), hash_of(&labeled));
        prop_assert_eq!(indexed.cmp(&labeled), std::cmp::Ordering::Equal);
        prop_assert_eq!(indexed.size(), indices.len());
    }

    /// Property: string addresses from two caches are equal with equal hashes
    #[test]
    fn prop_string_addresses_equal_across_caches(strings in strings_strategy()) {
        let left = TensorAddress::of_strings_in(&LabelCache::new(8, 1 << 20), &strings).unwrap();
        let right = TensorAddress::of_strings_in(&LabelCache::new(8, 1 << 20), &strings).unwrap();
        prop_assert_eq!(&left, &right);
        prop_assert_eq!(hash_of(&left), hash_of(&right));
    }

    /// Property: numeric and string spellings of the same tuple differ unless empty
    #[test]
    fn prop_numeric_never_equals_string(indices in indices_strategy()) {
        let cache = LabelCache::new(8, 1 << 20);
        let spelled: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
        let numeric = TensorAddress::of_indices(&indices);
        let text = TensorAddress::of_strings_in(&cache, &spelled).unwrap();
        prop_assert_eq!(numeric == text, indices.is_empty());
        prop_assert_eq!(numeric.to_string(), text.to_string());
    }

    /// Property: object_label succeeds exactly for in-range dimensions
    #[test]
    fn prop_object_label_bounds(indices in indices_strategy(), dimension in 0usize..12) {
        let address = TensorAddress::of_indices(&indices);
        prop_assert_eq!(address.object_label(dimension).is_ok(), dimension < indices.len());
        if dimension < indices.len() {
            prop_assert_eq!(address.numeric_label(dimension).unwrap(), indices[dimension]);
        }
    }

    /// Property: partial copy with the identity permutation is the same address
    #[test]
    fn prop_partial_copy_identity(strings in strings_strategy()) {
        let cache = LabelCache::new(8, 1 << 20);
        let address = TensorAddress::of_strings_in(&cache, &strings).unwrap();
        let all: Vec<usize> = (0..address.size()).collect();
        prop_assert_eq!(address.partial_copy(&all).unwrap(), address);
    }
}
