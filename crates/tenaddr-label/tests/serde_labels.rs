//! Serialization tests for labels and cache configuration
#![cfg(feature = "serde")]

use tenaddr_label::{CacheConfig, Label};

#[test]
fn test_numeric_label_as_integer() {
    let json = serde_json::to_string(&Label::index(12)).unwrap();
    assert_eq!(json, "12");
    let back: Label = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Label::index(12));
}

#[test]
fn test_string_label_as_string() {
    let label = Label::of_string("depth").unwrap();
    let json = serde_json::to_string(&label).unwrap();
    assert_eq!(json, "\"depth\"");
    let back: Label = serde_json::from_str(&json).unwrap();
    assert!(back.ptr_eq(&label));
}

#[test]
fn test_negative_number_rejected() {
    assert!(serde_json::from_str::<Label>("-3").is_err());
}

#[test]
fn test_config_defaults_fill_missing_fields() {
    let config: CacheConfig = serde_json::from_str(r#"{"max_ordinal": 100}"#).unwrap();
    assert_eq!(config.max_ordinal, 100);
    assert_eq!(config.initial_capacity, CacheConfig::default().initial_capacity);
}
