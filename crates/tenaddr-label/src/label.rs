//! Tensor dimension labels
//!
//! A [`Label`] is one coordinate along one tensor dimension. It is either
//!
//! - a **numeric** label: a non-negative index stored by value, never cached, or
//! - a **string** label: a handle to an entry interned by a [`LabelCache`],
//!   carrying the ordinal the cache assigned when the entry was created.
//!
//! Equality and hashing are by value: numeric labels compare by index, string
//! labels by content. A numeric label never equals a string label, even when
//! the string spells the same number.
//!
//! String labels are reference counted. The cache only keeps weak references,
//! so an entry lives exactly as long as some `Label` handle to it does.
//!
//! # Examples
//!
//! ```
//! use tenaddr_label::{Label, LabelCache};
//!
//! let cache = LabelCache::new(16, 1 << 16);
//! let a = cache.get_or_create_label("batch").unwrap();
//! let b = cache.get_or_create_label("batch").unwrap();
//! assert!(a.ptr_eq(&b));
//! assert_eq!(a.to_numeric(), b.to_numeric());
//!
//! let seven = Label::numeric(7).unwrap();
//! assert_eq!(seven.to_numeric(), 7);
//! assert_ne!(seven, cache.get_or_create_label("7").unwrap());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::cache::{CacheShared, LabelCache};
use crate::error::{LabelError, LabelResult};

/// Borrowed view of a label's value
///
/// This is the single source of truth for label equality, hashing and
/// ordering. Containers that store coordinates in a different layout (for
/// example plain `u64` indices) compare and hash through it so that every
/// representation of the same coordinate behaves identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelValue<'a> {
    /// A numeric index
    Numeric(u64),
    /// String content
    Str(&'a str),
}

impl fmt::Display for LabelValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Numeric(value) => write!(f, "{value}"),
            LabelValue::Str(value) => f.write_str(value),
        }
    }
}

/// Interned string entry shared by all string labels with the same content
pub(crate) struct Interned {
    value: Arc<str>,
    ordinal: u64,
    owner: Weak<CacheShared>,
}

impl Interned {
    pub(crate) fn new(value: Arc<str>, ordinal: u64, owner: Weak<CacheShared>) -> Self {
        Self {
            value,
            ordinal,
            owner,
        }
    }

    pub(crate) fn ordinal(&self) -> u64 {
        self.ordinal
    }
}

impl Drop for Interned {
    fn drop(&mut self) {
        // Last strong handle is gone: post to the owner's reclamation queue.
        if let Some(owner) = self.owner.upgrade() {
            owner.release(Arc::clone(&self.value), self.ordinal);
        }
    }
}

#[derive(Clone)]
enum Repr {
    Numeric(u64),
    Interned(Arc<Interned>),
}

/// One coordinate along one tensor dimension
#[derive(Clone)]
pub struct Label {
    repr: Repr,
}

impl Label {
    /// Create a numeric label
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::NegativeNumeric`] if `value < 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenaddr_label::Label;
    ///
    /// assert_eq!(Label::numeric(10).unwrap().to_numeric(), 10);
    /// assert!(Label::numeric(-1).is_err());
    /// ```
    pub fn numeric(value: i64) -> LabelResult<Self> {
        if value < 0 {
            return Err(LabelError::NegativeNumeric { value });
        }
        Ok(Self::index(value as u64))
    }

    /// Create a numeric label from an index that is non-negative by type
    #[inline]
    pub const fn index(value: u64) -> Self {
        Self {
            repr: Repr::Numeric(value),
        }
    }

    /// Intern `value` in the active cache and return its shared label
    ///
    /// See [`LabelCache::active`] for which cache that is.
    pub fn of_string(value: &str) -> LabelResult<Self> {
        LabelCache::active().get_or_create_label(value)
    }

    pub(crate) fn from_interned(interned: Arc<Interned>) -> Self {
        Self {
            repr: Repr::Interned(interned),
        }
    }

    /// Numeric handle of this label
    ///
    /// The index for numeric labels. For string labels, the ordinal assigned
    /// by the cache, which is stable for as long as this shared entry lives.
    #[inline]
    pub fn to_numeric(&self) -> u64 {
        match &self.repr {
            Repr::Numeric(value) => *value,
            Repr::Interned(interned) => interned.ordinal,
        }
    }

    /// Borrowed value used for equality, hashing and ordering
    #[inline]
    pub fn value(&self) -> LabelValue<'_> {
        match &self.repr {
            Repr::Numeric(value) => LabelValue::Numeric(*value),
            Repr::Interned(interned) => LabelValue::Str(&interned.value),
        }
    }

    /// String content, or `None` for numeric labels
    pub fn as_str(&self) -> Option<&str> {
        match &self.repr {
            Repr::Numeric(_) => None,
            Repr::Interned(interned) => Some(&interned.value),
        }
    }

    /// Whether this is a numeric label
    pub fn is_numeric(&self) -> bool {
        matches!(self.repr, Repr::Numeric(_))
    }

    /// Whether this is an interned string label
    pub fn is_string(&self) -> bool {
        matches!(self.repr, Repr::Interned(_))
    }

    /// Whether both labels are handles to the same interned entry
    ///
    /// Always `false` for numeric labels, which have no shared identity.
    pub fn ptr_eq(&self, other: &Label) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Interned(a), Repr::Interned(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of live handles to this label's interned entry
    ///
    /// `None` for numeric labels.
    pub fn handle_count(&self) -> Option<usize> {
        match &self.repr {
            Repr::Numeric(_) => None,
            Repr::Interned(interned) => Some(Arc::strong_count(interned)),
        }
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Numeric(a), Repr::Numeric(b)) => a == b,
            (Repr::Interned(a), Repr::Interned(b)) => Arc::ptr_eq(a, b) || a.value == b.value,
            _ => false,
        }
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value().hash(state);
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    /// Numeric labels sort before string labels; strings sort by content
    fn cmp(&self, other: &Self) -> Ordering {
        if self.ptr_eq(other) {
            return Ordering::Equal;
        }
        self.value().cmp(&other.value())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Numeric(value) => write!(f, "Numeric({value})"),
            Repr::Interned(interned) => {
                write!(f, "String({:?}#{})", &*interned.value, interned.ordinal)
            }
        }
    }
}

impl From<u32> for Label {
    fn from(value: u32) -> Self {
        Label::index(u64::from(value))
    }
}

impl From<u64> for Label {
    fn from(value: u64) -> Self {
        Label::index(value)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{Label, LabelValue};
    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    impl Serialize for Label {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.value() {
                LabelValue::Numeric(value) => serializer.serialize_u64(value),
                LabelValue::Str(value) => serializer.serialize_str(value),
            }
        }
    }

    struct LabelVisitor;

    impl<'de> Visitor<'de> for LabelVisitor {
        type Value = Label;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a string label")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Label, E> {
            Ok(Label::index(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Label, E> {
            Label::numeric(value).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Label, E> {
            Label::of_string(value).map_err(E::custom)
        }
    }

    impl<'de> Deserialize<'de> for Label {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Label, D::Error> {
            deserializer.deserialize_any(LabelVisitor)
        }
    }
}
