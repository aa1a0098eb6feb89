//! Ordered metadata records attached to test classes and examples.
//!
//! A [`Metadata`] record keeps insertion order so that reports and dumps list
//! keys the way they were declared. Required keys are computed by the
//! runtime; the [`keys`] module names them and lists which ones user-supplied
//! metadata may not overwrite.

use std::fmt;

/// Well-known metadata keys.
pub mod keys {
    /// Example or class description.
    pub const DESCRIPTION: &str = "description";
    /// `"{class description}#{example description}"`.
    pub const FULL_DESCRIPTION: &str = "full_description";
    /// File in which the class or method was first declared.
    pub const FILE_PATH: &str = "file_path";
    /// Line on which the class or method declaration begins.
    pub const LINE_NUMBER: &str = "line_number";
    /// `"{file_path}:{line_number}"`.
    pub const LOCATION: &str = "location";
    /// Snapshot of the owning class's record.
    pub const EXAMPLE_GROUP: &str = "example_group";
    /// Legacy alias of [`EXAMPLE_GROUP`].
    pub const BEHAVIOUR: &str = "behaviour";
    /// Marks records produced by the xUnit adapter.
    pub const TEST_UNIT: &str = "test_unit";
    /// Block of a natively declared group; always nil for test classes.
    pub const BLOCK: &str = "block";
    /// Described object of a natively declared group; always nil here.
    pub const DESCRIBES: &str = "describes";

    /// Keys computed for every class record.
    pub const CLASS_RESERVED: &[&str] = &[
        DESCRIPTION,
        FILE_PATH,
        LINE_NUMBER,
        LOCATION,
        TEST_UNIT,
        BLOCK,
        DESCRIBES,
    ];

    /// Keys computed for every example record.
    pub const EXAMPLE_RESERVED: &[&str] = &[
        DESCRIPTION,
        FULL_DESCRIPTION,
        FILE_PATH,
        LINE_NUMBER,
        LOCATION,
        EXAMPLE_GROUP,
        BEHAVIOUR,
        TEST_UNIT,
    ];
}

/// A metadata value.
#[derive(Clone, Debug, PartialEq)]
pub enum MetaValue {
    /// Absent value.
    Nil,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Free text.
    Str(String),
    /// Interned-style identifier such as a tag name.
    Symbol(String),
    /// Ordered list of values.
    List(Vec<MetaValue>),
    /// Nested record.
    Map(Metadata),
}

impl MetaValue {
    /// Construct a symbol value.
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Borrow the text of a string or symbol value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) | Self::Symbol(text) => Some(text),
            _ => None,
        }
    }

    /// Return the boolean payload.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Return the integer payload.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Borrow the nested record.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Metadata> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Whether the value is [`MetaValue::Nil`].
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(text) => f.write_str(text),
            Self::Symbol(name) => write!(f, ":{name}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => write!(f, "{map}"),
        }
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for MetaValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for MetaValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Metadata> for MetaValue {
    fn from(value: Metadata) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for MetaValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for MetaValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

/// An insertion-ordered map from string keys to [`MetaValue`]s.
///
/// # Examples
///
/// ```
/// use xunit_bdd::{MetaValue, Metadata};
///
/// let mut metadata = Metadata::new();
/// metadata.insert("slow", true);
/// metadata.insert("owner", "billing");
/// assert_eq!(metadata.get("slow"), Some(&MetaValue::Bool(true)));
/// assert_eq!(metadata.keys().collect::<Vec<_>>(), ["slow", "owner"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    /// Create an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries
            .iter()
            .find_map(|(candidate, value)| (candidate == key).then_some(value))
    }

    /// Whether the key is present, even when mapped to [`MetaValue::Nil`].
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(candidate, _)| candidate == key)
    }

    /// Insert or replace a value, keeping the original position of an
    /// existing key. Returns the replaced value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetaValue>,
    ) -> Option<MetaValue> {
        let key = key.into();
        let value = value.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(candidate, _)| *candidate == key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        let position = self.entries.iter().position(|(candidate, _)| candidate == key)?;
        Some(self.entries.remove(position).1)
    }

    /// Insert or replace every entry of `other`.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in other.iter() {
            self.insert(key, value.clone());
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<MetaValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

impl IntoIterator for Metadata {
    type Item = (String, MetaValue);
    type IntoIter = std::vec::IntoIter<(String, MetaValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(feature = "diagnostics")]
impl serde::Serialize for MetaValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_none(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Str(text) | Self::Symbol(text) => serializer.serialize_str(text),
            Self::List(items) => serializer.collect_seq(items),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

#[cfg(feature = "diagnostics")]
impl serde::Serialize for Metadata {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Metadata staged for the next qualifying declaration only.
#[derive(Debug, Default)]
pub(crate) struct PendingInfo {
    slot: Option<Metadata>,
}

impl PendingInfo {
    /// Stage a batch, discarding any batch that was never consumed.
    pub(crate) fn stage(&mut self, info: Metadata, owner: &str) {
        if let Some(discarded) = self.slot.replace(info) {
            log::warn!("discarding unconsumed test_info {discarded} on {owner}");
        }
    }

    /// Consume the staged batch, leaving the slot empty.
    pub(crate) fn take(&mut self) -> Metadata {
        self.slot.take().unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) const fn is_staged(&self) -> bool {
        self.slot.is_some()
    }
}

/// Build a [`Metadata`] record from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use xunit_bdd::{MetaValue, metadata};
///
/// let info = metadata! { "slow" => true, "owner" => "billing" };
/// assert_eq!(info.get("owner"), Some(&MetaValue::Str("billing".into())));
/// ```
#[macro_export]
macro_rules! metadata {
    () => {
        $crate::Metadata::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut metadata = $crate::Metadata::new();
        $(metadata.insert($key, $value);)+
        metadata
    }};
}
