//! Conditional property dictionary.
//!
//! A [`Properties`] value is an ordered list of `(key, value)` entries that
//! encodes to the body of one JSON object: `"k":v` pairs separated by commas,
//! with no wrapping braces. Keyed entries follow last-write-wins semantics and
//! keep the position of their first insertion. Unkeyed entries (spliced groups
//! and raw fragments) always append, so several of them coexist.
//!
//! Absent values (null, non-finite floats, empty nested objects and arrays
//! with no usable element) are skipped entirely: neither key nor value is
//! written.
//!
//! # Example
//!
//! ```rust
//! use chart_assembly::property::{Properties, PropertyValue};
//!
//! let mut props = Properties::new();
//! props
//!     .set("show", true)
//!     .set("x", PropertyValue::Null)
//!     .set_if("y", 5, |v| *v > 10);
//! assert_eq!(props.encode().unwrap(), r#""show":true"#);
//! ```

mod groups;

pub use groups::{Padding, Position, Size};

use std::fmt::Write as _;

use crate::error::{Error, Result};

/// A value stored in a [`Properties`] dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Absent value; the entry is omitted.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number; non-finite values are treated as absent.
    Float(f64),
    /// String, escaped on output.
    Str(String),
    /// Array; absent elements are dropped and an array with no usable
    /// element is absent.
    Array(Vec<PropertyValue>),
    /// Nested object under a key, or a spliced group when unkeyed.
    Object(Properties),
    /// Caller-supplied raw JSON. Keyed: one JSON value. Unkeyed: a `"k":v`
    /// fragment. Verified by a strict parse before it is written.
    Json(String),
    /// JSON produced by this crate's own encoders. Written verbatim; the
    /// assembled document is parsed once at the end of the pass.
    Encoded(String),
}

impl PropertyValue {
    /// True if the value would not be written.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        match self {
            PropertyValue::Null => true,
            PropertyValue::Float(v) => !v.is_finite(),
            PropertyValue::Array(items) => items.iter().all(PropertyValue::is_absent),
            PropertyValue::Object(props) => props.is_empty(),
            PropertyValue::Json(raw) | PropertyValue::Encoded(raw) => raw.trim().is_empty(),
            PropertyValue::Bool(_) | PropertyValue::Int(_) | PropertyValue::Str(_) => false,
        }
    }

    /// Write this value as JSON.
    pub fn write_json(&self, out: &mut String) -> Result<()> {
        match self {
            PropertyValue::Null => out.push_str("null"),
            PropertyValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            PropertyValue::Int(i) => {
                let _ = write!(out, "{i}");
            }
            PropertyValue::Float(v) => write_number(out, *v),
            PropertyValue::Str(s) => write_string(out, s)?,
            PropertyValue::Array(items) => {
                out.push('[');
                let mut first = true;
                for item in items.iter().filter(|item| !item.is_absent()) {
                    if !first {
                        out.push(',');
                    }
                    first = false;
                    item.write_json(out)?;
                }
                out.push(']');
            }
            PropertyValue::Object(props) => {
                out.push('{');
                props.encode_into(out)?;
                strip_trailing_comma(out);
                out.push('}');
            }
            PropertyValue::Json(raw) => {
                serde_json::from_str::<serde_json::Value>(raw).map_err(|e| {
                    Error::encoding(format!("raw value `{raw}` is not valid JSON: {e}"))
                })?;
                out.push_str(raw.trim());
            }
            PropertyValue::Encoded(raw) => out.push_str(raw),
        }
        Ok(())
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<u32> for PropertyValue {
    fn from(v: u32) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<usize> for PropertyValue {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or(PropertyValue::Float(v as f64), PropertyValue::Int)
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        PropertyValue::Float(f64::from(v))
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Str(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Str(v)
    }
}

impl From<&String> for PropertyValue {
    fn from(v: &String) -> Self {
        PropertyValue::Str(v.clone())
    }
}

impl From<Properties> for PropertyValue {
    fn from(v: Properties) -> Self {
        PropertyValue::Object(v)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(PropertyValue::Null, Into::into)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(v: Vec<T>) -> Self {
        PropertyValue::Array(v.into_iter().map(Into::into).collect())
    }
}

/// A group of properties that is spliced into its parent without a wrapping
/// key (position, padding and similar mix-ins).
pub trait PropertyGroup {
    /// Write the group's entries.
    fn write_properties(&self, props: &mut Properties);

    /// Collect the group's entries into a fresh dictionary.
    fn to_properties(&self) -> Properties {
        let mut props = Properties::new();
        self.write_properties(&mut props);
        props
    }
}

impl PropertyGroup for Properties {
    fn write_properties(&self, props: &mut Properties) {
        props.merge(self);
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: Option<String>,
    value: PropertyValue,
}

/// Ordered, conditional key/value dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<Entry>,
}

impl Properties {
    /// Create an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`, replacing an earlier value of that name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> &mut Self {
        self.put(name.into(), value.into());
        self
    }

    /// Store `value` under `name` only if `predicate` accepts it.
    ///
    /// A rejected value still overwrites: the entry becomes absent.
    pub fn set_if<V, F>(&mut self, name: impl Into<String>, value: V, predicate: F) -> &mut Self
    where
        V: Into<PropertyValue>,
        F: FnOnce(&V) -> bool,
    {
        let value = if predicate(&value) {
            value.into()
        } else {
            PropertyValue::Null
        };
        self.put(name.into(), value);
        self
    }

    /// Nest a group under `name` (`"name":{...}`); omitted when the group is empty.
    pub fn set_object(&mut self, name: impl Into<String>, group: &impl PropertyGroup) -> &mut Self {
        self.put(name.into(), PropertyValue::Object(group.to_properties()));
        self
    }

    /// Store a raw JSON value under `name`. It is verified when encoded.
    pub fn set_json(&mut self, name: impl Into<String>, raw: impl Into<String>) -> &mut Self {
        self.put(name.into(), PropertyValue::Json(raw.into()));
        self
    }

    /// Splice a group in-line at this level.
    pub fn splice(&mut self, group: &impl PropertyGroup) -> &mut Self {
        self.push(PropertyValue::Object(group.to_properties()));
        self
    }

    /// Splice a raw `"k":v` fragment. It is verified when encoded.
    pub fn set_raw(&mut self, fragment: impl Into<String>) -> &mut Self {
        self.push(PropertyValue::Json(fragment.into()));
        self
    }

    pub(crate) fn set_encoded(&mut self, name: impl Into<String>, json: String) -> &mut Self {
        self.put(name.into(), PropertyValue::Encoded(json));
        self
    }

    /// Apply `other` on top of this dictionary: keyed entries replace, unkeyed
    /// entries append.
    pub fn merge(&mut self, other: &Properties) -> &mut Self {
        for entry in &other.entries {
            match &entry.key {
                Some(key) => self.put(key.clone(), entry.value.clone()),
                None => self.push(entry.value.clone()),
            }
        }
        self
    }

    /// Current value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|e| e.key.as_deref() == Some(name))
            .map(|e| &e.value)
    }

    /// Number of stored entries, absent ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when every entry is absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.value.is_absent())
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Encode the object body without braces or trailing comma.
    pub fn encode(&self) -> Result<String> {
        let mut out = String::new();
        self.encode_into(&mut out)?;
        strip_trailing_comma(&mut out);
        Ok(out)
    }

    /// Append `"k":v,` for every present entry. The caller strips the final
    /// comma before closing its object.
    pub fn encode_into(&self, out: &mut String) -> Result<()> {
        for entry in self.entries.iter().filter(|e| !e.value.is_absent()) {
            match (&entry.key, &entry.value) {
                (Some(key), value) => {
                    write_string(out, key)?;
                    out.push(':');
                    value.write_json(out)?;
                    out.push(',');
                }
                (None, PropertyValue::Object(group)) => group.encode_into(out)?,
                (None, PropertyValue::Json(fragment)) => {
                    verify_fragment(fragment)?;
                    out.push_str(fragment.trim());
                    out.push(',');
                }
                (None, PropertyValue::Encoded(fragment)) => {
                    out.push_str(fragment);
                    out.push(',');
                }
                (None, other) => {
                    return Err(Error::encoding(format!(
                        "value {other:?} needs a key to be encoded"
                    )))
                }
            }
        }
        Ok(())
    }

    fn put(&mut self, key: String, value: PropertyValue) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key.as_ref() == Some(&key)) {
            entry.value = value;
        } else {
            self.entries.push(Entry {
                key: Some(key),
                value,
            });
        }
    }

    fn push(&mut self, value: PropertyValue) {
        self.entries.push(Entry { key: None, value });
    }
}

/// Write `s` as an escaped JSON string.
pub(crate) fn write_string(out: &mut String, s: &str) -> Result<()> {
    out.push_str(&serde_json::to_string(s)?);
    Ok(())
}

/// Write a finite number verbatim, `null` otherwise.
pub(crate) fn write_number(out: &mut String, v: f64) {
    if v.is_finite() {
        let _ = write!(out, "{v}");
    } else {
        out.push_str("null");
    }
}

/// Drop one trailing comma, if present.
pub(crate) fn strip_trailing_comma(out: &mut String) {
    if out.ends_with(',') {
        out.pop();
    }
}

fn verify_fragment(fragment: &str) -> Result<()> {
    let wrapped = format!("{{{}}}", fragment.trim());
    serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&wrapped)
        .map(|_| ())
        .map_err(|e| Error::encoding(format!("raw fragment `{fragment}` is not valid JSON: {e}")))
}
