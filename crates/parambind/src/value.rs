//! Dynamic intermediate values.
//!
//! Codecs produce and consume [`Value`]s; [`Bindable`](crate::Bindable)
//! converts between a `Value` and the concrete Rust type.

use std::fmt;
use std::fs::File;

use bytes::Bytes;
use chrono::NaiveDateTime;

use crate::ReadSeek;

/// A decoded value, or the input to an encode.
pub enum Value {
    /// Absent handle (zero value of opaque types).
    Nil,
    /// Boolean.
    Bool(bool),
    /// Signed integer, already truncated to the target width.
    Int(i64),
    /// Unsigned integer, already truncated to the target width.
    Uint(u64),
    /// Float, already rounded to the target width.
    Float(f64),
    /// Text.
    String(String),
    /// Calendar date and time of day.
    Time(NaiveDateTime),
    /// Byte buffer read from an upload.
    Bytes(Bytes),
    /// Open file handle.
    File(File),
    /// Seekable byte stream.
    Reader(Box<dyn ReadSeek>),
    /// Sequence.
    Slice(Vec<Value>),
    /// Key/value entries; keys are unique.
    Map(Vec<(Value, Value)>),
    /// Named fields.
    Struct(Vec<(String, Value)>),
    /// Owning pointer; `None` is a null pointer.
    Pointer(Option<Box<Value>>),
}

impl Value {
    /// Variant name for diagnostics.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Time(_) => "time",
            Self::Bytes(_) => "bytes",
            Self::File(_) => "file",
            Self::Reader(_) => "reader",
            Self::Slice(_) => "slice",
            Self::Map(_) => "map",
            Self::Struct(_) => "struct",
            Self::Pointer(_) => "pointer",
        }
    }

    /// Returns true for [`Value::Nil`].
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Text content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a struct field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Looks up a map entry by key.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Removes and returns a struct field by name.
///
/// Used by derived [`Bindable::from_value`](crate::Bindable::from_value)
/// implementations.
pub fn take_field(fields: &mut Vec<(String, Value)>, name: &str) -> Option<Value> {
    let index = fields.iter().position(|(n, _)| n == name)?;
    Some(fields.swap_remove(index).1)
}

/// Sets a struct field, replacing an existing entry of the same name.
pub fn set_field(fields: &mut Vec<(String, Value)>, name: &str, value: Value) {
    match fields.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = value,
        None => fields.push((name.to_string(), value)),
    }
}

/// Inserts a map entry; an equal key is overwritten (last writer wins).
pub fn upsert_entry(entries: &mut Vec<(Value, Value)>, key: Value, value: Value) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key, value)),
    }
}

// Handles never compare equal; everything else compares structurally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Uint(a), Self::Uint(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Slice(a), Self::Slice(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            (Self::Pointer(a), Self::Pointer(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("Nil"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Self::Bytes(v) => f.debug_tuple("Bytes").field(&v.len()).finish(),
            Self::File(v) => f.debug_tuple("File").field(v).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
            Self::Slice(v) => f.debug_tuple("Slice").field(v).finish(),
            Self::Map(v) => f.debug_tuple("Map").field(v).finish(),
            Self::Struct(v) => f.debug_tuple("Struct").field(v).finish(),
            Self::Pointer(v) => f.debug_tuple("Pointer").field(v).finish(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
