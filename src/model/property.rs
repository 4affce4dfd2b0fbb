//! Property values
//!
//! A closed set of typed values attached to nodes and edges, and the map that holds them.
//!
//! ## Text Format
//! ```text
//! <typeTag>:<textValue>
//!
//!   0 = Boolean   "true" / "false"
//!   1 = Integer   decimal i32
//!   2 = Double    shortest round-trip f64 text
//!   3 = String    raw text
//!   4 = Null      empty
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::{GraphError, Result};

use super::codec::{self, Fields, PROP_SEP};

/// Discriminant of a [`PropertyValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Boolean,
    Integer,
    Double,
    String,
    Null,
}

impl PropertyType {
    /// Stable tag written to disk
    pub fn tag(self) -> u8 {
        match self {
            PropertyType::Boolean => 0,
            PropertyType::Integer => 1,
            PropertyType::Double => 2,
            PropertyType::String => 3,
            PropertyType::Null => 4,
        }
    }

    /// Inverse of [`PropertyType::tag`]
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(PropertyType::Boolean),
            1 => Some(PropertyType::Integer),
            2 => Some(PropertyType::Double),
            3 => Some(PropertyType::String),
            4 => Some(PropertyType::Null),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyType::Boolean => "boolean",
            PropertyType::Integer => "integer",
            PropertyType::Double => "double",
            PropertyType::String => "string",
            PropertyType::Null => "null",
        };
        f.write_str(name)
    }
}

/// A typed property value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i32),
    Double(f64),
    String(String),
}

impl PropertyValue {
    /// Type of the stored value
    pub fn value_type(&self) -> PropertyType {
        match self {
            PropertyValue::Null => PropertyType::Null,
            PropertyValue::Boolean(_) => PropertyType::Boolean,
            PropertyValue::Integer(_) => PropertyType::Integer,
            PropertyValue::Double(_) => PropertyType::Double,
            PropertyValue::String(_) => PropertyType::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            PropertyValue::Boolean(b) => Ok(*b),
            other => Err(other.mismatch(PropertyType::Boolean)),
        }
    }

    pub fn as_int(&self) -> Result<i32> {
        match self {
            PropertyValue::Integer(i) => Ok(*i),
            other => Err(other.mismatch(PropertyType::Integer)),
        }
    }

    pub fn as_double(&self) -> Result<f64> {
        match self {
            PropertyValue::Double(d) => Ok(*d),
            other => Err(other.mismatch(PropertyType::Double)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            PropertyValue::String(s) => Ok(s),
            other => Err(other.mismatch(PropertyType::String)),
        }
    }

    fn mismatch(&self, expected: PropertyType) -> GraphError {
        GraphError::TypeMismatch {
            expected,
            found: self.value_type(),
        }
    }

    /// Encode as `tag:text`
    pub fn serialize(&self) -> String {
        format!("{}{}{}", self.value_type().tag(), PROP_SEP, self)
    }

    /// Decode a `tag:text` string
    pub fn deserialize(data: &str) -> Result<Self> {
        let (tag, text) = data.split_once(PROP_SEP).ok_or_else(|| {
            GraphError::InvalidFormat(format!("property value '{}' has no type tag", data))
        })?;
        let tag: u8 = codec::parse_field(tag, "property type tag")?;
        let value_type = PropertyType::from_tag(tag).ok_or_else(|| {
            GraphError::InvalidFormat(format!("unknown property type tag {}", tag))
        })?;

        match value_type {
            PropertyType::Boolean => match text {
                "true" => Ok(PropertyValue::Boolean(true)),
                "false" => Ok(PropertyValue::Boolean(false)),
                _ => Err(GraphError::InvalidFormat(format!(
                    "invalid boolean text '{}'",
                    text
                ))),
            },
            PropertyType::Integer => Ok(PropertyValue::Integer(codec::parse_field(
                text,
                "integer property",
            )?)),
            PropertyType::Double => Ok(PropertyValue::Double(codec::parse_field(
                text,
                "double property",
            )?)),
            PropertyType::String => Ok(PropertyValue::String(text.to_string())),
            PropertyType::Null if text.is_empty() => Ok(PropertyValue::Null),
            PropertyType::Null => Err(GraphError::InvalidFormat(format!(
                "null property carries text '{}'",
                text
            ))),
        }
    }

    /// Decode a `tag:text` string whose tag must be `expected`
    pub fn deserialize_expecting(data: &str, expected: PropertyType) -> Result<Self> {
        let value = Self::deserialize(data)?;
        if value.value_type() != expected {
            return Err(GraphError::InvalidFormat(format!(
                "expected {} property but record is tagged {}",
                expected,
                value.value_type()
            )));
        }
        Ok(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => Ok(()),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Double(d) => write!(f, "{}", d),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Double(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

// =============================================================================
// Property Map
// =============================================================================

/// Unique-key property storage shared by nodes and edges
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyMap {
    values: HashMap<String, PropertyValue>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a property, failing with `NotFound` if absent
    pub fn get(&self, key: &str) -> Result<&PropertyValue> {
        self.values
            .get(key)
            .ok_or_else(|| GraphError::NotFound(format!("property '{}'", key)))
    }

    /// Insert or replace a property, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in ascending order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Append `count|key:tag:value|...` sorted by key
    pub(crate) fn encode_into(&self, out: &mut String) {
        out.push_str(&self.values.len().to_string());
        out.push(codec::FIELD_SEP);
        for key in self.keys() {
            let value = &self.values[key];
            out.push_str(&codec::escape(key));
            out.push(PROP_SEP);
            out.push_str(&value.value_type().tag().to_string());
            out.push(PROP_SEP);
            out.push_str(&codec::escape(&value.to_string()));
            out.push(codec::FIELD_SEP);
        }
    }

    /// Read the count field followed by that many property records
    pub(crate) fn decode_from(fields: &mut Fields<'_>) -> Result<Self> {
        let count: usize = fields.parse("property count")?;
        let mut map = PropertyMap::new();
        for _ in 0..count {
            let record = fields.next("property record")?;
            let (key, value) = codec::split_once_unescaped(record, PROP_SEP).ok_or_else(|| {
                GraphError::InvalidFormat(format!("property record '{}' has no key", record))
            })?;
            let key = codec::unescape(key)?;
            let value = PropertyValue::deserialize(&codec::unescape(value)?)?;
            if map.values.insert(key.clone(), value).is_some() {
                return Err(GraphError::InvalidFormat(format!(
                    "duplicate property key '{}'",
                    key
                )));
            }
        }
        Ok(map)
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}
