//! Persistent session document tree.
//!
//! A [`Document`] is a map from string keys to [`Value`]s. Nested maps and
//! lists sit behind `Arc`, so cloning any part of the tree is O(1) and a
//! mutation copies only the nodes on the path it touches (`Arc::make_mut`).
//! Holders of the previous version never observe the change.
//!
//! Serializes as plain JSON. Keys are kept in sorted order.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::errors::SessionError;

/// The key/value map at every level of a document.
pub type Fields = BTreeMap<String, Value>;

/// A node in the session document tree.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum Value {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number (integer or float, as parsed).
    Number(serde_json::Number),
    /// JSON string.
    String(String),
    /// Ordered sequence, shared until mutated.
    List(Arc<Vec<Value>>),
    /// Nested map, shared until mutated.
    Map(Arc<Fields>),
}

impl Value {
    /// Build a list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(Arc::new(items.into_iter().collect()))
    }

    /// Build a map value.
    pub fn map(fields: Fields) -> Self {
        Self::Map(Arc::new(fields))
    }

    /// The nested map, if this value is one.
    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Self::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// The list items, if this value is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// JSON type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "array",
            Self::Map(_) => "object",
        }
    }

    /// Whether both values point at the same shared allocation.
    ///
    /// Always `false` for scalars.
    pub fn shares_with(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => Arc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => s.serialize_unit(),
            Self::Bool(b) => s.serialize_bool(*b),
            Self::Number(n) => n.serialize(s),
            Self::String(v) => s.serialize_str(v),
            Self::List(items) => items.as_slice().serialize(s),
            Self::Map(fields) => fields.as_ref().serialize(s),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => Self::map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(fields) => fields_to_json(fields),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Self::Map(doc.0)
    }
}

fn fields_to_json(fields: &Fields) -> serde_json::Value {
    serde_json::Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
            .collect(),
    )
}

fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// The session document: a map at the root, immutable by convention.
///
/// Operations in [`crate::ops`] take `&Document` and return a new one.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Document(Arc<Fields>);

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing field map.
    pub fn from_fields(fields: Fields) -> Self {
        Self(Arc::new(fields))
    }

    /// Read-only view of the root map.
    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Mutable root map. Copies the root first if it is shared.
    pub(crate) fn fields_mut(&mut self) -> &mut Fields {
        Arc::make_mut(&mut self.0)
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Follow `keys` through nested maps.
    pub fn pointer<S: AsRef<str>>(&self, keys: &[S]) -> Option<&Value> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.0.get(first.as_ref())?;
        for key in rest {
            current = current.as_map()?.get(key.as_ref())?;
        }
        Some(current)
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether both documents share the same root allocation.
    pub fn shares_with(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Deep-convert into a `serde_json::Value` object.
    pub fn to_json(&self) -> serde_json::Value {
        fields_to_json(&self.0)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.0.as_ref().serialize(s)
    }
}

impl TryFrom<serde_json::Value> for Document {
    type Error = SessionError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        match v {
            serde_json::Value::Object(map) => Ok(Self::from_fields(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            )),
            other => Err(SessionError::NotADocument {
                found: json_type_name(&other),
            }),
        }
    }
}

impl TryFrom<Value> for Document {
    type Error = SessionError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Map(fields) => Ok(Self(fields)),
            other => Err(SessionError::NotADocument {
                found: other.type_name(),
            }),
        }
    }
}

/// Compact JSON, used as the human-readable form in rendered blocks.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}
