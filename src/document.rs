//! Configuration documents and field addressing.

use serde_json::{Map, Value};
use std::fmt;

/// Location of a field inside a document: a top-level key or a key inside a
/// top-level map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Top(&'static str),
    Nested(&'static str, &'static str),
}

impl FieldPath {
    /// Path segments, outermost first.
    pub fn segments(&self) -> Vec<&'static str> {
        match *self {
            FieldPath::Top(key) => vec![key],
            FieldPath::Nested(parent, key) => vec![parent, key],
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Top(key) => write!(f, "{}", key),
            FieldPath::Nested(parent, key) => write!(f, "{}.{}", parent, key),
        }
    }
}

/// A nested path whose parent map is not part of the document's shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("{path}: parent map does not exist in the document")]
    MissingParent { path: String },

    #[error("{path}: parent is not a map")]
    ParentNotMap { path: String },
}

/// A named, ordered mapping from keys to JSON values.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    name: String,
    fields: Map<String, Value>,
}

impl ConfigDocument {
    pub fn new(name: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Build a document from a JSON value. Returns `None` unless the value is
    /// an object.
    pub fn from_value(name: impl Into<String>, value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::new(name, fields)),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        match *path {
            FieldPath::Top(key) => self.fields.get(key),
            FieldPath::Nested(parent, key) => self.fields.get(parent)?.as_object()?.get(key),
        }
    }

    /// Write `value` at `path`, returning the value it replaced.
    ///
    /// A nested write requires the parent map to exist already; no maps are
    /// created. On error the document is unchanged.
    pub fn set(&mut self, path: &FieldPath, value: Value) -> Result<Option<Value>, PathError> {
        match *path {
            FieldPath::Top(key) => Ok(self.fields.insert(key.to_string(), value)),
            FieldPath::Nested(parent, key) => match self.fields.get_mut(parent) {
                Some(Value::Object(map)) => Ok(map.insert(key.to_string(), value)),
                Some(_) => Err(PathError::ParentNotMap {
                    path: path.to_string(),
                }),
                None => Err(PathError::MissingParent {
                    path: path.to_string(),
                }),
            },
        }
    }
}
