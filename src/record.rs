//! Persisted record tree.
//!
//! A `Record` is the tree-structured form affix data is stored in:
//! compounds of named children, lists, strings and numbers. It mirrors
//! the compound-tag trees game hosts attach to item stacks.
//!
//! JSON text is read through `serde_json::Value` so that values a record
//! cannot hold (`null`, booleans) are reported with their field path.
//! Non-finite doubles have no JSON form and are refused on write.
//!
//! Decoding helpers on `Record` return `MalformedRecordError` with the
//! field path filled in, so callers can use `?` all the way down.

use crate::error::{AffixError, MalformedKind, MalformedRecordError};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Named children of a compound record, in insertion order.
pub type RecordMap = IndexMap<String, Record>;

/// A node of a persisted record tree.
///
/// # Examples
///
/// ```rust
/// use weapon_affix::record::{Record, RecordMap};
///
/// let mut map = RecordMap::new();
/// map.insert("key".to_string(), Record::from("fire"));
/// map.insert("tier".to_string(), Record::Int(3));
/// let record = Record::Compound(map);
///
/// let json = serde_json::to_string(&record).unwrap();
/// assert_eq!(json, r#"{"key":"fire","tier":3}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    String(String),
    Int(i32),
    Long(i64),
    Double(f64),
    List(Vec<Record>),
    Compound(RecordMap),
}

impl Record {
    /// Name of this node's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Record::String(_) => "string",
            Record::Int(_) => "int",
            Record::Long(_) => "long",
            Record::Double(_) => "double",
            Record::List(_) => "list",
            Record::Compound(_) => "compound",
        }
    }

    pub fn as_compound(&self) -> Option<&RecordMap> {
        match self {
            Record::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Record]> {
        match self {
            Record::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Record::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view; `Int` widens to `i64`.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Record::Int(i) => Some(i64::from(*i)),
            Record::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Numeric view; every numeric node widens to `f64`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Record::Int(i) => Some(f64::from(*i)),
            Record::Long(l) => Some(*l as f64),
            Record::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Require this node to be a compound.
    pub fn expect_compound(&self, path: &str) -> Result<&RecordMap, MalformedRecordError> {
        self.as_compound()
            .ok_or_else(|| wrong_type(path, "compound", self))
    }

    /// Require this node to be a list.
    pub fn expect_list(&self, path: &str) -> Result<&[Record], MalformedRecordError> {
        self.as_list().ok_or_else(|| wrong_type(path, "list", self))
    }

    /// Require this node to be a string.
    pub fn expect_str(&self, path: &str) -> Result<&str, MalformedRecordError> {
        self.as_str().ok_or_else(|| wrong_type(path, "string", self))
    }

    /// Require this node to be an integer (`Int` or `Long`).
    pub fn expect_long(&self, path: &str) -> Result<i64, MalformedRecordError> {
        self.as_long().ok_or_else(|| wrong_type(path, "int", self))
    }

    /// Require this node to be numeric.
    pub fn expect_double(&self, path: &str) -> Result<f64, MalformedRecordError> {
        self.as_double().ok_or_else(|| wrong_type(path, "double", self))
    }

    /// Parse a record from JSON text.
    ///
    /// Syntax errors come back as `AffixError::Json`; JSON values with no
    /// record counterpart come back as `AffixError::Malformed`.
    pub fn from_json_str(json: &str) -> Result<Self, AffixError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_json_value(&value, "")?)
    }

    /// Convert a parsed JSON value found at `path`.
    ///
    /// Integers become `Int` when they fit, `Long` otherwise; integers
    /// beyond `i64` and all fractional numbers become `Double`.
    pub fn from_json_value(value: &Value, path: &str) -> Result<Self, MalformedRecordError> {
        match value {
            Value::String(s) => Ok(Record::String(s.clone())),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(l), _) => Ok(i32::try_from(l).map_or(Record::Long(l), Record::Int)),
                (None, Some(d)) => Ok(Record::Double(d)),
                (None, None) => Err(unsupported(path, "number")),
            },
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Self::from_json_value(item, &index_path(path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Record::List),
            Value::Object(fields) => fields
                .iter()
                .map(|(name, item)| {
                    Self::from_json_value(item, &child_path(path, name)).map(|r| (name.clone(), r))
                })
                .collect::<Result<RecordMap, _>>()
                .map(Record::Compound),
            Value::Null => Err(unsupported(path, "null")),
            Value::Bool(_) => Err(unsupported(path, "bool")),
        }
    }

    /// Render this record as compact JSON text.
    ///
    /// Fails on the first non-finite double, which JSON cannot carry.
    pub fn to_json_string(&self) -> Result<String, AffixError> {
        self.check_finite("")?;
        Ok(serde_json::to_string(self)?)
    }

    fn check_finite(&self, path: &str) -> Result<(), MalformedRecordError> {
        match self {
            Record::Double(d) if !d.is_finite() => {
                Err(MalformedRecordError::new(path, MalformedKind::NonFinite))
            }
            Record::List(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(i, item)| item.check_finite(&index_path(path, i))),
            Record::Compound(fields) => fields
                .iter()
                .try_for_each(|(name, item)| item.check_finite(&child_path(path, name))),
            _ => Ok(()),
        }
    }
}

impl From<&str> for Record {
    fn from(s: &str) -> Self {
        Record::String(s.to_string())
    }
}

impl From<String> for Record {
    fn from(s: String) -> Self {
        Record::String(s)
    }
}

impl From<f64> for Record {
    fn from(d: f64) -> Self {
        Record::Double(d)
    }
}

impl From<Vec<Record>> for Record {
    fn from(list: Vec<Record>) -> Self {
        Record::List(list)
    }
}

impl From<RecordMap> for Record {
    fn from(map: RecordMap) -> Self {
        Record::Compound(map)
    }
}

/// Look up a required child of a compound.
///
/// `parent` is the path of the compound; the returned error path is
/// `parent.name` (or just `name` at the root).
pub fn required<'a>(
    map: &'a RecordMap,
    parent: &str,
    name: &str,
) -> Result<&'a Record, MalformedRecordError> {
    map.get(name)
        .ok_or_else(|| MalformedRecordError::new(child_path(parent, name), MalformedKind::MissingField))
}

/// Join a parent path and a field name.
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

/// Path of the element at `index` of the list at `parent`.
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

fn unsupported(path: &str, found: &'static str) -> MalformedRecordError {
    MalformedRecordError::new(
        path,
        MalformedKind::WrongType {
            expected: "record value",
            found,
        },
    )
}

fn wrong_type(path: &str, expected: &'static str, found: &Record) -> MalformedRecordError {
    MalformedRecordError::new(
        path,
        MalformedKind::WrongType {
            expected,
            found: found.type_name(),
        },
    )
}
