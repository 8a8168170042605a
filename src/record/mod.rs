// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Records: one event's ordered field map flowing through a flow.
//!
//! A record is owned by exactly one step at a time. Steps take it by value and
//! hand it back (possibly mutated) or drop it, so no two steps ever observe the
//! same record concurrently.

mod value;

pub use value::Value;

use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;
use serde::Serialize;

/// Ordered mapping from field name to [`Value`]. Field names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Field lookup. A missing key reads as `None`, never an error.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Insert or overwrite a field. Overwriting keeps the field's original position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Merge every field of `other` into this record, overwriting existing keys.
    pub fn merge(&mut self, other: Record) {
        for (field, value) in other.0 {
            self.0.insert(field, value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Text form of a field, `None` when missing or null.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(Value::to_text)
    }

    /// Copy of this record without the given fields, order preserved.
    pub fn without<S: AsRef<str>>(&self, excluded: &[S]) -> Record {
        self.0
            .iter()
            .filter(|(k, _)| !excluded.iter().any(|e| e.as_ref() == k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

/// Build a record from literal pairs, mostly for tests and fixtures.
///
/// ```
/// use feature_stream_engine::record;
///
/// let r = record! { "x" => 10, "y" => "Z" };
/// assert_eq!(r.len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    () => { $crate::record::Record::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut r = $crate::record::Record::new();
        $( r.insert($key, $crate::record::Value::from($value)); )+
        r
    }};
}
