//! Capture results: the flat ordered mapping filled by the matching engine,
//! and the structured per-element record shape.
//!
//! Key collisions always append, never overwrite: one entry per matched
//! element, in document traversal order, with `None` standing in for an
//! attribute that was absent on a matched element.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered mapping from capture key to the values extracted under that key.
///
/// Produced fresh per [`capture_from`](crate::engine::Matcher::capture_from)
/// call and owned by the caller. Iteration and serialization follow key
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureMap {
    keys: Vec<String>,
    values: HashMap<String, Vec<Option<String>>>,
}

impl CaptureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one extracted value (or the absent marker) under `key`.
    pub fn append(&mut self, key: &str, value: Option<String>) {
        if !self.values.contains_key(key) {
            self.keys.push(key.to_string());
        }
        self.values.entry(key.to_string()).or_default().push(value);
    }

    pub fn get(&self, key: &str) -> Option<&[Option<String>]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Number of distinct capture keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Entries in key insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<String>])> {
        self.keys
            .iter()
            .map(|key| (key.as_str(), self.values[key].as_slice()))
    }
}

impl Serialize for CaptureMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (key, values) in self.iter() {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// One structured record per matched element: its own extracted fields plus
/// the records its child matchers produced from the element's subtree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureRecord {
    pub fields: Vec<(String, Option<String>)>,
    pub children: Vec<CaptureRecord>,
}

impl CaptureRecord {
    pub fn field(&self, key: &str) -> Option<&Option<String>> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl Serialize for CaptureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(!self.children.is_empty());
        let mut map = serializer.serialize_map(Some(self.fields.len() + extra))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        if !self.children.is_empty() {
            map.serialize_entry("_children", &self.children)?;
        }
        map.end()
    }
}
