// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-object attribute bags and the object-id index over them.
//!
//! The translation service emits one bag per drawing object, grouped into
//! named categories ("General", "Geometry", ...). Category names are not
//! spelled consistently (some carry a trailing space), so every lookup here
//! takes a list of accepted spellings instead of a single key.

use crate::payload::object_id_of;
use rustc_hash::FxHashMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Loosely typed scalar stored in a bag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null,
    /// Arrays or nested objects; kept verbatim.
    Opaque(Value),
}

impl AttrValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => AttrValue::Text(s.clone()),
            Value::Number(n) => AttrValue::Number(n.clone()),
            Value::Bool(b) => AttrValue::Bool(*b),
            Value::Null => AttrValue::Null,
            other => AttrValue::Opaque(other.clone()),
        }
    }

    /// String coercion used by attribute extraction. Null becomes empty.
    pub fn as_text(&self) -> String {
        match self {
            AttrValue::Text(s) => s.clone(),
            AttrValue::Number(n) => n.to_string(),
            AttrValue::Bool(b) => b.to_string(),
            AttrValue::Null => String::new(),
            AttrValue::Opaque(v) => v.to_string(),
        }
    }

    /// Numeric view; strings are parsed leniently (see [`parse_number`]).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            AttrValue::Text(s) => parse_number(s),
            _ => None,
        }
    }
}

/// Parse the leading number of an attribute string.
///
/// Accepts surrounding whitespace and drops a trailing unit suffix, so
/// `"1200 mm"` and `"12.5 m²"` both parse. Returns `None` for text with no
/// leading number or a non-finite result.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    let (value, consumed) = fast_float::parse_partial::<f64, _>(trimmed).ok()?;
    if consumed == 0 || !value.is_finite() {
        return None;
    }
    Some(value)
}

/// One named attribute category with its fields in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeCategory {
    pub name: String,
    pub fields: Vec<(String, AttrValue)>,
}

impl AttributeCategory {
    /// First field matching `keys`, trying the keys in the order given.
    pub fn get(&self, keys: &[&str]) -> Option<&AttrValue> {
        keys.iter().find_map(|key| {
            self.fields
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value)
        })
    }

    /// Numeric field lookup. A present but unparseable value counts as absent.
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        keys.iter()
            .find_map(|key| self.get(std::slice::from_ref(key)).and_then(AttrValue::as_f64))
    }
}

/// Attribute bag for a single drawing object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBag {
    categories: Vec<AttributeCategory>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from the upstream JSON object. Categories whose value is
    /// not an object are ignored; a non-object input yields an empty bag.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let categories = map
            .iter()
            .filter_map(|(name, fields)| {
                let fields = fields.as_object()?;
                Some(AttributeCategory {
                    name: name.clone(),
                    fields: fields
                        .iter()
                        .map(|(key, value)| (key.clone(), AttrValue::from_json(value)))
                        .collect(),
                })
            })
            .collect();
        Self { categories }
    }

    /// Append a field, creating the category on first use.
    pub fn insert(&mut self, category: &str, field: &str, value: AttrValue) {
        match self.categories.iter_mut().find(|c| c.name == category) {
            Some(existing) => existing.fields.push((field.to_string(), value)),
            None => self.categories.push(AttributeCategory {
                name: category.to_string(),
                fields: vec![(field.to_string(), value)],
            }),
        }
    }

    /// Builder form of [`insert`](Self::insert) for text values.
    pub fn with(mut self, category: &str, field: &str, value: impl Into<String>) -> Self {
        self.insert(category, field, AttrValue::Text(value.into()));
        self
    }

    pub fn categories(&self) -> &[AttributeCategory] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// First category whose name is one of `names`, in bag order.
    pub fn category(&self, names: &[&str]) -> Option<&AttributeCategory> {
        self.categories
            .iter()
            .find(|c| names.contains(&c.name.as_str()))
    }

    /// Scan every category in bag order and return the first field whose
    /// name is in `keys`, coerced to a string.
    pub fn extract(&self, keys: &[&str]) -> Option<String> {
        self.categories.iter().find_map(|category| {
            category
                .fields
                .iter()
                .find(|(name, _)| keys.contains(&name.as_str()))
                .map(|(_, value)| value.as_text())
        })
    }
}

/// Attribute extraction over a possibly absent bag. Returns an empty string
/// when the bag is missing or no key matches.
pub fn extract(bag: Option<&AttributeBag>, keys: &[&str]) -> String {
    bag.and_then(|b| b.extract(keys)).unwrap_or_default()
}

impl Serialize for AttributeBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut outer = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            outer.serialize_entry(&category.name, &Fields(&category.fields))?;
        }
        outer.end()
    }
}

struct Fields<'a>(&'a [(String, AttrValue)]);

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(AttributeBag::from_value(&value))
    }
}

/// Read-only `objectId -> AttributeBag` index, built once per parse.
#[derive(Debug, Clone, Default)]
pub struct AttributeIndex {
    bags: FxHashMap<i64, AttributeBag>,
}

impl AttributeIndex {
    /// Build the index from the properties payload
    /// (`{ data: { collection: [{ objectid, properties }] } }`).
    ///
    /// A payload of any other shape produces an empty index. Entries without
    /// a usable object id are skipped; for repeated ids the first entry wins.
    pub fn from_properties(payload: &Value) -> Self {
        let Some(collection) = payload
            .pointer("/data/collection")
            .and_then(Value::as_array)
        else {
            tracing::debug!("Properties payload has no collection; using empty attribute index");
            return Self::default();
        };

        let mut bags = FxHashMap::default();
        bags.reserve(collection.len());
        let mut skipped = 0usize;
        let mut duplicates = 0usize;

        for record in collection {
            let Some(id) = record
                .get("objectid")
                .or_else(|| record.get("objectId"))
                .and_then(object_id_of)
            else {
                skipped += 1;
                continue;
            };
            let bag = record
                .get("properties")
                .map(AttributeBag::from_value)
                .unwrap_or_default();
            if bags.contains_key(&id) {
                duplicates += 1;
                continue;
            }
            bags.insert(id, bag);
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Skipped property records without an object id");
        }
        tracing::debug!(bags = bags.len(), duplicates, "Built attribute index");

        Self { bags }
    }

    pub fn insert(&mut self, object_id: i64, bag: AttributeBag) {
        self.bags.insert(object_id, bag);
    }

    #[inline]
    pub fn get(&self, object_id: i64) -> Option<&AttributeBag> {
        self.bags.get(&object_id)
    }

    pub fn len(&self) -> usize {
        self.bags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }
}

impl FromIterator<(i64, AttributeBag)> for AttributeIndex {
    fn from_iter<I: IntoIterator<Item = (i64, AttributeBag)>>(iter: I) -> Self {
        Self {
            bags: iter.into_iter().collect(),
        }
    }
}
