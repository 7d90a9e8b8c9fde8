//! Purpose: Hold the flat field set produced by whichever decode tier succeeds.
//! Exports: `FieldValue`, `FlatFieldSet`, field-name constants.
//! Role: Shared currency between the decoder and the projector.
//! Invariants: Values are text or lists of text; nothing else is stored.
//! Invariants: Iteration order is the sorted field-name order.
use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PROJECT_TITLE: &str = "project_title";
pub const PROJECT_DESCRIPTION: &str = "project_description";
pub const TITLE: &str = "title";
pub const SUBTITLE: &str = "subtitle";
pub const AUTHOR: &str = "author";
pub const EXCERPT: &str = "excerpt";
pub const CONTENT: &str = "content";
pub const CATEGORY: &str = "category";
pub const TAGS: &str = "tags";
pub const SUGGESTED_SECTIONS: &str = "suggested_sections";
pub const META_TITLE: &str = "meta_title";
pub const META_DESCRIPTION: &str = "meta_description";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }

    /// Convert a decoded JSON value; `null` has no field representation.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(FieldValue::Text(text.clone())),
            Value::Array(items) => Some(FieldValue::List(
                items.iter().map(item_text).collect(),
            )),
            Value::Bool(_) | Value::Number(_) | Value::Object(_) => {
                Some(FieldValue::Text(value.to_string()))
            }
        }
    }
}

fn item_text(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatFieldSet(BTreeMap<String, FieldValue>);

impl FlatFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_object(map: &Map<String, Value>) -> Self {
        map.iter()
            .filter_map(|(name, value)| {
                FieldValue::from_json(value).map(|field| (name.clone(), field))
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(FieldValue::as_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.0.iter()
    }
}

impl FromIterator<(String, FieldValue)> for FlatFieldSet {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FlatFieldSet {
    type Item = (String, FieldValue);
    type IntoIter = btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FlatFieldSet {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, FlatFieldSet};
    use serde_json::json;

    #[test]
    fn from_object_normalizes_value_shapes() {
        let value = json!({
            "title": "T",
            "tags": ["a", 2, true],
            "word_count": 120,
            "draft": false,
            "meta": {"k": "v"},
            "removed": null
        });
        let fields = FlatFieldSet::from_object(value.as_object().expect("object"));

        assert_eq!(fields.text("title"), Some("T"));
        assert_eq!(
            fields.get("tags"),
            Some(&FieldValue::List(vec![
                "a".to_string(),
                "2".to_string(),
                "true".to_string()
            ]))
        );
        assert_eq!(fields.text("word_count"), Some("120"));
        assert_eq!(fields.text("draft"), Some("false"));
        assert_eq!(fields.text("meta"), Some("{\"k\":\"v\"}"));
        assert!(!fields.contains("removed"));
        assert_eq!(fields.len(), 5);
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut fields = FlatFieldSet::new();
        fields.insert("title", "T");
        fields.insert("tags", vec!["x".to_string()]);
        let text = serde_json::to_string(&fields).expect("json");
        assert_eq!(text, r#"{"tags":["x"],"title":"T"}"#);
    }

    #[test]
    fn text_ignores_list_values() {
        let mut fields = FlatFieldSet::new();
        fields.insert("title", vec!["not".to_string(), "text".to_string()]);
        assert_eq!(fields.text("title"), None);
        assert!(fields.contains("title"));
    }
}
