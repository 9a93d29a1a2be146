//! Sparse JSON object construction: only present values become keys.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Builds a provider payload where unset optional fields are left out
/// entirely instead of being sent as `null` or empty placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseMap {
    fields: Map<String, Value>,
}

impl SparseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always insert `key`.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Insert `key` only when `value` is `Some`.
    pub fn with_opt<T: Into<Value>>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Insert `key` only when the text is present and not blank.
    pub fn with_text(self, key: &str, value: Option<&str>) -> Self {
        self.with_opt(key, value.filter(|t| !t.trim().is_empty()))
    }

    /// Insert a string map (tags, metadata) only when it has entries.
    pub fn with_string_map(self, key: &str, value: Option<&BTreeMap<String, String>>) -> Self {
        let object = value.filter(|m| !m.is_empty()).map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<Map<String, Value>>()
        });
        self.with_opt(key, object)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
