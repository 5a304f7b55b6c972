use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Number(i64),
}

impl MetadataValue {
    /// Keeps strings and integers; anything else is not metadata.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(MetadataValue::String(s)),
            serde_json::Value::Number(n) => n.as_i64().map(MetadataValue::Number),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataValue::String(s) => f.write_str(s),
            MetadataValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Descriptive record fields beyond identity and text (bill title, sponsor,
/// status). Ordered by key so rendering is stable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    inner: BTreeMap<String, MetadataValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Metadata {
            inner: BTreeMap::new(),
        }
    }

    /// Builds metadata from the leftover fields of a corpus record.
    pub fn from_fields(fields: BTreeMap<String, serde_json::Value>) -> Self {
        let inner = fields
            .into_iter()
            .filter_map(|(k, v)| MetadataValue::from_json(v).map(|v| (k, v)))
            .collect();
        Metadata { inner }
    }

    pub fn insert_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), MetadataValue::String(value.into()));
    }

    pub fn insert_number(&mut self, key: impl Into<String>, value: i64) {
        self.inner.insert(key.into(), MetadataValue::Number(value));
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.inner.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.inner.iter()
    }
}
