//! A schemaless record addressed by kind and primary key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use auditbind_core::types::ContentType;

use crate::impl_model_any;
use crate::model::Model;

/// An application object whose saves can be audited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Kind of the record.
    pub content_type: ContentType,
    /// Primary key.
    pub pk: String,
    /// Attribute values by name.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new(content_type: ContentType, pk: impl Into<String>) -> Self {
        Self {
            content_type,
            pk: pk.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: Value) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    /// Returns an attribute value.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Model for Record {
    fn content_type(&self) -> ContentType {
        self.content_type.clone()
    }

    fn pk(&self) -> String {
        self.pk.clone()
    }

    fn repr(&self) -> String {
        ["title", "name"]
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} {}", self.content_type, self.pk))
    }

    impl_model_any!();
}
