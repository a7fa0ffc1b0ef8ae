//! Audit log entry entity model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use auditbind_core::types::{ContentType, EntryId};

use super::action::LogAction;
use crate::impl_model_any;
use crate::model::Model;
use crate::user::User;

/// Old and new value of one changed attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Value before the change. Informational only.
    pub old: serde_json::Value,
    /// Value after the change.
    pub new: serde_json::Value,
}

impl FieldChange {
    /// Creates a change pair.
    pub fn new(old: serde_json::Value, new: serde_json::Value) -> Self {
        Self { old, new }
    }
}

/// A record of a tracked change to some other object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique entry identifier.
    pub id: EntryId,
    /// Kind of the audited object.
    pub content_type: ContentType,
    /// Primary key of the audited object.
    pub object_pk: String,
    /// Human-readable description of the audited object.
    pub object_repr: String,
    /// What happened to the object.
    pub action: LogAction,
    /// Pending field changes keyed by attribute name.
    #[serde(default)]
    pub changes: BTreeMap<String, FieldChange>,
    /// User whose request produced the change.
    pub actor: Option<User>,
    /// User who reviewed the pending changes.
    pub reviewer: Option<User>,
    /// Originating client address.
    pub remote_addr: Option<String>,
    /// When the change was recorded.
    pub timestamp: DateTime<Utc>,
    /// Free-form extra data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<serde_json::Value>,
}

impl LogEntry {
    /// Creates an unstamped entry for an object.
    pub fn new(object: &dyn Model, action: LogAction) -> Self {
        Self {
            id: EntryId::new(),
            content_type: object.content_type(),
            object_pk: object.pk(),
            object_repr: object.repr(),
            action,
            changes: BTreeMap::new(),
            actor: None,
            reviewer: None,
            remote_addr: None,
            timestamp: Utc::now(),
            additional_data: None,
        }
    }

    /// Adds a pending change.
    pub fn with_change(
        mut self,
        field: &str,
        old: serde_json::Value,
        new: serde_json::Value,
    ) -> Self {
        self.changes
            .insert(field.to_string(), FieldChange::new(old, new));
        self
    }
}

impl Model for LogEntry {
    fn content_type(&self) -> ContentType {
        ContentType::log_entry()
    }

    fn pk(&self) -> String {
        self.id.to_string()
    }

    impl_model_any!();
}
