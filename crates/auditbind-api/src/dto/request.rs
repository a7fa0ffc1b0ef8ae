//! Request DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use auditbind_entity::FieldChange;

/// Body of `PUT /api/records/{app}/{model}/{pk}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertRecordRequest {
    /// Fields to set. Fields not named keep their stored value.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// Body of `PATCH /api/entries/{id}/changes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageChangesRequest {
    /// Pending changes replacing the entry's recorded changes.
    #[serde(default)]
    pub changes: BTreeMap<String, FieldChange>,
}

/// Query of `GET /api/entries`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryQuery {
    /// App label of the audited kind. Requires `model`.
    pub app: Option<String>,
    /// Model name of the audited kind. Requires `app`.
    pub model: Option<String>,
    /// Primary key of the audited object.
    pub pk: Option<String>,
}
