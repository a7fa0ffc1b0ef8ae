//! Persistence contract consumed by request binding and the API.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use auditbind_core::result::AppResult;
use auditbind_core::types::{ContentType, EntryId};
use auditbind_entity::{LogEntry, Model, Record};

/// Filter for listing log entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFilter {
    /// Only entries about this kind.
    pub content_type: Option<ContentType>,
    /// Only entries about this primary key.
    pub object_pk: Option<String>,
}

impl EntryFilter {
    /// Returns whether `entry` passes the filter.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.content_type
            .as_ref()
            .is_none_or(|ct| ct == &entry.content_type)
            && self
                .object_pk
                .as_ref()
                .is_none_or(|pk| pk == &entry.object_pk)
    }
}

/// Object persistence.
///
/// `save` and `delete` send the model signals (`PreSave`/`PostSave`,
/// `PreDelete`/`PostDelete`) for the instance inline, before and after the
/// write. A receiver error aborts the write and is returned.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// Fetches a record. Missing records are a `NotFound` error.
    async fn get(&self, content_type: &ContentType, pk: &str) -> AppResult<Record>;

    /// Persists any supported model instance.
    async fn save(&self, instance: &mut dyn Model) -> AppResult<()>;

    /// Removes a record. Missing records are a `NotFound` error.
    async fn delete(&self, content_type: &ContentType, pk: &str) -> AppResult<Record>;

    /// Fetches one log entry.
    async fn log_entry(&self, id: EntryId) -> AppResult<LogEntry>;

    /// Lists log entries, newest first.
    async fn log_entries(&self, filter: &EntryFilter) -> AppResult<Vec<LogEntry>>;
}

/// Shared handle to an object store.
pub type DynObjectStore = Arc<dyn ObjectStore>;
