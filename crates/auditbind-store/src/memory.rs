//! In-memory object store.
//!
//! Keeps records, users, and log entries in concurrent maps, sends model
//! signals around every write, and records a log entry for each change to
//! an audited kind.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use auditbind_core::error::AppError;
use auditbind_core::result::AppResult;
use auditbind_core::types::{ContentType, EntryId};
use auditbind_entity::{LogAction, LogEntry, Model, Record, User};
use auditbind_signals::{Signal, SignalBus};

use crate::audit_registry::AuditRegistry;
use crate::diff::model_changes;
use crate::traits::{EntryFilter, ObjectStore};

/// Object store backed by process memory.
#[derive(Debug)]
pub struct MemoryStore {
    /// Bus model signals are sent on.
    bus: SignalBus,
    /// Kinds whose changes are recorded.
    audit: Arc<AuditRegistry>,
    /// Records by kind and primary key.
    records: DashMap<(ContentType, String), Record>,
    /// Users by primary key.
    users: DashMap<String, User>,
    /// Log entries by id.
    entries: DashMap<EntryId, LogEntry>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new(bus: SignalBus, audit: Arc<AuditRegistry>) -> Self {
        Self {
            bus,
            audit,
            records: DashMap::new(),
            users: DashMap::new(),
            entries: DashMap::new(),
        }
    }

    /// Returns the signal bus this store sends on.
    pub fn bus(&self) -> &SignalBus {
        &self.bus
    }

    /// Returns the audit registry this store consults.
    pub fn audit_registry(&self) -> &Arc<AuditRegistry> {
        &self.audit
    }

    /// Number of stored log entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Writes a record and returns the version it replaced.
    fn write_record(&self, record: &Record) -> Option<Record> {
        self.records
            .insert((record.content_type.clone(), record.pk.clone()), record.clone())
    }

    /// Records a log entry for a change to an audited kind.
    async fn log_change(
        &self,
        object: &Record,
        previous: Option<&Record>,
        current: Option<&Record>,
        action: LogAction,
    ) -> AppResult<()> {
        let Some(options) = self.audit.options(&object.content_type) else {
            return Ok(());
        };

        let changes = model_changes(
            previous.map(|r| &r.fields),
            current.map(|r| &r.fields),
            &options,
        );

        if changes.is_empty() && action == LogAction::Update {
            debug!(
                model = %object.content_type,
                pk = %object.pk,
                "No tracked fields changed, skipping log entry"
            );
            return Ok(());
        }

        let mut entry = LogEntry::new(object, action);
        entry.changes = changes;
        self.save(&mut entry).await
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, content_type: &ContentType, pk: &str) -> AppResult<Record> {
        self.records
            .get(&(content_type.clone(), pk.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                AppError::not_found(format!("{content_type} matching pk '{pk}' does not exist"))
            })
    }

    async fn save(&self, instance: &mut dyn Model) -> AppResult<()> {
        let supported = instance.downcast_ref::<Record>().is_some()
            || instance.downcast_ref::<LogEntry>().is_some()
            || instance.downcast_ref::<User>().is_some();
        if !supported {
            return Err(AppError::validation(format!(
                "Cannot persist instances of {}",
                instance.content_type()
            )));
        }

        self.bus.send(Signal::PreSave, instance).await?;

        if let Some(entry) = instance.downcast_ref::<LogEntry>() {
            debug!(entry_id = %entry.id, model = %entry.content_type, "Log entry saved");
            self.entries.insert(entry.id, entry.clone());
        } else if let Some(user) = instance.downcast_ref::<User>() {
            self.users.insert(user.pk(), user.clone());
        } else if let Some(record) = instance.downcast_ref::<Record>() {
            let record = record.clone();
            let previous = self.write_record(&record);
            let action = if previous.is_some() {
                LogAction::Update
            } else {
                LogAction::Create
            };
            self.log_change(&record, previous.as_ref(), Some(&record), action)
                .await?;
        }

        self.bus.send(Signal::PostSave, instance).await
    }

    async fn delete(&self, content_type: &ContentType, pk: &str) -> AppResult<Record> {
        let mut record = self.get(content_type, pk).await?;

        self.bus.send(Signal::PreDelete, &mut record).await?;
        self.records
            .remove(&(content_type.clone(), pk.to_string()));

        // Delete and its log entry commit together.
        if let Err(e) = self
            .log_change(&record, Some(&record), None, LogAction::Delete)
            .await
        {
            warn!(
                model = %content_type,
                pk = %pk,
                error = %e,
                "Failed to log delete, restoring record"
            );
            self.write_record(&record);
            return Err(e);
        }
        info!(model = %content_type, pk = %pk, "Record deleted");

        self.bus.send(Signal::PostDelete, &mut record).await?;
        Ok(record)
    }

    async fn log_entry(&self, id: EntryId) -> AppResult<LogEntry> {
        self.entries
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Log entry {id} does not exist")))
    }

    async fn log_entries(&self, filter: &EntryFilter) -> AppResult<Vec<LogEntry>> {
        let mut entries: Vec<LogEntry> = self
            .entries
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }
}
