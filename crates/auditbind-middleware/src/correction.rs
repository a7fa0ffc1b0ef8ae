//! Reviewer corrections.
//!
//! When the acting user may review the audited model, the pending changes
//! on the entry are written back onto the audited object and the object is
//! saved. The request's receiver is disconnected first so later entry saves
//! in the same request are left alone, and auditing of the object's kind is
//! suspended for the save so the correction itself is not logged. The
//! suspension is a guard: it is lifted whether or not the save succeeds.

use tracing::info;

use auditbind_core::result::AppResult;
use auditbind_core::types::ContentType;
use auditbind_entity::{LogEntry, Record, User};
use auditbind_signals::{DispatchUid, Signal};

use crate::binding::AuditBinding;

/// Applies a reviewed entry's pending changes to the audited object.
#[derive(Debug)]
pub struct Corrector<'a> {
    binding: &'a AuditBinding,
}

impl<'a> Corrector<'a> {
    /// Creates a corrector over the shared collaborators.
    pub fn new(binding: &'a AuditBinding) -> Self {
        Self { binding }
    }

    /// Resolves the object an entry is about. Missing objects are an error.
    pub async fn resolve(&self, entry: &LogEntry) -> AppResult<Record> {
        self.binding
            .store
            .get(&entry.content_type, &entry.object_pk)
            .await
    }

    /// Marks `reviewer` on the entry, applies its changes, and saves the
    /// object with auditing suspended.
    pub async fn apply(
        &self,
        entry: &mut LogEntry,
        reviewer: &User,
        dispatch_uid: &DispatchUid,
    ) -> AppResult<()> {
        entry.reviewer = Some(reviewer.clone());

        let mut object = self.resolve(entry).await?;
        for (attname, change) in &entry.changes {
            object.set_attr(attname, change.new.clone());
        }

        self.binding.bus.disconnect(
            Signal::PreSave,
            ContentType::log_entry(),
            dispatch_uid.clone(),
        );

        let _suspended = self.binding.audit.suspend(&object.content_type);
        self.binding.store.save(&mut object).await?;

        info!(
            entry_id = %entry.id,
            model = %object.content_type,
            pk = %object.pk,
            reviewer = %reviewer.username,
            changes = entry.changes.len(),
            "Reviewed changes applied"
        );
        Ok(())
    }
}
