//! Audited kinds and scoped suspension of auditing.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use auditbind_core::types::ContentType;

/// Which fields of an audited kind are tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOptions {
    /// When non-empty, only these fields are tracked.
    #[serde(default)]
    pub include_fields: Vec<String>,
    /// Fields never tracked.
    #[serde(default)]
    pub exclude_fields: Vec<String>,
}

impl AuditOptions {
    /// Returns whether changes to `field` are recorded.
    pub fn tracks(&self, field: &str) -> bool {
        (self.include_fields.is_empty() || self.include_fields.iter().any(|f| f == field))
            && !self.exclude_fields.iter().any(|f| f == field)
    }
}

/// Registry of kinds whose saves are recorded as log entries.
#[derive(Debug, Default)]
pub struct AuditRegistry {
    models: DashMap<ContentType, AuditOptions>,
}

impl AuditRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts auditing `content_type`, replacing any previous options.
    pub fn register(&self, content_type: ContentType, options: AuditOptions) {
        info!(model = %content_type, "Auditing enabled");
        self.models.insert(content_type, options);
    }

    /// Stops auditing `content_type`. Returns the options it was registered with.
    pub fn unregister(&self, content_type: &ContentType) -> Option<AuditOptions> {
        let removed = self.models.remove(content_type).map(|(_, options)| options);
        if removed.is_some() {
            info!(model = %content_type, "Auditing disabled");
        }
        removed
    }

    /// Returns whether saves of `content_type` are audited.
    pub fn contains(&self, content_type: &ContentType) -> bool {
        self.models.contains_key(content_type)
    }

    /// Returns the options `content_type` is audited with.
    pub fn options(&self, content_type: &ContentType) -> Option<AuditOptions> {
        self.models.get(content_type).map(|entry| entry.value().clone())
    }

    /// Suspends auditing of `content_type` until the returned guard drops.
    ///
    /// The guard restores the registration that was in place when it was
    /// acquired. Suspending a kind that is not audited (including one
    /// already suspended by an outer guard) yields a guard that restores
    /// nothing, so nested suspensions re-enable auditing exactly once.
    pub fn suspend(self: &Arc<Self>, content_type: &ContentType) -> AuditSuspension {
        let restore = self.unregister(content_type);
        debug!(
            model = %content_type,
            was_audited = restore.is_some(),
            "Auditing suspended"
        );
        AuditSuspension {
            registry: Arc::clone(self),
            content_type: content_type.clone(),
            restore,
        }
    }
}

/// Scoped suspension of auditing for one kind.
#[derive(Debug)]
#[must_use = "dropping the suspension re-enables auditing immediately"]
pub struct AuditSuspension {
    registry: Arc<AuditRegistry>,
    content_type: ContentType,
    restore: Option<AuditOptions>,
}

impl Drop for AuditSuspension {
    fn drop(&mut self) {
        if let Some(options) = self.restore.take() {
            self.registry.register(self.content_type.clone(), options);
        }
    }
}
