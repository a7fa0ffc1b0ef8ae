//! The per-request `PreSave` receiver for log entries.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use auditbind_core::result::AppResult;
use auditbind_entity::{LogAction, LogEntry, User};
use auditbind_signals::{DispatchUid, Receiver, SignalEvent};

use crate::binding::AuditBinding;
use crate::correction::Corrector;
use crate::correlation;

/// Stamps the request's user and address onto log entries before they are
/// written.
///
/// Holds the user, address, and uid captured when the request started.
pub struct SetActorReceiver {
    user: User,
    remote_addr: Option<String>,
    dispatch_uid: DispatchUid,
    binding: Arc<AuditBinding>,
}

impl SetActorReceiver {
    /// Creates a receiver for one request.
    pub fn new(
        user: User,
        remote_addr: Option<String>,
        dispatch_uid: DispatchUid,
        binding: Arc<AuditBinding>,
    ) -> Self {
        Self {
            user,
            remote_addr,
            dispatch_uid,
            binding,
        }
    }
}

impl fmt::Debug for SetActorReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetActorReceiver")
            .field("user", &self.user.username)
            .field("remote_addr", &self.remote_addr)
            .field("dispatch_uid", &self.dispatch_uid)
            .finish()
    }
}

#[async_trait]
impl Receiver for SetActorReceiver {
    async fn receive(&self, event: &mut SignalEvent<'_>) -> AppResult<()> {
        // Registrations that outlived their request, or belong to another
        // request, stay silent.
        if !correlation::is_current(&event.dispatch_uid) {
            trace!(
                dispatch_uid = %event.dispatch_uid,
                "Receiver fired outside its request, ignoring"
            );
            return Ok(());
        }

        let Some(entry) = event.instance.downcast_mut::<LogEntry>() else {
            return Ok(());
        };

        let user_kind = self.binding.user_kind();
        if self.user.content_type == user_kind && entry.actor.is_none() {
            entry.actor = Some(self.user.clone());
        }
        entry.remote_addr = self.remote_addr.clone();

        debug!(
            entry_id = %entry.id,
            actor = ?entry.actor.as_ref().map(|u| &u.username),
            remote_addr = ?entry.remote_addr,
            "Log entry stamped"
        );

        let permission = self
            .binding
            .config
            .review_permission(&entry.content_type.model);
        // A deleted object has nothing left to correct.
        if entry.action != LogAction::Delete
            && self.binding.permissions.has_perm(&self.user, &permission)
        {
            Corrector::new(&self.binding)
                .apply(entry, &self.user, &event.dispatch_uid)
                .await?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        correlation::SET_ACTOR_RECEIVER
    }
}
