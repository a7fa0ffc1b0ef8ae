//! Shared collaborators of request binding.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use auditbind_core::config::audit::AuditConfig;
use auditbind_core::result::AppResult;
use auditbind_core::types::ContentType;
use auditbind_signals::{ReceiverRegistration, Signal, SignalBus};
use auditbind_store::{AuditRegistry, DynObjectStore, ModelRegistry};

use crate::correlation::RequestCorrelation;
use crate::permission::PermissionChecker;
use crate::principal::RequestUser;
use crate::receiver::SetActorReceiver;

/// Everything a request's receiver needs, shared across requests.
#[derive(Debug)]
pub struct AuditBinding {
    /// Audit settings.
    pub config: AuditConfig,
    /// Bus receivers are connected to.
    pub bus: SignalBus,
    /// Store audited objects are resolved from and saved to.
    pub store: DynObjectStore,
    /// Known kinds.
    pub models: Arc<ModelRegistry>,
    /// Audited kinds.
    pub audit: Arc<AuditRegistry>,
    /// Permission backend.
    pub permissions: Arc<dyn PermissionChecker>,
}

impl AuditBinding {
    /// Resolves the configured user kind.
    ///
    /// A malformed or unknown reference falls back to the built-in
    /// `auth.user` kind.
    pub fn user_kind(&self) -> ContentType {
        self.models
            .lookup_reference(&self.config.user_model)
            .unwrap_or_else(|e| {
                warn!(
                    user_model = %self.config.user_model,
                    error = %e,
                    "Configured user model is unusable, falling back to auth.user"
                );
                ContentType::default_user()
            })
    }

    /// Connects a receiver for the correlation's user, if it has one.
    ///
    /// Anonymous correlations get no receiver and `Ok(None)`.
    pub fn connect(
        self: &Arc<Self>,
        correlation: &RequestCorrelation,
    ) -> AppResult<Option<ReceiverRegistration>> {
        let Some(user) = correlation.user.clone() else {
            debug!(
                dispatch_uid = %correlation.dispatch_uid,
                "Anonymous request, no receiver connected"
            );
            return Ok(None);
        };

        let receiver = SetActorReceiver::new(
            user,
            correlation.remote_addr.clone(),
            correlation.dispatch_uid.clone(),
            Arc::clone(self),
        );

        self.bus
            .connect(
                Signal::PreSave,
                ContentType::log_entry(),
                Arc::new(receiver),
                correlation.dispatch_uid.clone(),
            )
            .map(Some)
    }

    /// Runs `fut` bound to `user` and `remote_addr`.
    ///
    /// Entries saved by `fut` in the calling task are stamped; the receiver
    /// is disconnected before this returns, or when the returned future is
    /// dropped.
    pub async fn run<F: Future>(
        self: &Arc<Self>,
        user: RequestUser,
        remote_addr: Option<String>,
        fut: F,
    ) -> AppResult<F::Output> {
        let correlation = RequestCorrelation::new(user, remote_addr);
        let registration = self.connect(&correlation)?;
        let output = correlation.scope(fut).await;
        drop(registration);
        Ok(output)
    }
}
