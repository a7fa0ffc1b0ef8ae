//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tracing::info;

use auditbind_core::config::AppConfig;
use auditbind_core::result::AppResult;
use auditbind_core::types::ContentType;
use auditbind_middleware::{AuditBinding, ModelBackend};
use auditbind_signals::SignalBus;
use auditbind_store::{AuditOptions, AuditRegistry, MemoryStore, ModelRegistry};

use crate::directory::UserDirectory;

/// Shared application state available to all handlers via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Object store.
    pub store: Arc<MemoryStore>,
    /// Known kinds.
    pub models: Arc<ModelRegistry>,
    /// Request binding collaborators.
    pub binding: Arc<AuditBinding>,
    /// Bearer-token users.
    pub directory: Arc<UserDirectory>,
}

impl AppState {
    /// Wires the store, registries, and binding from configuration.
    ///
    /// Every configured audited model is also registered as a known kind.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let bus = SignalBus::new();
        let models = Arc::new(ModelRegistry::new());
        let audit = Arc::new(AuditRegistry::new());

        for model in &config.audit.models {
            let kind = ContentType::parse(&model.model)?;
            models.register_model(kind.clone());
            audit.register(
                kind,
                AuditOptions {
                    include_fields: model.include_fields.clone(),
                    exclude_fields: model.exclude_fields.clone(),
                },
            );
        }

        let store = Arc::new(MemoryStore::new(bus.clone(), Arc::clone(&audit)));
        let binding = Arc::new(AuditBinding {
            config: config.audit.clone(),
            bus,
            store: store.clone(),
            models: Arc::clone(&models),
            audit,
            permissions: Arc::new(ModelBackend),
        });

        let directory = Arc::new(UserDirectory::from_config(
            &config.auth,
            &binding.user_kind(),
        )?);

        info!(
            audited_models = config.audit.models.len(),
            users = directory.len(),
            "Application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            models,
            binding,
            directory,
        })
    }
}
