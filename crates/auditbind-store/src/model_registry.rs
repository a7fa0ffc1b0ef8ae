//! Known record kinds.

use dashmap::DashSet;
use tracing::info;

use auditbind_core::error::AppError;
use auditbind_core::result::AppResult;
use auditbind_core::types::ContentType;

/// Registry of record kinds the application knows about.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    kinds: DashSet<ContentType>,
}

impl ModelRegistry {
    /// Creates a registry holding the built-in kinds (`auth.user` and log
    /// entries).
    pub fn new() -> Self {
        let registry = Self::default();
        registry.kinds.insert(ContentType::default_user());
        registry.kinds.insert(ContentType::log_entry());
        registry
    }

    /// Registers a kind. Registering twice is harmless.
    pub fn register_model(&self, content_type: ContentType) {
        if self.kinds.insert(content_type.clone()) {
            info!(model = %content_type, "Model registered");
        }
    }

    /// Looks a kind up by app label and (case-insensitive) model name.
    pub fn lookup(&self, app_label: &str, model: &str) -> AppResult<ContentType> {
        let content_type = ContentType::new(app_label, model);
        if self.kinds.contains(&content_type) {
            Ok(content_type)
        } else {
            Err(AppError::not_found(format!(
                "App '{app_label}' doesn't have a '{model}' model"
            )))
        }
    }

    /// Looks a kind up from an `app_label.Model` reference.
    pub fn lookup_reference(&self, reference: &str) -> AppResult<ContentType> {
        let parsed = ContentType::parse(reference)?;
        self.lookup(&parsed.app_label, &parsed.model)
    }
}
