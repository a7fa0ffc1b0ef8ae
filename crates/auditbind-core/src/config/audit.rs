//! Audit capture configuration.

use serde::{Deserialize, Serialize};

/// Settings for binding requests to audit log entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Reference to the user model in `app_label.Model` form.
    ///
    /// A malformed or unknown reference falls back to `auth.user`.
    #[serde(default = "default_user_model")]
    pub user_model: String,
    /// Prefix of the permission that lets a user review entries of a model.
    #[serde(default = "default_review_prefix")]
    pub review_permission_prefix: String,
    /// Header carrying the proxy chain of client addresses.
    #[serde(default = "default_forwarded_header")]
    pub forwarded_for_header: String,
    /// Models whose saves are recorded as log entries.
    #[serde(default)]
    pub models: Vec<AuditedModelConfig>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            user_model: default_user_model(),
            review_permission_prefix: default_review_prefix(),
            forwarded_for_header: default_forwarded_header(),
            models: Vec::new(),
        }
    }
}

impl AuditConfig {
    /// Permission name required to review entries of `model`.
    pub fn review_permission(&self, model: &str) -> String {
        format!("{}{}", self.review_permission_prefix, model)
    }
}

/// Registration of one audited model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditedModelConfig {
    /// Model reference in `app_label.Model` form.
    pub model: String,
    /// When non-empty, only these fields are tracked.
    #[serde(default)]
    pub include_fields: Vec<String>,
    /// Fields never tracked.
    #[serde(default)]
    pub exclude_fields: Vec<String>,
}

fn default_user_model() -> String {
    "auth.User".to_string()
}

fn default_review_prefix() -> String {
    "review_".to_string()
}

fn default_forwarded_header() -> String {
    "x-forwarded-for".to_string()
}
