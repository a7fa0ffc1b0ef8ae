//! Record-kind references in `app_label.model` form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Names a kind of persisted record.
///
/// The model name is always stored lower-cased so that `auth.User` and
/// `auth.user` refer to the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentType {
    /// Application the model belongs to.
    pub app_label: String,
    /// Lower-cased model name.
    pub model: String,
}

impl ContentType {
    /// Creates a content type, normalising the model name.
    pub fn new(app_label: impl Into<String>, model: impl AsRef<str>) -> Self {
        Self {
            app_label: app_label.into(),
            model: model.as_ref().to_lowercase(),
        }
    }

    /// Parses an `"app_label.Model"` reference.
    ///
    /// Exactly two non-empty dot-separated parts are required.
    pub fn parse(reference: &str) -> Result<Self, AppError> {
        let mut parts = reference.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(app), Some(model), None) if !app.is_empty() && !model.is_empty() => {
                Ok(Self::new(app, model))
            }
            _ => Err(AppError::configuration(format!(
                "Model reference must be of the form 'app_label.model_name', got '{reference}'"
            ))),
        }
    }

    /// Built-in user kind used when no valid user model is configured.
    pub fn default_user() -> Self {
        Self::new("auth", "user")
    }

    /// Kind of audit log entries.
    pub fn log_entry() -> Self {
        Self::new("auditbind", "logentry")
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_label, self.model)
    }
}
