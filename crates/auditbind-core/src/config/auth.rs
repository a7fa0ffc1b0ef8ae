//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Static API credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Users allowed to call the API, keyed by bearer token.
    #[serde(default)]
    pub users: Vec<StaticUserConfig>,
}

/// One bearer-token user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticUserConfig {
    /// Bearer token presented in the `Authorization` header.
    pub token: String,
    /// Login name.
    pub username: String,
    /// Model reference of the user's kind. Defaults to the audit user model.
    #[serde(default)]
    pub model: Option<String>,
    /// Whether the account is active.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Superusers implicitly hold every permission.
    #[serde(default)]
    pub is_superuser: bool,
    /// Explicitly granted permission names.
    #[serde(default)]
    pub permissions: Vec<String>,
}

fn default_true() -> bool {
    true
}
