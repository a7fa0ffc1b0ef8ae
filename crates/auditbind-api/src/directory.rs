//! In-memory directory of API users keyed by bearer token.

use dashmap::DashMap;
use tracing::info;

use auditbind_core::config::auth::{AuthConfig, StaticUserConfig};
use auditbind_core::result::AppResult;
use auditbind_core::types::ContentType;
use auditbind_entity::User;

/// Bearer token → user.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: DashMap<String, User>,
}

impl UserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the directory from the configured static users.
    ///
    /// Users without an explicit model get `default_kind`. An explicit
    /// model reference that does not parse is a configuration error.
    pub fn from_config(config: &AuthConfig, default_kind: &ContentType) -> AppResult<Self> {
        let directory = Self::new();
        for entry in &config.users {
            let user = build_user(entry, default_kind)?;
            directory.insert(entry.token.clone(), user);
        }
        info!(count = directory.len(), "User directory loaded");
        Ok(directory)
    }

    /// Adds or replaces the user behind `token`.
    pub fn insert(&self, token: impl Into<String>, user: User) {
        self.users.insert(token.into(), user);
    }

    /// Looks up the user behind `token`.
    pub fn resolve(&self, token: &str) -> Option<User> {
        self.users.get(token).map(|entry| entry.value().clone())
    }

    /// Number of known tokens.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no tokens are known.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn build_user(entry: &StaticUserConfig, default_kind: &ContentType) -> AppResult<User> {
    let kind = match &entry.model {
        Some(reference) => ContentType::parse(reference)?,
        None => default_kind.clone(),
    };

    let mut user = User::new(entry.username.clone()).with_content_type(kind);
    user.is_active = entry.is_active;
    user.is_superuser = entry.is_superuser;
    user.permissions = entry.permissions.iter().cloned().collect();
    Ok(user)
}
