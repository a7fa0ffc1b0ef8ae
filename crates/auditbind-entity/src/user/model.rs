//! User entity model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use auditbind_core::types::{ContentType, UserId};

use crate::impl_model_any;
use crate::model::Model;

/// An authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Kind of user model this principal is an instance of.
    pub content_type: ContentType,
    /// Inactive users hold no permissions.
    pub is_active: bool,
    /// Active superusers hold every permission.
    pub is_superuser: bool,
    /// Explicitly granted permission names.
    pub permissions: BTreeSet<String>,
}

impl User {
    /// Creates an active, non-superuser principal of the built-in user kind.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            content_type: ContentType::default_user(),
            is_active: true,
            is_superuser: false,
            permissions: BTreeSet::new(),
        }
    }

    /// Sets the user model kind.
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Grants a permission.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Marks the user as a superuser.
    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }
}

impl Model for User {
    fn content_type(&self) -> ContentType {
        self.content_type.clone()
    }

    fn pk(&self) -> String {
        self.id.to_string()
    }

    fn repr(&self) -> String {
        self.username.clone()
    }

    impl_model_any!();
}
