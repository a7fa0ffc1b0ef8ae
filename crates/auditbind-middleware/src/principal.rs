//! The principal a request is made by.

use auditbind_entity::User;

/// Request extension describing who is calling.
///
/// Authentication middleware inserts this; a request without it is
/// treated as anonymous.
#[derive(Debug, Clone, Default)]
pub enum RequestUser {
    /// A user the host authenticated.
    Authenticated(User),
    /// No authenticated principal.
    #[default]
    Anonymous,
}

impl RequestUser {
    /// Returns the authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}
