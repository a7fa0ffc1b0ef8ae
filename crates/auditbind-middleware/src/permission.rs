//! Permission checks.

use std::fmt;

use auditbind_entity::User;

/// Decides whether a user holds a named permission.
pub trait PermissionChecker: Send + Sync + fmt::Debug {
    /// Returns whether `user` holds `permission`.
    fn has_perm(&self, user: &User, permission: &str) -> bool;
}

/// Default backend: inactive users hold nothing, active superusers hold
/// everything, everyone else holds what was granted to them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelBackend;

impl PermissionChecker for ModelBackend {
    fn has_perm(&self, user: &User, permission: &str) -> bool {
        if !user.is_active {
            return false;
        }
        user.is_superuser || user.permissions.contains(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_permission() {
        let user = User::new("rev").with_permission("review_article");
        assert!(ModelBackend.has_perm(&user, "review_article"));
        assert!(!ModelBackend.has_perm(&user, "review_page"));
    }

    #[test]
    fn test_superuser_and_inactive() {
        let mut admin = User::new("admin").superuser();
        assert!(ModelBackend.has_perm(&admin, "review_anything"));

        admin.is_active = false;
        assert!(!ModelBackend.has_perm(&admin, "review_anything"));
    }
}
