//! Request-scoped correlation state.
//!
//! The correlation for the request being handled lives in task-local
//! storage, scoped around the handler future. Receivers run inline in the
//! task that saves the entry, so they see the correlation of exactly the
//! request that task is serving. Tasks spawned from a handler do not
//! inherit it.

use std::future::Future;

use auditbind_entity::User;
use auditbind_signals::DispatchUid;

use crate::principal::RequestUser;

/// Name dispatch uids are issued under.
pub const SET_ACTOR_RECEIVER: &str = "auditbind.set_actor";

tokio::task_local! {
    static CURRENT_REQUEST: RequestCorrelation;
}

/// Per-request state: correlation token, acting user, and client address.
#[derive(Debug, Clone)]
pub struct RequestCorrelation {
    /// Uid the request's receiver is connected under.
    pub dispatch_uid: DispatchUid,
    /// Authenticated user, if any.
    pub user: Option<User>,
    /// Originating client address.
    pub remote_addr: Option<String>,
}

impl RequestCorrelation {
    /// Starts a correlation with a freshly issued uid.
    pub fn new(user: RequestUser, remote_addr: Option<String>) -> Self {
        Self {
            dispatch_uid: DispatchUid::issue(SET_ACTOR_RECEIVER),
            user: user.user().cloned(),
            remote_addr,
        }
    }

    /// Runs `fut` with this correlation as the current one.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT_REQUEST.scope(self, fut).await
    }
}

/// Returns a copy of the current request's correlation.
pub fn current() -> Option<RequestCorrelation> {
    CURRENT_REQUEST.try_with(RequestCorrelation::clone).ok()
}

/// Returns whether `dispatch_uid` belongs to the request being handled.
pub fn is_current(dispatch_uid: &DispatchUid) -> bool {
    CURRENT_REQUEST
        .try_with(|current| &current.dispatch_uid == dispatch_uid)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_correlation_outside_scope() {
        assert!(current().is_none());
        assert!(!is_current(&DispatchUid::issue(SET_ACTOR_RECEIVER)));
    }

    #[tokio::test]
    async fn test_scope_exposes_correlation() {
        let correlation =
            RequestCorrelation::new(RequestUser::Anonymous, Some("203.0.113.5".into()));
        let uid = correlation.dispatch_uid.clone();

        let seen = correlation
            .scope(async {
                tokio::task::yield_now().await;
                current()
            })
            .await
            .expect("correlation in scope");

        assert_eq!(seen.dispatch_uid, uid);
        assert_eq!(seen.remote_addr.as_deref(), Some("203.0.113.5"));
        assert!(seen.user.is_none());
        assert!(current().is_none());
    }

    #[tokio::test]
    async fn test_spawned_tasks_do_not_inherit() {
        let correlation = RequestCorrelation::new(RequestUser::Anonymous, None);
        let inherited = correlation
            .scope(async { tokio::spawn(async { current().is_some() }).await.unwrap() })
            .await;
        assert!(!inherited);
    }
}
