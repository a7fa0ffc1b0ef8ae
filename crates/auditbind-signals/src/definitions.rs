//! Signal points, dispatch uids, and the event handed to receivers.

use std::fmt;

use chrono::{DateTime, Utc};

use auditbind_core::types::{ContentType, RequestId};
use auditbind_entity::Model;

/// Points in a record's persistence lifecycle at which receivers run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Fired before a record is written. Receivers may mutate it.
    PreSave,
    /// Fired after a record is written.
    PostSave,
    /// Fired before a record is removed.
    PreDelete,
    /// Fired after a record is removed.
    PostDelete,
}

impl Signal {
    /// Returns the string name of this signal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreSave => "pre_save",
            Self::PostSave => "post_save",
            Self::PreDelete => "pre_delete",
            Self::PostDelete => "post_delete",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Disambiguator for one receiver registration.
///
/// Combines the registering component's name with a v7 request id and the
/// instant the uid was issued. Two uids are equal only if all three match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchUid {
    /// Name of the component that owns the registration.
    pub receiver: &'static str,
    /// Per-request identifier.
    pub request_id: RequestId,
    /// When the uid was issued.
    pub issued_at: DateTime<Utc>,
}

impl DispatchUid {
    /// Issues a fresh uid for `receiver`.
    pub fn issue(receiver: &'static str) -> Self {
        Self {
            receiver,
            request_id: RequestId::new(),
            issued_at: Utc::now(),
        }
    }
}

impl fmt::Display for DispatchUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}@{}",
            self.receiver,
            self.request_id,
            self.issued_at.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
        )
    }
}

/// What a receiver sees when its signal fires.
#[derive(Debug)]
pub struct SignalEvent<'a> {
    /// The signal being sent.
    pub signal: Signal,
    /// Kind of the record the signal was sent for.
    pub sender: ContentType,
    /// Uid the receiving registration was connected under.
    pub dispatch_uid: DispatchUid,
    /// The record being persisted.
    pub instance: &'a mut dyn Model,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_uids_differ() {
        let a = DispatchUid::issue("set_actor");
        let b = DispatchUid::issue("set_actor");
        assert_ne!(a, b);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_display_includes_receiver() {
        let uid = DispatchUid::issue("set_actor");
        assert!(uid.to_string().starts_with("set_actor:"));
    }
}
