//! # auditbind-middleware
//!
//! Ties the user and client address of the request being handled to every
//! audit log entry saved while handling it.
//!
//! For each request the [`AuditlogLayer`] issues a fresh dispatch uid,
//! stores a [`RequestCorrelation`] in task-local storage for the duration
//! of the inner service future, and, for authenticated users only, connects
//! a [`SetActorReceiver`] to the `PreSave` signal of log entries under that
//! uid. The connection is a guard that disconnects on every way out of the
//! request: response, error, panic, or the future being dropped.
//!
//! Users holding `review_<model>` additionally apply an entry's pending
//! changes back onto the audited object (see [`correction`]).

pub mod binding;
pub mod correction;
pub mod correlation;
pub mod layer;
pub mod permission;
pub mod principal;
pub mod receiver;
pub mod remote_addr;

pub use binding::AuditBinding;
pub use correlation::RequestCorrelation;
pub use layer::{AuditlogLayer, AuditlogMiddleware};
pub use permission::{ModelBackend, PermissionChecker};
pub use principal::RequestUser;
pub use receiver::SetActorReceiver;
