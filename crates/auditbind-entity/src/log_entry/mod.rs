//! Audit log entries.

pub mod action;
pub mod model;

pub use action::LogAction;
pub use model::{FieldChange, LogEntry};
