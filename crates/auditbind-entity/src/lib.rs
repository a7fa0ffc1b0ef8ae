//! # auditbind-entity
//!
//! Record types that flow through the object store and the signal bus.
//! Every persisted type implements [`Model`], which names its kind and
//! primary key and allows receivers to downcast a `&mut dyn Model` back
//! to the concrete record.

pub mod log_entry;
pub mod model;
pub mod record;
pub mod user;

pub use log_entry::{FieldChange, LogAction, LogEntry};
pub use model::Model;
pub use record::Record;
pub use user::User;
