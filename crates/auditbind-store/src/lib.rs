//! # auditbind-store
//!
//! Persistence collaborators:
//!
//! - [`ObjectStore`]: get/save/delete contract that fires model signals
//! - [`ModelRegistry`]: known record kinds, looked up by app label and name
//! - [`AuditRegistry`]: which kinds have their saves recorded as log
//!   entries, with scoped suspension
//! - [`MemoryStore`]: in-memory reference implementation

pub mod audit_registry;
pub mod diff;
pub mod memory;
pub mod model_registry;
pub mod traits;

pub use audit_registry::{AuditOptions, AuditRegistry, AuditSuspension};
pub use memory::MemoryStore;
pub use model_registry::ModelRegistry;
pub use traits::{DynObjectStore, EntryFilter, ObjectStore};
