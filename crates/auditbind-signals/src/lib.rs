//! # auditbind-signals
//!
//! Model signal bus. Provides:
//!
//! - Signal definitions (`PreSave`, `PostSave`, `PreDelete`, `PostDelete`)
//! - Receiver registry keyed by signal, sender kind, and dispatch uid
//! - RAII registrations that disconnect their receiver when dropped
//! - A dispatcher that awaits receivers inline, in registration order,
//!   and surfaces the first receiver error

pub mod definitions;
pub mod dispatcher;
pub mod registry;

pub use definitions::{DispatchUid, Signal, SignalEvent};
pub use dispatcher::SignalBus;
pub use registry::{Receiver, ReceiverKey, ReceiverRegistration, SignalRegistry};
