//! # auditbind-api
//!
//! HTTP API for auditbind built on Axum.
//!
//! Serves record CRUD and the log entry review workflow. Every request
//! passes through bearer-token authentication and then the
//! [`AuditlogLayer`](auditbind_middleware::AuditlogLayer), so entries
//! created while handling it carry the caller and client address.

pub mod app;
pub mod directory;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
