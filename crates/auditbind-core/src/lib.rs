//! # auditbind-core
//!
//! Core crate for auditbind. Contains configuration schemas, typed
//! identifiers, the content-type reference used to name record kinds,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other auditbind crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
