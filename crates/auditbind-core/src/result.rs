//! Convenience result type alias for auditbind.

use crate::error::AppError;

/// A specialized `Result` type for auditbind operations.
pub type AppResult<T> = Result<T, AppError>;
