//! Shared value types.

pub mod content_type;
pub mod id;

pub use content_type::ContentType;
pub use id::{EntryId, RequestId, UserId};
