//! HTTP request handlers.

pub mod entries;
pub mod health;
pub mod records;
