//! User principals.

pub mod model;

pub use model::User;
