//! Generic audited records.

pub mod model;

pub use model::Record;
