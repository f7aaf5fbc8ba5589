//! Database module
//!
//! SQLite persistence for the plant manager's key/value store, and the
//! plant record models serialized into it.

pub mod models;
pub mod repository;

pub use models::*;
pub use repository::Repository;
