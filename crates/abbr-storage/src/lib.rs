//! SQLite persistence for the abbr URL registry.
//!
//! [`Database`] owns the connection pool and the schema script. Each
//! request acquires its own [`Session`] through [`Database::session`] and
//! runs [`UrlRegistry`] operations on it; the connection goes back to the
//! pool when the session is dropped.

pub mod sqlite;

pub use abbr_core::registry::{Result, UrlRegistry};
pub use abbr_core::StorageError;
pub use sqlite::{Database, DatabaseConfig, Session};
