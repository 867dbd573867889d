//! Core types and traits for the abbr URL registry.
//!
//! This crate provides the domain types shared by the storage backend and
//! the HTTP gateway: validated short names, stored records, the expiry
//! parsing helper, and the [`UrlRegistry`] contract.

pub mod error;
pub mod expiry;
pub mod record;
pub mod registry;
pub mod short_name;

pub use error::{CoreError, StorageError};
pub use record::UrlRecord;
pub use registry::UrlRegistry;
pub use short_name::ShortName;
