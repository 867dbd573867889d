use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A URL registered under a short name.
///
/// The short name itself is the storage key and travels beside the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The redirect target.
    pub url: String,
    /// When the record expires, if ever.
    pub expiry: Option<Timestamp>,
}

impl UrlRecord {
    /// A record that never expires.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            expiry: None,
        }
    }

    /// Sets the expiry of this record.
    pub fn with_expiry(mut self, expiry: Timestamp) -> Self {
        self.expiry = Some(expiry);
        self
    }
}
