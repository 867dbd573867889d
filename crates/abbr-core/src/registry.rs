use crate::error::StorageError;
use crate::record::UrlRecord;
use crate::short_name::ShortName;
use async_trait::async_trait;
use jiff::Timestamp;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Operations on the URL table, performed through one scoped store handle.
///
/// Implementors are request-scoped handles: the caller acquires one, passes
/// it to each operation, and drops it when the request is done. Every
/// mutating operation commits its own work before returning.
#[async_trait]
pub trait UrlRegistry: Send {
    /// Resolves `name` to its URL as of `now`.
    ///
    /// Returns `None` when no row exists, when the single row has an expiry
    /// strictly earlier than `now`, or when more than one row carries the
    /// name. The last two cases delete the offending rows, so this read can
    /// write.
    async fn lookup_at(&mut self, name: &ShortName, now: Timestamp) -> Result<Option<String>>;

    /// Resolves `name` against the current time. See [`UrlRegistry::lookup_at`].
    async fn lookup(&mut self, name: &ShortName) -> Result<Option<String>> {
        self.lookup_at(name, Timestamp::now()).await
    }

    /// Inserts a row for `name` and commits it.
    ///
    /// No uniqueness check is made; callers that need one should `lookup`
    /// first. Duplicates that slip through are purged on the next lookup.
    async fn insert(&mut self, name: &ShortName, record: UrlRecord) -> Result<()>;

    /// Deletes every row for `name` and commits.
    /// Returns `true` if at least one row was removed.
    async fn delete(&mut self, name: &ShortName) -> Result<bool>;
}
