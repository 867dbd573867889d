use abbr_core::error::StorageError;
use abbr_core::expiry;
use abbr_core::registry::{Result, UrlRegistry};
use abbr_core::{ShortName, UrlRecord};
use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Connection, Row, Sqlite, SqliteConnection};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

const SCHEMA: &str = include_str!("../ddl/sqlite/urls.sql");

/// Settings for opening the SQLite store.
#[derive(Debug, Clone, TypedBuilder)]
pub struct DatabaseConfig {
    /// Path of the database file. Created if missing.
    #[builder(setter(into))]
    path: PathBuf,
    #[builder(default = 5)]
    max_connections: u32,
    #[builder(default = Duration::from_secs(5))]
    acquire_timeout: Duration,
}

/// Handle to the SQLite store: a connection pool plus the schema script.
///
/// Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Creates a database from an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (and creates if needed) the database file described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        debug!(path = %config.path.display(), "opened sqlite database");
        Ok(Self::new(pool))
    }

    /// Opens a private in-memory database.
    ///
    /// The pool is pinned to a single connection that never idles out, since
    /// every SQLite in-memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Self::new(pool))
    }

    /// Runs the schema script. Safe to repeat on an initialized store.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        info!("initialized database schema");
        Ok(())
    }

    /// Acquires a scoped handle for one unit of work, usually one request.
    pub async fn session(&self) -> Result<Session> {
        let conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        trace!("acquired database session");
        Ok(Session { conn })
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection. Outstanding sessions finish first.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// A request-scoped connection to the store.
///
/// The connection returns to the pool when the session is dropped, so every
/// exit path of the owning request releases it.
pub struct Session {
    conn: PoolConnection<Sqlite>,
}

impl Session {
    /// Direct access to the underlying connection.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Ends the session and hands the connection back to the pool.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        trace!("released database session");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

fn parse_expiry(raw: Option<&str>) -> Result<Option<Timestamp>> {
    raw.map(|value| {
        expiry::to_timestamp(value).map_err(|e| StorageError::InvalidData(e.to_string()))
    })
    .transpose()
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

async fn delete_rows(conn: &mut SqliteConnection, name: &ShortName) -> Result<u64> {
    let result = sqlx::query("DELETE FROM urls WHERE name = ?")
        .bind(name.as_str())
        .execute(conn)
        .await
        .map_err(map_sqlx_error)?;

    Ok(result.rows_affected())
}

#[async_trait]
impl UrlRegistry for Session {
    async fn lookup_at(&mut self, name: &ShortName, now: Timestamp) -> Result<Option<String>> {
        // take the write lock up front so the purge never has to upgrade a
        // read transaction, which SQLite refuses with SQLITE_BUSY
        let mut tx = self
            .conn
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(map_sqlx_error)?;

        let rows = sqlx::query("SELECT url, expiry FROM urls WHERE name = ?")
            .bind(name.as_str())
            .fetch_all(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let url = match rows.as_slice() {
            [] => {
                trace!(name = %name, "short name not found");
                None
            }
            [row] => {
                let url: String = row.try_get("url").map_err(map_sqlx_error)?;
                let raw_expiry: Option<String> = row.try_get("expiry").map_err(map_sqlx_error)?;

                match parse_expiry(raw_expiry.as_deref())? {
                    Some(expires_at) if expiry::is_expired(expires_at, now) => {
                        delete_rows(&mut tx, name).await?;
                        debug!(name = %name, %expires_at, "purged expired record");
                        None
                    }
                    _ => Some(url),
                }
            }
            _ => {
                let purged = delete_rows(&mut tx, name).await?;
                warn!(name = %name, purged, "purged duplicate records");
                None
            }
        };

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(url)
    }

    async fn insert(&mut self, name: &ShortName, record: UrlRecord) -> Result<()> {
        let stored_expiry = record.expiry.map(expiry::to_stored);

        sqlx::query("INSERT INTO urls (name, url, expiry) VALUES (?, ?, ?)")
            .bind(name.as_str())
            .bind(record.url)
            .bind(stored_expiry)
            .execute(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        debug!(name = %name, "inserted record");
        Ok(())
    }

    async fn delete(&mut self, name: &ShortName) -> Result<bool> {
        let removed = delete_rows(&mut self.conn, name).await?;
        debug!(name = %name, removed, "deleted records");
        Ok(removed > 0)
    }
}
