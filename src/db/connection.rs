//! Database connection management
//!
//! An r2d2 pool of SQLite connections backing the key-value stores.

use std::path::Path;
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags, Transaction};
use thiserror::Error;

use super::migrations;

/// Connections kept by a file-backed pool
const FILE_POOL_SIZE: u32 = 4;

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Per-connection settings for the file database
fn configure_file_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;",
    )
}

/// Pool of connections to the tracker database
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl Database {
    /// Open a pool on the database file at `path`, creating it if needed.
    /// Migrations are not applied; see `config::open_database`.
    pub fn new<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(configure_file_connection);

        let pool = Pool::builder().max_size(FILE_POOL_SIZE).build(manager)?;
        Ok(Self::from_pool(pool))
    }

    /// In-memory database with migrations applied.
    ///
    /// Every SQLite memory connection is its own database, so the pool holds
    /// exactly one. Release a pooled connection before the next call grabs one.
    pub fn in_memory() -> DbResult<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())?;

        let database = Self::from_pool(pool);
        database.with_conn(migrations::run_migrations)?;
        Ok(database)
    }

    fn from_pool(pool: Pool<SqliteConnectionManager>) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Get a connection from the pool
    pub fn get_conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Run a closure with a pooled connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.get_conn()?;
        f(&conn)
    }

    /// Run a closure inside one transaction. Commits on `Ok`; an `Err` drops
    /// the transaction, which rolls it back.
    pub fn with_transaction<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> DbResult<T>,
    {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::kv;

    #[test]
    fn test_in_memory_is_migrated() {
        let db = Database::in_memory().unwrap();
        let version = db.with_conn(migrations::get_schema_version).unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| kv::save(conn, "k", &vec![1, 2, 3])).unwrap();

        let result: DbResult<()> = db.with_transaction(|tx| {
            kv::remove(tx, "k")?;
            Err(serde_json::from_str::<i32>("oops").unwrap_err().into())
        });
        assert!(result.is_err());

        let kept: Vec<i32> = db.with_conn(|conn| kv::load(conn, "k")).unwrap();
        assert_eq!(kept, vec![1, 2, 3]);
    }
}
