//! SQLite persistence for projects, data entries, external sources and their
//! parameters.
//!
//! The connection sits behind a mutex; each public method holds the lock for
//! one short statement or one transaction. Child rows are removed explicitly
//! before their parents since the schema declares no cascading deletes.
//! Foreign keys are not enforced: rows may name a project or source that
//! does not exist.
//!
//! Async callers go through [`Database::blocking`] so statements run on the
//! blocking pool instead of a runtime worker.

mod entries;
mod projects;
mod schema;
mod sources;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::task::{self, JoinError};
use tracing::info;

pub use entries::SearchHit;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection lock was poisoned")]
    Poisoned,

    #[error("database task failed: {0}")]
    Task(#[from] JoinError),
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and apply the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!(path = %path.display(), "Opening project database");
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// Private in-memory database, used by tests and throwaway runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        // The bundled SQLite build enforces foreign keys unless told otherwise.
        conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
        schema::apply(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `work` against the database on the blocking thread pool.
    pub async fn blocking<T, F>(self: &Arc<Self>, work: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(self);
        task::spawn_blocking(move || work(&db)).await?
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}
