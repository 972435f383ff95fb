//! SQLite datastore. The framework only owns the connection lifecycle.

use async_trait::async_trait;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::traits::Datastore;

pub struct SqliteDatastore {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl SqliteDatastore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: Mutex::new(None),
        }
    }

    /// Run `f` against the open connection
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StorageError> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| StorageError::Database("Connection lock poisoned".to_string()))?;
        let conn = guard.as_ref().ok_or(StorageError::NotConnected)?;
        f(conn).map_err(|e| StorageError::Database(e.to_string()))
    }

    fn open(&self) -> Result<Connection, StorageError> {
        let conn = if self.path.as_os_str() == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(&self.path)
        }
        .map_err(|e| StorageError::Database(format!("Failed to open {}: {}", self.path.display(), e)))?;

        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(conn)
    }
}

#[async_trait]
impl Datastore for SqliteDatastore {
    async fn connect(&self) -> Result<(), StorageError> {
        let conn = self.open()?;
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| StorageError::Database("Connection lock poisoned".to_string()))?;
        *guard = Some(conn);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), StorageError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| StorageError::Database("Connection lock poisoned".to_string()))?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| StorageError::Database(e.to_string()))?;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.conn.lock().map(|c| c.is_some()).unwrap_or(false)
    }
}
