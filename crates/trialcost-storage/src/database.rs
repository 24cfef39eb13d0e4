// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management.
//!
//! All statements run on tokio-rusqlite's single background thread.

use std::path::Path;

use tracing::debug;
use trialcost_core::TrialCostError;

/// Convert a tokio-rusqlite error into `TrialCostError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> TrialCostError {
    TrialCostError::Storage {
        source: Box::new(e),
    }
}

/// A SQLite connection plus the path it was opened from.
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: String,
}

impl Database {
    /// Open an existing database file.
    ///
    /// Unlike `sqlite3_open`, a missing file is an error rather than a new
    /// empty database.
    pub async fn open(path: &str) -> Result<Self, TrialCostError> {
        if !Path::new(path).is_file() {
            return Err(TrialCostError::Storage {
                source: format!("database file `{path}` does not exist").into(),
            });
        }
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| TrialCostError::Storage {
                source: Box::new(e),
            })?;
        debug!(path, "database opened");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, TrialCostError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| TrialCostError::Storage {
                source: Box::new(e),
            })?;
        Ok(Self {
            conn,
            path: ":memory:".to_string(),
        })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run one or more statements that return no rows.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), TrialCostError> {
        let sql = sql.to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(&sql)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Toggle `PRAGMA query_only`; while enabled every write fails.
    pub async fn set_query_only(&self, enabled: bool) -> Result<(), TrialCostError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.pragma_update(None, "query_only", enabled)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let err = Database::open(path.to_str().unwrap()).await.err().unwrap();
        assert!(err.to_string().contains("does not exist"));
        assert!(!path.exists(), "open must not create the file");
    }

    #[tokio::test]
    async fn opens_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.db");
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE cases (id INTEGER PRIMARY KEY);")
            .unwrap();

        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        assert_eq!(db.path(), path.to_str().unwrap());
    }

    #[tokio::test]
    async fn query_only_blocks_writes() {
        let db = Database::open_in_memory().await.unwrap();
        db.execute_batch("CREATE TABLE cases (id INTEGER);").await.unwrap();
        db.set_query_only(true).await.unwrap();

        let err = db
            .execute_batch("INSERT INTO cases VALUES (1);")
            .await
            .unwrap_err();
        assert!(matches!(err, TrialCostError::Storage { .. }));

        db.set_query_only(false).await.unwrap();
        db.execute_batch("INSERT INTO cases VALUES (1);").await.unwrap();
    }
}
