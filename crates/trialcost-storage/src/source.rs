// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`RowSource`] trait.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Number, Value};
use tracing::{debug, info};

use rusqlite::types::{Type, ValueRef};
use trialcost_config::model::DatabaseConfig;
use trialcost_core::{QueryOutcome, Row, RowSource, TrialCostError};

use crate::database::{Database, map_tr_err};

/// Row source that runs queries against a read-only SQLite connection.
///
/// The plan lookup (when enabled) and the query itself are timed together,
/// so `execution_time` covers everything the database did for the fetch.
pub struct SqliteRowSource {
    db: Database,
    explain_plan: bool,
}

impl SqliteRowSource {
    /// Open the database named in `config` and switch it to query-only mode.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, TrialCostError> {
        let db = Database::open(&config.path).await?;
        Self::from_database(db, config.explain_plan).await
    }

    /// Wrap an already open database. Writes are disabled from here on.
    pub async fn from_database(db: Database, explain_plan: bool) -> Result<Self, TrialCostError> {
        db.set_query_only(true).await?;
        Ok(Self { db, explain_plan })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl RowSource for SqliteRowSource {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn fetch(&self, query: &str) -> Result<QueryOutcome, TrialCostError> {
        let sql = query.to_string();
        let explain = self.explain_plan;

        let started = Instant::now();
        let (plan, rows) = self
            .db
            .connection()
            .call(move |conn| -> Result<(Vec<String>, Vec<Row>), rusqlite::Error> {
                let plan = if explain {
                    query_plan(conn, &sql)?
                } else {
                    Vec::new()
                };
                let rows = query_rows(conn, &sql)?;
                Ok((plan, rows))
            })
            .await
            .map_err(map_tr_err)?;
        let execution_time = started.elapsed();

        for step in &plan {
            debug!(path = self.db.path(), step = %step, "query plan");
        }
        info!(
            path = self.db.path(),
            rows = rows.len(),
            elapsed_ms = execution_time.as_secs_f64() * 1000.0,
            "query executed"
        );

        Ok(QueryOutcome::new(rows, execution_time))
    }
}

/// `detail` column of each `EXPLAIN QUERY PLAN` step.
fn query_plan(conn: &rusqlite::Connection, sql: &str) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("EXPLAIN QUERY PLAN {sql}"))?;
    let steps = stmt
        .query_map([], |row| row.get::<_, String>(3))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(steps)
}

fn query_rows(conn: &rusqlite::Connection, sql: &str) -> Result<Vec<Row>, rusqlite::Error> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Row::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            record.insert(name.clone(), column_value(idx, name, row.get_ref(idx)?)?);
        }
        out.push(record);
    }
    Ok(out)
}

/// Map a SQLite value onto JSON.
///
/// Non-finite reals become `null` and blobs become lowercase hex. TEXT that
/// is not valid UTF-8 is an error naming the column.
fn column_value(idx: usize, name: &str, value: ValueRef<'_>) -> Result<Value, rusqlite::Error> {
    let value = match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::String(text.to_string()),
            Err(e) => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    Type::Text,
                    format!("column `{name}` is not valid UTF-8: {e}").into(),
                ));
            }
        },
        ValueRef::Blob(bytes) => Value::String(hex::encode(bytes)),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn seeded_source(explain_plan: bool) -> SqliteRowSource {
        let db = Database::open_in_memory().await.unwrap();
        db.execute_batch(
            "CREATE TABLE opinions (
                id INTEGER PRIMARY KEY,
                court TEXT NOT NULL,
                score REAL,
                digest BLOB,
                summary TEXT
            );
            INSERT INTO opinions VALUES (1, 'Ninth Circuit', 0.75, x'00ff10', NULL);
            INSERT INTO opinions VALUES (2, 'Cour d''appel', NULL, NULL, 'Arrêt confirmé');",
        )
        .await
        .unwrap();
        SqliteRowSource::from_database(db, explain_plan).await.unwrap()
    }

    #[test]
    fn column_values_map_to_json() {
        let value = |v| column_value(0, "c", v).unwrap();
        assert_eq!(value(ValueRef::Null), Value::Null);
        assert_eq!(value(ValueRef::Integer(-7)), json!(-7));
        assert_eq!(value(ValueRef::Real(1.5)), json!(1.5));
        assert_eq!(value(ValueRef::Real(f64::NAN)), Value::Null);
        assert_eq!(value(ValueRef::Text(b"plaintiff")), json!("plaintiff"));
        assert_eq!(value(ValueRef::Blob(&[0xde, 0xad])), json!("dead"));
    }

    #[test]
    fn invalid_utf8_text_names_the_column() {
        let err = column_value(2, "holding", ValueRef::Text(&[0x61, 0xff])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("holding"), "{message}");
        assert!(matches!(
            err,
            rusqlite::Error::FromSqlConversionFailure(2, Type::Text, _)
        ));
    }

    #[tokio::test]
    async fn invalid_utf8_text_fails_the_fetch() {
        let source = seeded_source(false).await;
        let err = source
            .fetch("SELECT id, CAST(x'61ff' AS TEXT) AS holding FROM opinions")
            .await
            .unwrap_err();
        assert!(matches!(err, TrialCostError::Storage { .. }));
        assert!(err.to_string().contains("holding"));
    }

    #[tokio::test]
    async fn fetch_returns_rows_in_column_order() {
        let source = seeded_source(true).await;
        let outcome = source
            .fetch("SELECT id, court, score, digest, summary FROM opinions ORDER BY id")
            .await
            .unwrap();

        assert_eq!(outcome.rows.len(), 2);
        let first = &outcome.rows[0];
        let keys: Vec<&str> = first.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "court", "score", "digest", "summary"]);
        assert_eq!(Value::Object(first.clone()), json!({
            "id": 1,
            "court": "Ninth Circuit",
            "score": 0.75,
            "digest": "00ff10",
            "summary": null
        }));
        assert_eq!(outcome.rows[1]["summary"], json!("Arrêt confirmé"));
        assert!(outcome.execution_time_seconds() >= 0.0);
    }

    #[tokio::test]
    async fn aliases_name_the_columns() {
        let source = seeded_source(false).await;
        let outcome = source
            .fetch("SELECT court AS venue, COUNT(*) AS n FROM opinions GROUP BY court ORDER BY court")
            .await
            .unwrap();
        assert_eq!(
            Value::Object(outcome.rows[0].clone()),
            json!({"venue": "Cour d'appel", "n": 1})
        );
    }

    #[tokio::test]
    async fn empty_result_is_not_an_error() {
        let source = seeded_source(true).await;
        let outcome = source
            .fetch("SELECT * FROM opinions WHERE id > 100")
            .await
            .unwrap();
        assert!(outcome.rows.is_empty());
    }

    #[tokio::test]
    async fn invalid_sql_is_a_storage_error() {
        let source = seeded_source(true).await;
        let err = source.fetch("SELECT * FROM missing_table").await.unwrap_err();
        assert!(matches!(err, TrialCostError::Storage { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn writes_are_rejected() {
        let source = seeded_source(false).await;
        let err = source
            .fetch("DELETE FROM opinions")
            .await
            .unwrap_err();
        assert!(matches!(err, TrialCostError::Storage { .. }));

        let outcome = source.fetch("SELECT id FROM opinions").await.unwrap();
        assert_eq!(outcome.rows.len(), 2);
    }

    #[tokio::test]
    async fn open_uses_database_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.db");
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE t (v TEXT); INSERT INTO t VALUES ('x');")
            .unwrap();

        let config = DatabaseConfig {
            path: path.to_string_lossy().into_owned(),
            explain_plan: true,
        };
        let source = SqliteRowSource::open(&config).await.unwrap();
        assert_eq!(source.name(), "sqlite");
        assert_eq!(source.database().path(), config.path);

        let outcome = source.fetch("SELECT v FROM t").await.unwrap();
        assert_eq!(outcome.rows[0]["v"], json!("x"));
    }
}
