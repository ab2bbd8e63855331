//! SQLite backend for error persistence

use crate::backend::{ErrorBackend, ErrorRecord};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

// The sequence rowid breaks ordering ties between records logged within
// the same timestamp.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS errors (
        sequence     INTEGER PRIMARY KEY AUTOINCREMENT,
        error_id     TEXT NOT NULL UNIQUE,
        application  TEXT NOT NULL,
        host         TEXT NOT NULL,
        kind         TEXT NOT NULL,
        source       TEXT NOT NULL,
        message      TEXT NOT NULL,
        user_name    TEXT NOT NULL,
        status_code  INTEGER NOT NULL,
        time_utc     TEXT NOT NULL,
        all_json     TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_errors_application_time
        ON errors (application, time_utc DESC, sequence DESC)",
];

/// SQLite implementation of the error backing store
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Connect to the database, creating the file and schema if needed
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to error log database: {}", url);

        let options = SqliteConnectOptions::from_str(url)
            .map_err(Error::Database)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        let backend = Self { pool };
        backend.apply_schema().await?;

        info!("Error log database ready");
        Ok(backend)
    }

    /// Create a backend over an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema
    pub async fn apply_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Parse an error record from database row data
    fn parse_record_from_row(&self, row: &SqliteRow) -> Result<ErrorRecord> {
        let id: String = row.try_get("error_id")?;
        let time_utc: String = row.try_get("time_utc")?;

        let parsed_id = Uuid::parse_str(&id)
            .map_err(|e| Error::Internal(anyhow::anyhow!("Invalid error UUID '{}': {}", id, e)))?;

        let parsed_time = DateTime::parse_from_rfc3339(&time_utc)
            .map_err(|e| {
                Error::Internal(anyhow::anyhow!(
                    "Failed to parse time_utc '{}': {}",
                    time_utc,
                    e
                ))
            })?
            .with_timezone(&Utc);

        Ok(ErrorRecord {
            id: parsed_id,
            application: row.try_get("application")?,
            host: row.try_get("host")?,
            kind: row.try_get("kind")?,
            source: row.try_get("source")?,
            message: row.try_get("message")?,
            user: row.try_get("user_name")?,
            status_code: row.try_get("status_code")?,
            time_utc: parsed_time,
        })
    }
}

#[async_trait]
impl ErrorBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "SQLite Error Log"
    }

    async fn insert_error(&self, record: &ErrorRecord, payload: &str) -> Result<()> {
        debug!(
            "Inserting error {} for application '{}'",
            record.id, record.application
        );

        // Fixed-width UTC text keeps the column lexicographically sortable.
        let time_utc = record
            .time_utc
            .to_rfc3339_opts(SecondsFormat::Micros, true);

        sqlx::query(
            "INSERT INTO errors
                (error_id, application, host, kind, source, message, user_name, status_code, time_utc, all_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(record.id.to_string())
        .bind(&record.application)
        .bind(&record.host)
        .bind(&record.kind)
        .bind(&record.source)
        .bind(&record.message)
        .bind(&record.user)
        .bind(record.status_code)
        .bind(time_utc)
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn fetch_error_payload(&self, application: &str, id: Uuid) -> Result<Option<String>> {
        debug!(
            "Fetching error {} for application '{}'",
            id, application
        );

        let row = sqlx::query(
            "SELECT all_json FROM errors WHERE application = ?1 AND error_id = ?2",
        )
        .bind(application)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => Ok(Some(row.try_get("all_json")?)),
            None => Ok(None),
        }
    }

    async fn fetch_error_page(
        &self,
        application: &str,
        page_index: i64,
        page_size: i64,
    ) -> Result<(Vec<ErrorRecord>, i64)> {
        debug!(
            "Fetching error page {} (size {}) for application '{}'",
            page_index, page_size, application
        );

        let rows = sqlx::query(
            "SELECT error_id, application, host, kind, source, message, user_name, status_code, time_utc
             FROM errors
             WHERE application = ?1
             ORDER BY time_utc DESC, sequence DESC
             LIMIT ?2 OFFSET ?3",
        )
        .bind(application)
        .bind(page_size)
        .bind(page_index * page_size)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(self.parse_record_from_row(row)?);
        }

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM errors WHERE application = ?1")
            .bind(application)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!("Found {} of {} errors", records.len(), total);
        Ok((records, total))
    }
}
