//! The error log adapter
//!
//! [`ErrorLog`] is the surface an error-monitoring host consumes: log one
//! error, fetch one entry by identifier, fetch one page of entries with a
//! total count. An adapter is bound to its (connection string,
//! application name) scope for its whole lifetime; the application name
//! partitions every write and read.
//!
//! # Examples
//!
//! ```rust,no_run
//! use faultline_core::ErrorEvent;
//! use faultline_storage::ErrorLog;
//!
//! # async fn run() -> faultline_storage::Result<()> {
//! let log = ErrorLog::connect_scoped("sqlite:errors.db", "billing").await?;
//!
//! let event = ErrorEvent::builder()
//!     .message("card declined by issuer")
//!     .status_code(402)
//!     .build()?;
//! let id = log.log(&event).await?;
//!
//! let entry = log.get_error(&id).await?.expect("just logged");
//! assert_eq!(entry.error.message, "card declined by issuer");
//! # Ok(())
//! # }
//! ```

use crate::backend::{ErrorBackend, ErrorRecord};
use crate::config::{LogOptions, SettingsRegistry};
use crate::error::{Error, Result};
use crate::sqlite::SqliteBackend;
use faultline_core::{ErrorEvent, LogEntry};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One page of log entries plus the total match count
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPage {
    /// Entries in the order the backing store returned them
    pub entries: Vec<LogEntry>,
    /// Count of ALL matching records across every page, independent of
    /// how many entries this page holds
    pub total: i64,
}

/// Error log adapter over a backing store
///
/// Holds no mutable state beyond its immutable scope; one instance may be
/// shared across tasks, each operation acquiring its own connection.
pub struct ErrorLog {
    backend: Arc<dyn ErrorBackend>,
    connection_string: String,
    application: String,
}

impl std::fmt::Debug for ErrorLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorLog")
            .field("connection_string", &self.connection_string)
            .field("application", &self.application)
            .finish_non_exhaustive()
    }
}

impl ErrorLog {
    /// Connect to a SQLite error log with an empty application scope
    pub async fn connect(connection_string: &str) -> Result<Self> {
        Self::connect_scoped(connection_string, "").await
    }

    /// Connect to a SQLite error log scoped to one application
    pub async fn connect_scoped(connection_string: &str, application: &str) -> Result<Self> {
        if connection_string.is_empty() {
            return Err(Error::invalid_argument("Connection string cannot be empty"));
        }

        let backend = SqliteBackend::connect(connection_string).await?;
        Ok(Self::with_backend(
            Arc::new(backend),
            connection_string,
            application,
        ))
    }

    /// Construct from host-provided options
    ///
    /// Resolves the connection string per [`LogOptions`] and takes the
    /// application scope from `applicationName`, defaulting to empty. An
    /// empty resolution is a fatal configuration error, never a generic
    /// argument error.
    pub async fn from_options(
        options: &LogOptions,
        registry: &dyn SettingsRegistry,
    ) -> Result<Self> {
        let connection_string = options
            .resolve_connection_string(registry)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                Error::configuration("Connection string is missing for the error log")
            })?;
        let application = options.application_name.clone().unwrap_or_default();

        let backend = SqliteBackend::connect(&connection_string).await?;
        Ok(Self::with_backend(
            Arc::new(backend),
            &connection_string,
            &application,
        ))
    }

    /// Construct over an already-built backend
    ///
    /// The seam that keeps the store technology swappable: adapter logic
    /// never depends on anything beyond the three backend routines.
    pub fn with_backend(
        backend: Arc<dyn ErrorBackend>,
        connection_string: &str,
        application: &str,
    ) -> Self {
        Self {
            backend,
            connection_string: connection_string.to_string(),
            application: application.to_string(),
        }
    }

    /// Display name of this error log implementation
    pub fn name(&self) -> &'static str {
        self.backend.name()
    }

    /// The connection string the log was constructed with
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// The application scope of this log
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Log an error, returning the store-assigned identifier
    ///
    /// Generates a fresh identifier per call: logging equal events twice
    /// creates two distinct records with two distinct identifiers.
    pub async fn log(&self, event: &ErrorEvent) -> Result<String> {
        let payload = event.to_json()?;
        let id = Uuid::new_v4();

        // The adapter's own scope is the partition column, whatever the
        // event itself claims as its application.
        let record = ErrorRecord {
            id,
            application: self.application.clone(),
            host: event.host.clone(),
            kind: event.kind.clone(),
            source: event.source.clone(),
            message: event.message.clone(),
            user: event.user.clone(),
            status_code: event.status_code,
            time_utc: event.time_utc,
        };

        self.backend.insert_error(&record, &payload).await?;

        info!(
            "Logged error {} for application '{}'",
            id, self.application
        );
        Ok(id.to_string())
    }

    /// Fetch a single entry by identifier, or `None` if it does not exist
    pub async fn get_error(&self, id: &str) -> Result<Option<LogEntry>> {
        if id.is_empty() {
            return Err(Error::invalid_argument("Error identifier cannot be empty"));
        }

        let parsed_id = Uuid::parse_str(id).map_err(|source| Error::MalformedId {
            id: id.to_string(),
            source,
        })?;

        let payload = self
            .backend
            .fetch_error_payload(&self.application, parsed_id)
            .await?;

        match payload {
            Some(payload) => {
                let error = ErrorEvent::from_json(&payload)?;
                Ok(Some(LogEntry::new(parsed_id, self.backend.name(), error)))
            }
            None => Ok(None),
        }
    }

    /// Fetch a page of entries in descending logged-time order
    ///
    /// `total` in the returned page counts every matching record, so a
    /// past-the-end page comes back empty while still reporting the full
    /// count.
    pub async fn get_errors(&self, page_index: i64, page_size: i64) -> Result<ErrorPage> {
        if page_index < 0 {
            return Err(Error::invalid_argument("Page index cannot be negative"));
        }
        if page_size < 0 {
            return Err(Error::invalid_argument("Page size cannot be negative"));
        }

        let (records, total) = self
            .backend
            .fetch_error_page(&self.application, page_index, page_size)
            .await?;

        let entries = records
            .into_iter()
            .map(|record| {
                // The page carries the indexed columns only; full detail
                // and server variables travel in the payload and are not
                // materialized on this path.
                let error = ErrorEvent {
                    application: record.application,
                    host: record.host,
                    kind: record.kind,
                    source: record.source,
                    message: record.message,
                    user: record.user,
                    status_code: record.status_code,
                    time_utc: record.time_utc,
                    detail: String::new(),
                    server_variables: BTreeMap::new(),
                };
                LogEntry::new(record.id, self.backend.name(), error)
            })
            .collect();

        Ok(ErrorPage { entries, total })
    }
}
