//! The backing-store protocol for error persistence
//!
//! An [`ErrorBackend`] implementation provides the three routines the
//! adapter depends on: insert one record, fetch one payload by
//! identifier, fetch one page plus the total matching count. The adapter
//! treats the backend as a black box, so swapping the store technology
//! never touches adapter logic.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The indexed columns of one persisted error
///
/// The serialized payload travels alongside on insert and is not
/// materialized on the page path.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub id: Uuid,
    pub application: String,
    pub host: String,
    pub kind: String,
    pub source: String,
    pub message: String,
    pub user: String,
    pub status_code: i32,
    pub time_utc: DateTime<Utc>,
}

/// Storage backend for error records
///
/// ## Scoping
///
/// Every routine filters by `application`, the mandatory partition key:
/// records written under one application are invisible to reads scoped to
/// another, including direct-identifier lookups.
///
/// ## Failure semantics
///
/// Backend failures propagate unchanged; implementations must not catch,
/// retry, or degrade to partial results. A page fetch either returns the
/// complete page plus count or fails entirely.
///
/// ## Thread safety
///
/// Implementations must be `Send + Sync` so one adapter instance can be
/// shared across tasks; each call acquires its own connection.
#[async_trait]
pub trait ErrorBackend: Send + Sync {
    /// Display label for entries produced through this backend
    fn name(&self) -> &'static str;

    /// Insert one error record together with its serialized payload
    async fn insert_error(&self, record: &ErrorRecord, payload: &str) -> Result<()>;

    /// Fetch the serialized payload of one record, scoped by application
    ///
    /// Returns `Ok(None)` when no such record exists.
    async fn fetch_error_payload(&self, application: &str, id: Uuid) -> Result<Option<String>>;

    /// Fetch one page of records in descending logged-time order
    ///
    /// Ordering is enforced here, not by the adapter. The second element
    /// of the pair is the count of ALL matching records across every
    /// page, independent of how many rows this page holds.
    async fn fetch_error_page(
        &self,
        application: &str,
        page_index: i64,
        page_size: i64,
    ) -> Result<(Vec<ErrorRecord>, i64)>;
}
