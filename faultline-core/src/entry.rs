//! Log entry domain model

use crate::event::ErrorEvent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An error event paired with its store-assigned identifier
///
/// Entries are created only by storage adapters: on the read paths and on
/// a successful write. `source` names the log that produced the entry; it
/// is a display label for provenance, not an ownership relation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: Uuid,
    pub source: String,
    pub error: ErrorEvent,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new<S: Into<String>>(id: Uuid, source: S, error: ErrorEvent) -> Self {
        Self {
            id,
            source: source.into(),
            error,
        }
    }
}
