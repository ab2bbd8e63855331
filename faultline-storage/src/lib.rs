//! SQLite persistence for the Faultline error log
//!
//! This crate provides the storage adapter consumed by an error-monitoring
//! host: connection-option resolution, the narrow backing-store protocol,
//! the SQLite backend, and the [`ErrorLog`] adapter exposing the write,
//! single-read, and paged-read operations.

pub mod backend;
pub mod config;
pub mod error;
pub mod log;
pub mod sqlite;

pub use backend::{ErrorBackend, ErrorRecord};
pub use config::{LogOptions, MemoryRegistry, SettingsRegistry};
pub use error::{Error, Result};
pub use log::{ErrorLog, ErrorPage};
pub use sqlite::SqliteBackend;

/// Re-export core types for convenience
pub use faultline_core as core;
