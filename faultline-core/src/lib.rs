//! Core domain models for the Faultline error log
//!
//! This crate contains the error-event domain model, the log entry type,
//! and the canonical payload encoding shared by every Faultline storage
//! adapter.

pub mod entry;
pub mod error;
pub mod event;

pub use entry::LogEntry;
pub use error::{Error, Result};
pub use event::ErrorEvent;
