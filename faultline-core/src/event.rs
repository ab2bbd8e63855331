//! Error-event domain model and payload encoding
//!
//! This module provides the core model for one captured application
//! error. An [`ErrorEvent`] carries the indexed fields every storage
//! adapter persists as columns, plus the full structured detail (stack
//! trace text, server variables) that only travels inside the serialized
//! payload.
//!
//! # Examples
//!
//! Capturing an error by hand:
//!
//! ```rust
//! use faultline_core::event::ErrorEvent;
//!
//! let event = ErrorEvent::builder()
//!     .application("billing")
//!     .host("web-01")
//!     .kind("PaymentDeclined")
//!     .source("billing::charge")
//!     .message("card declined by issuer")
//!     .user("acct-4411")
//!     .status_code(402)
//!     .build()
//!     .unwrap();
//! ```
//!
//! Capturing a Rust error value:
//!
//! ```rust
//! use faultline_core::event::ErrorEvent;
//!
//! let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
//! let event = ErrorEvent::from_error(&io_err);
//! assert_eq!(event.message, "disk full");
//! ```

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Represents one captured application error
///
/// Immutable once constructed; storage adapters never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEvent {
    /// Name of the monitored application the error belongs to
    pub application: String,
    /// Machine that produced the error
    pub host: String,
    /// Error type or category, e.g. the Rust type name of the error value
    pub kind: String,
    /// Originating source component
    pub source: String,
    /// Human-readable message, never empty
    pub message: String,
    /// Acting user, may be empty
    pub user: String,
    /// HTTP-style status code, 0 when not applicable
    pub status_code: i32,
    /// Capture time, always UTC
    pub time_utc: DateTime<Utc>,
    /// Full text detail such as a stack trace, may be empty
    pub detail: String,
    /// Captured environment of the failing request
    pub server_variables: BTreeMap<String, String>,
}

impl ErrorEvent {
    /// Create a builder for constructing an ErrorEvent
    pub fn builder() -> ErrorEventBuilder {
        ErrorEventBuilder::new()
    }

    /// Capture a Rust error value as an event
    ///
    /// Fills `kind` from the error's type name, `message` from its
    /// `Display` output, and `detail` from the chain of sources. The
    /// remaining fields take their defaults and can be filled in by the
    /// caller afterwards via struct update or at capture sites that know
    /// the application scope.
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        let mut detail = error.to_string();
        let mut cause = error.source();
        while let Some(inner) = cause {
            detail.push_str("\ncaused by: ");
            detail.push_str(&inner.to_string());
            cause = inner.source();
        }

        Self {
            application: String::new(),
            host: String::new(),
            kind: std::any::type_name::<E>().to_string(),
            source: String::new(),
            message: error.to_string(),
            user: String::new(),
            status_code: 0,
            time_utc: Utc::now(),
            detail,
            server_variables: BTreeMap::new(),
        }
    }

    /// Encode the event into its self-describing payload form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode an event from its payload form
    ///
    /// Exact inverse of [`ErrorEvent::to_json`]; round-trip fidelity is a
    /// correctness requirement for every storage adapter.
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Validate the error message
    fn validate_message(message: &str) -> Result<()> {
        if message.trim().is_empty() {
            return Err(Error::Validation {
                message: "Error message cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Validate the status code
    fn validate_status_code(status_code: i32) -> Result<()> {
        if status_code < 0 {
            return Err(Error::Validation {
                message: "Status code cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for constructing ErrorEvent instances with validation
#[derive(Debug, Clone)]
pub struct ErrorEventBuilder {
    application: String,
    host: String,
    kind: String,
    source: String,
    message: Option<String>,
    user: String,
    status_code: i32,
    time_utc: Option<DateTime<Utc>>,
    detail: String,
    server_variables: BTreeMap<String, String>,
}

impl ErrorEventBuilder {
    /// Create a new event builder
    pub fn new() -> Self {
        Self {
            application: String::new(),
            host: String::new(),
            kind: String::new(),
            source: String::new(),
            message: None,
            user: String::new(),
            status_code: 0,
            time_utc: None,
            detail: String::new(),
            server_variables: BTreeMap::new(),
        }
    }

    /// Set the application name
    pub fn application<S: Into<String>>(mut self, application: S) -> Self {
        self.application = application.into();
        self
    }

    /// Set the host name
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    /// Set the error type or category
    pub fn kind<S: Into<String>>(mut self, kind: S) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the originating source component
    pub fn source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = source.into();
        self
    }

    /// Set the error message
    pub fn message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the acting user
    pub fn user<S: Into<String>>(mut self, user: S) -> Self {
        self.user = user.into();
        self
    }

    /// Set the HTTP-style status code
    pub fn status_code(mut self, status_code: i32) -> Self {
        self.status_code = status_code;
        self
    }

    /// Set the capture time; defaults to now
    pub fn time_utc(mut self, time_utc: DateTime<Utc>) -> Self {
        self.time_utc = Some(time_utc);
        self
    }

    /// Set the full text detail
    pub fn detail<S: Into<String>>(mut self, detail: S) -> Self {
        self.detail = detail.into();
        self
    }

    /// Add a captured server variable
    pub fn server_variable<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.server_variables.insert(key.into(), value.into());
        self
    }

    /// Build the ErrorEvent instance
    pub fn build(self) -> Result<ErrorEvent> {
        let message = self.message.ok_or_else(|| Error::Validation {
            message: "Error message is required".to_string(),
        })?;

        ErrorEvent::validate_message(&message)?;
        ErrorEvent::validate_status_code(self.status_code)?;

        Ok(ErrorEvent {
            application: self.application,
            host: self.host,
            kind: self.kind,
            source: self.source,
            message,
            user: self.user,
            status_code: self.status_code,
            time_utc: self.time_utc.unwrap_or_else(Utc::now),
            detail: self.detail,
            server_variables: self.server_variables,
        })
    }
}

impl Default for ErrorEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> ErrorEvent {
        ErrorEvent::builder()
            .application("billing")
            .host("web-01")
            .kind("PaymentDeclined")
            .source("billing::charge")
            .message("card declined by issuer")
            .user("acct-4411")
            .status_code(402)
            .detail("stack frame 0\nstack frame 1")
            .server_variable("REQUEST_PATH", "/charge")
            .server_variable("REMOTE_ADDR", "10.0.0.7")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_populates_all_fields() {
        let event = sample_event();
        assert_eq!(event.application, "billing");
        assert_eq!(event.host, "web-01");
        assert_eq!(event.kind, "PaymentDeclined");
        assert_eq!(event.source, "billing::charge");
        assert_eq!(event.message, "card declined by issuer");
        assert_eq!(event.user, "acct-4411");
        assert_eq!(event.status_code, 402);
        assert_eq!(event.detail, "stack frame 0\nstack frame 1");
        assert_eq!(
            event.server_variables.get("REQUEST_PATH"),
            Some(&"/charge".to_string())
        );
    }

    #[test]
    fn test_builder_requires_message() {
        let result = ErrorEvent::builder().application("billing").build();
        assert!(result.is_err());
        assert!(result.unwrap_err().is_validation());

        let result = ErrorEvent::builder().message("   ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_negative_status_code() {
        let result = ErrorEvent::builder()
            .message("boom")
            .status_code(-1)
            .build();
        assert!(result.is_err());
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_builder_defaults() {
        let before = Utc::now();
        let event = ErrorEvent::builder().message("boom").build().unwrap();
        assert!(event.application.is_empty());
        assert!(event.host.is_empty());
        assert_eq!(event.status_code, 0);
        assert!(event.time_utc >= before);
        assert!(event.server_variables.is_empty());
    }

    #[test]
    fn test_payload_round_trip() {
        let event = sample_event();
        let payload = event.to_json().unwrap();
        let decoded = ErrorEvent::from_json(&payload).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_payload_decode_rejects_garbage() {
        let result = ErrorEvent::from_json("not a payload");
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().category(), "serialization");
    }

    #[derive(Debug)]
    struct ChargeError {
        cause: std::io::Error,
    }

    impl std::fmt::Display for ChargeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "charge failed")
        }
    }

    impl std::error::Error for ChargeError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.cause)
        }
    }

    #[test]
    fn test_from_error_captures_source_chain() {
        let outer = ChargeError {
            cause: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let event = ErrorEvent::from_error(&outer);

        assert_eq!(event.message, "charge failed");
        assert!(event.kind.contains("ChargeError"));
        assert!(event.detail.starts_with("charge failed"));
        assert!(event.detail.contains("caused by: disk full"));
        assert_eq!(event.status_code, 0);
    }
}
