//! Error types for storage operations

use thiserror::Error;

/// Storage layer error type
///
/// A missing record is never an error: the single-record read path
/// returns `Ok(None)` for an unknown identifier.
#[derive(Error, Debug)]
pub enum Error {
    /// Construction-time misconfiguration; the adapter is never usable in
    /// this state.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A caller mistake rejected before any backing-store interaction.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An identifier that is not a well-formed UUID, carrying the parse
    /// failure detail. Distinct from both invalid-argument and not-found.
    #[error("Malformed error identifier {id:?}: {source}")]
    MalformedId {
        id: String,
        #[source]
        source: uuid::Error,
    },

    /// Backing-store failure, propagated unchanged from the driver.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Core domain error: {0}")]
    Core(#[from] faultline_core::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this error is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Check if this error is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }

    /// Check if this error is a malformed-identifier error
    pub fn is_malformed_id(&self) -> bool {
        matches!(self, Error::MalformedId { .. })
    }
}

/// Convenience result type for storage operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_predicates() {
        let config_err = Error::configuration("connection string is missing");
        assert!(config_err.is_configuration());
        assert!(!config_err.is_invalid_argument());

        let arg_err = Error::invalid_argument("page index cannot be negative");
        assert!(arg_err.is_invalid_argument());
        assert!(!arg_err.is_malformed_id());
    }

    #[test]
    fn test_malformed_id_carries_parse_detail() {
        let parse_err = uuid::Uuid::parse_str("not-a-guid").unwrap_err();
        let err = Error::MalformedId {
            id: "not-a-guid".to_string(),
            source: parse_err,
        };
        assert!(err.is_malformed_id());
        let display_str = format!("{}", err);
        assert!(display_str.contains("not-a-guid"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_core_error_conversion() {
        let core_err = faultline_core::Error::validation("Error message is required");
        let err: Error = core_err.into();
        assert!(matches!(err, Error::Core(_)));
    }
}
