//! Error types for statement execution.

use ledger_ion::{DecodeError, WriteError};
use thiserror::Error;

/// Result type alias for executor operations.
pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a [`Driver`](crate::Driver) or one of its sessions.
///
/// Opaque to the executor: it is logged and handed back to the caller
/// unchanged.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying transport or SDK error.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by [`Ledger`](crate::Ledger) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter could not be encoded as Ion.
    #[error(transparent)]
    Encode(#[from] WriteError),

    /// The result set could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The driver failed to open a session, run a statement or list tables.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A document lookup matched no rows.
    #[error("no document in table '{table}' matches the given value of field '{field}'")]
    NotFound { table: String, field: String },

    /// A table or field name is not a plain identifier and cannot be spliced
    /// into a statement.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn driver_errors_keep_their_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = DriverError::with_source("could not reach ledger", io);
        assert_eq!(err.to_string(), "could not reach ledger");
        assert_eq!(err.source().map(ToString::to_string), Some("refused".to_owned()));
    }

    #[test]
    fn wrapped_errors_are_transparent() {
        let err = Error::from(DecodeError::InvalidBvm);
        assert_eq!(err.to_string(), DecodeError::InvalidBvm.to_string());
        let err = Error::from(DriverError::new("session expired"));
        assert_eq!(err.to_string(), "session expired");
    }
}
