//! Error types for the TXT record upserter
//!
//! Two layers live here:
//!
//! - [`ApiError`]: what a [`ZoneApi`](crate::traits::ZoneApi) implementation
//!   reports for a single remote call
//! - [`UpsertError`]: the closed taxonomy surfaced by
//!   [`TxtRecordUpserter::update_or_create`](crate::TxtRecordUpserter::update_or_create)

use std::fmt;
use thiserror::Error;

/// Result type alias for upsert operations
pub type Result<T> = std::result::Result<T, UpsertError>;

/// Boxed transport-level cause
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single remote API call
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response was obtained (connection failure, timeout, unreadable body)
    #[error("transport failure")]
    Transport(#[source] BoxError),

    /// The remote system answered with a non-success status
    #[error("status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message reported by the remote system
        message: String,
    },
}

impl ApiError {
    /// Create a transport error from any error type
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    /// Create a status error
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// The status code, if the remote system answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }
}

/// Remote operation a wrapped error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Fetching zone metadata
    GetZone,
    /// Creating the TXT record
    CreateTxtRecord,
    /// Updating the TXT record
    UpdateTxtRecord,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::GetZone => "get zone",
            Operation::CreateTxtRecord => "create TXT record",
            Operation::UpdateTxtRecord => "update TXT record",
        })
    }
}

/// Error returned by the upserter
#[derive(Error, Debug)]
pub enum UpsertError {
    /// No TXT record with the requested name exists
    ///
    /// Consumed by `update_or_create` to select the create path.
    #[error("record not found")]
    NotFound,

    /// The record lookup failed before a response was obtained
    #[error("request error")]
    Request(#[source] ApiError),

    /// The record lookup was answered with a non-404 error status
    #[error("API error (status {status})")]
    Api {
        /// HTTP status code
        status: u16,
        /// Underlying API error
        #[source]
        source: ApiError,
    },

    /// Any failure of the zone fetch, create or update call
    #[error("{op}")]
    Operation {
        /// Which remote operation failed
        op: Operation,
        /// Underlying API error
        #[source]
        source: ApiError,
    },

    /// The caller cancelled the upsert
    #[error("operation cancelled")]
    Cancelled,
}

impl UpsertError {
    /// Wrap an API error with the operation it came from
    pub fn operation(op: Operation, source: ApiError) -> Self {
        Self::Operation { op, source }
    }

    /// Whether this is the recoverable "not found" signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// The status code reported by the remote system, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(source) | Self::Operation { source, .. } => source.status_code(),
            Self::NotFound | Self::Cancelled => None,
        }
    }
}

/// Invalid process configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable did not parse or was out of range
    #[error("{var} must be a positive integer. Got: {value:?}")]
    InvalidNumber {
        /// Environment variable name
        var: &'static str,
        /// Offending value
        value: String,
    },

    /// Unknown log level
    #[error("{var} '{value}' is not valid. Valid levels: trace, debug, info, warn, error")]
    InvalidLogLevel {
        /// Environment variable name
        var: &'static str,
        /// Offending value
        value: String,
    },

    /// The API base URL is not an HTTP(S) URL
    #[error("{var} must use HTTP or HTTPS scheme. Got: {value}")]
    InvalidUrl {
        /// Environment variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}
