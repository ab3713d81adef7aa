//! The `error` module defines the error taxonomy shared by every layer of
//! `minijms`.
//!
//! Each variant is an error *kind*; the payload is a human-readable detail
//! string. Every failure is reported synchronously to the caller of the
//! operation that triggered it and leaves previously committed state
//! untouched.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JmsError {
    /// Unsupported or corrupt type in a coercion or wire decode.
    #[error("message format error: {0}")]
    Format(String),

    /// The wire stream ran out of data in the middle of a value.
    #[error("end of message: {0}")]
    Eof(String),

    /// Mutation of a frozen body or read-only property store.
    #[error("message not writeable: {0}")]
    NotWritable(String),

    /// Read of a body that has not been reset for reading.
    #[error("message not readable: {0}")]
    NotReadable(String),

    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Duplicate or malformed client identifier.
    #[error("invalid client id: {0}")]
    InvalidClientId(String),

    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Out-of-range header value, empty name and similar caller mistakes.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, JmsError>;

impl JmsError {
    pub(crate) fn format(detail: impl Into<String>) -> Self {
        JmsError::Format(detail.into())
    }

    pub(crate) fn eof(detail: impl Into<String>) -> Self {
        JmsError::Eof(detail.into())
    }

    pub(crate) fn not_writable(detail: impl Into<String>) -> Self {
        JmsError::NotWritable(detail.into())
    }

    pub(crate) fn not_readable(detail: impl Into<String>) -> Self {
        JmsError::NotReadable(detail.into())
    }

    pub(crate) fn illegal_state(detail: impl Into<String>) -> Self {
        JmsError::IllegalState(detail.into())
    }

    pub(crate) fn invalid_argument(detail: impl Into<String>) -> Self {
        JmsError::InvalidArgument(detail.into())
    }

    pub(crate) fn invalid_destination(detail: impl Into<String>) -> Self {
        JmsError::InvalidDestination(detail.into())
    }

    pub(crate) fn unsupported(detail: impl Into<String>) -> Self {
        JmsError::UnsupportedOperation(detail.into())
    }

    /// True when the error means "ran out of data" rather than "data is broken".
    pub fn is_eof(&self) -> bool {
        matches!(self, JmsError::Eof(_))
    }
}

impl From<serde_json::Error> for JmsError {
    fn from(err: serde_json::Error) -> Self {
        JmsError::Format(format!("object serialization failed: {err}"))
    }
}
