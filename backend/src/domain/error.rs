//! Domain-level error type.
//!
//! These errors are transport agnostic. The HTTP inbound adapter maps them to
//! status codes and the wire-level JSON envelopes; nothing here references
//! actix or SQL.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A numeric-looking parameter was supplied but is not a valid integer.
    InvalidParameter,
    /// The service has stopped accepting work and is draining.
    ShuttingDown,
    /// The entity repository reported a failure.
    Repository,
    /// An unexpected internal failure.
    Internal,
}

/// Domain error carrying a code and a human-readable message.
///
/// Messages are safe to return to clients; adapters must not attach stack
/// traces or driver-level detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Error {
    code: ErrorCode,
    message: String,
}

impl Error {
    /// Create an error from a code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Machine-readable failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message surfaced to clients.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Convenience constructor for [`ErrorCode::InvalidParameter`].
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameter, message)
    }

    /// Convenience constructor for [`ErrorCode::ShuttingDown`].
    pub fn shutting_down() -> Self {
        Self::new(ErrorCode::ShuttingDown, "server is shutting down")
    }

    /// Convenience constructor for [`ErrorCode::Repository`].
    pub fn repository(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Repository, message)
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
