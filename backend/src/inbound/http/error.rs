//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting actix
//! handlers turn failures into the wire-level status codes and JSON envelopes
//! this service has always spoken: `{"error": ...}` for parameter and
//! repository failures, `{"status": ...}` while draining.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidParameter => StatusCode::BAD_REQUEST,
        ErrorCode::Repository => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::ShuttingDown => StatusCode::NOT_ACCEPTABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for(error: &Error) -> serde_json::Value {
    match error.code() {
        ErrorCode::ShuttingDown => json!({ "status": error.message() }),
        // Internal messages may carry incidental detail; clients get a
        // fixed phrase and the real cause stays in the logs.
        ErrorCode::Internal => json!({ "error": "internal server error" }),
        _ => json!({ "error": error.message() }),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(body_for(self))
    }
}
