//! Helper types and traits for cleaner route handlers.
//!
//! Errors leave the server as `{"error": "..."}` JSON bodies. The messages
//! are short and fixed; details of processing failures only go to the log.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdf_sidebyside_core::{Error, ErrorClass};
use serde::Serialize;

pub const MISSING_INPUT_MESSAGE: &str = "Please upload both PDF files";
pub const MERGE_FAILED_MESSAGE: &str = "Failed to merge PDFs";
pub const NOT_A_PDF_MESSAGE: &str = "Please select only PDF files";

/// Standard result type for route handlers.
pub type RouteResult<T> = Result<T, ApiError>;

/// An HTTP status plus the message shown to the user.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn merge_failed() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, MERGE_FAILED_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}

impl From<Error> for ApiError {
    /// Missing input is the caller's fault (400); everything else is a
    /// processing failure (500) with a generic message.
    fn from(err: Error) -> Self {
        match err.class() {
            ErrorClass::MissingInput => Self::bad_request(MISSING_INPUT_MESSAGE),
            ErrorClass::ProcessingFailure => Self::merge_failed(),
        }
    }
}

/// Extension trait for converting `Result<T, E>` to `RouteResult<T>`.
pub trait ResultExt<T, E: std::fmt::Display> {
    /// Converts the error to 500 Internal Server Error.
    fn or_internal_error(self) -> RouteResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn or_internal_error(self) -> RouteResult<T> {
        self.map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }
}
