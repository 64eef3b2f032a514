//! HTTP error mapping for the file API.
//!
//! The file service returns the closed [`FsError`] set; this module is the
//! single place that chooses an HTTP status and a JSON error body for each
//! kind. Clients match on the stable `code` field; the `error` message is
//! for humans.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sandfs::FsError;
use serde_json::json;

/// Errors surfaced by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A file service failure, mapped by kind.
    Fs(FsError),
    /// Malformed request input.
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Fs(err) => match err {
                FsError::NotFound(_) => StatusCode::NOT_FOUND,
                FsError::AlreadyExists(_) => StatusCode::CONFLICT,
                FsError::PathTraversal
                | FsError::IsADirectory(_)
                | FsError::NotADirectory(_)
                | FsError::DirectoryNotEmpty(_)
                | FsError::MissingNewName => StatusCode::BAD_REQUEST,
                FsError::Io(_) if err.is_permission_denied() => StatusCode::FORBIDDEN,
                FsError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            // Point clients at the recursive flag instead of echoing the
            // bare kind.
            ApiError::Fs(FsError::DirectoryNotEmpty(path)) => {
                format!(
                    "directory not empty: {} (retry with recursive=true)",
                    path.display()
                )
            }
            ApiError::Fs(err) => err.to_string(),
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::BadRequest(_) => None,
            ApiError::Fs(err) => err.code(),
        }
    }
}

impl From<FsError> for ApiError {
    fn from(err: FsError) -> Self {
        ApiError::Fs(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.code() {
            Some(code) => json!({ "error": self.message(), "code": code }),
            None => json!({ "error": self.message() }),
        };
        (self.status(), Json(body)).into_response()
    }
}
