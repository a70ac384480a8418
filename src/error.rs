use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures of the streaming endpoint, each mapped to one HTTP status.
///
/// The `Display` text is what clients see, so it never includes paths or
/// OS error details.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("File parameter is required")]
    MissingFile,

    #[error("Invalid query string")]
    InvalidQuery,

    #[error("Invalid file path")]
    Forbidden,

    #[error("File not found")]
    NotFound,

    #[error("Requested range not satisfiable")]
    RangeNotSatisfiable { size: u64 },

    #[error("Failed to stream file")]
    Io(#[from] std::io::Error),

    #[error("Failed to stream file")]
    Http(#[from] axum::http::Error),
}

impl StreamError {
    pub fn status(&self) -> StatusCode {
        match self {
            StreamError::MissingFile | StreamError::InvalidQuery => StatusCode::BAD_REQUEST,
            StreamError::Forbidden => StatusCode::FORBIDDEN,
            StreamError::NotFound => StatusCode::NOT_FOUND,
            StreamError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            StreamError::Io(_) | StreamError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        match &self {
            StreamError::Io(e) => error!(error = %e, "audio stream failed"),
            StreamError::Http(e) => error!(error = %e, "audio response could not be built"),
            _ => {}
        }

        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));

        match self {
            StreamError::RangeNotSatisfiable { size } => (
                status,
                [(header::CONTENT_RANGE, format!("bytes */{size}"))],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
