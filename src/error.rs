//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::state::SongId;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upload is missing its title or artist
    #[error("Title and artist required")]
    MissingField,

    /// Upload has no audio file or an extension outside the allow-list
    #[error("Invalid audio file")]
    InvalidFile,

    /// Rating is missing or outside 1..=6
    #[error("Invalid rating")]
    InvalidRating,

    /// Upload exceeds the configured body limit
    #[error("Upload too large")]
    PayloadTooLarge,

    /// Song with the given ID was not found
    #[error("Song not found")]
    SongNotFound(SongId),

    /// Song ID in the URL is not a valid ID, so it names no song
    #[error("Song not found")]
    InvalidSongId,

    /// Internal server error (catch-all for unexpected errors)
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField | AppError::InvalidFile | AppError::InvalidRating => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::SongNotFound(_) | AppError::InvalidSongId => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::Internal(anyhow::Error::new(err).context("Failed to read upload"))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let AppError::Internal(ref e) = self {
            tracing::error!(error = %format!("{:#}", e), "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::MissingField.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidRating.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::PayloadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(AppError::SongNotFound(3).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidSongId.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("disk full")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::SongNotFound(42).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("Should parse JSON");
        assert_eq!(body["error"], "Song not found");
        assert_eq!(body["status"], 404);
    }

    #[test]
    fn test_internal_message_includes_context() {
        let err = AppError::from(anyhow::anyhow!("permission denied").context("Failed to save"));
        assert_eq!(err.to_string(), "Failed to save: permission denied");
    }
}
