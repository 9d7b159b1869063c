use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::FALLBACK_CAPTION;

#[derive(Error, Debug)]
pub enum CaptionError {
    /// The request itself was unusable: not multipart, no image, unreadable field.
    #[error("Invalid upload: {0}")]
    Validation(String),

    /// The caption model could not be reached or answered with something unusable.
    #[error("Caption model call failed: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CaptionError {
    pub fn kind(&self) -> &'static str {
        match self {
            CaptionError::Validation(_) => "validation",
            CaptionError::Upstream(_) => "upstream",
            CaptionError::Internal(_) => "internal",
        }
    }
}

impl From<MultipartError> for CaptionError {
    fn from(err: MultipartError) -> Self {
        CaptionError::Validation(err.body_text())
    }
}

impl From<MultipartRejection> for CaptionError {
    fn from(rejection: MultipartRejection) -> Self {
        CaptionError::Validation(rejection.body_text())
    }
}

impl From<reqwest::Error> for CaptionError {
    fn from(err: reqwest::Error) -> Self {
        CaptionError::Upstream(err.to_string())
    }
}

impl From<std::io::Error> for CaptionError {
    fn from(err: std::io::Error) -> Self {
        CaptionError::Internal(err.to_string())
    }
}

// Every failure looks the same to the client; the detail only goes to the log.
impl IntoResponse for CaptionError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), error = %self, "🔥 Caption generation failed");

        let body = Json(json!({
            "caption": FALLBACK_CAPTION
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
