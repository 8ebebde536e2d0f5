//! HTTP rendering of service errors.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// JSON request body whose rejections render as [`ErrorBody`] with a 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// JSON body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub timestamp: String,
    pub status: u16,
    /// Short label for the status, e.g. "Not Found".
    pub error: String,
    pub message: String,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Storage(e) => tracing::error!("Internal error: {:#}", e),
            Self::Validation(msg) => tracing::warn!("Validation error: {}", msg),
            Self::ProjectNotFound(id) => tracing::debug!("Project not found: {}", id),
        }

        let body = ErrorBody {
            timestamp: Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
