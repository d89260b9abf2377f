//! HTTP mapping for request failures.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::PdfError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    #[error("File not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::InvalidRequest(err.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error_kind: &'static str,
    message: String,
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pdf(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Pdf(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Pdf(e) => e.kind(),
            ApiError::InvalidRequest(_) => "InvalidRequestError",
            ApiError::Timeout(_) => "TimeoutError",
            ApiError::NotFound => "NotFoundError",
            ApiError::Internal(_) => "InternalError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(kind = self.kind(), %message, "request failed");
        } else {
            warn!(kind = self.kind(), %message, "request rejected");
        }

        let body = ErrorResponse {
            success: false,
            error_kind: self.kind(),
            detail: message.clone(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
