use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntegraError {
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("{0}")]
    Validation(String),
    #[error("Upstream API did not respond within {0:?}")]
    UpstreamTimeout(Duration),
    #[error("Upstream API responded with status {status}")]
    UpstreamStatus { status: u16 },
    #[error("Upstream API request failed: {0}")]
    UpstreamTransport(String),
    #[error("Upstream API returned an unexpected body: {0}")]
    UpstreamBody(String),
    #[error("Payment record {index} rejected: {reason}")]
    MalformedRecord { index: usize, reason: String },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IntegraError>;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntegraError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidToken => StatusCode::FORBIDDEN,
            Self::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamStatus { .. } | Self::UpstreamTransport(_) | Self::UpstreamBody(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::MalformedRecord { .. }
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            Self::UpstreamStatus { .. } | Self::UpstreamTransport(_) | Self::UpstreamBody(_) => {
                "UPSTREAM_ERROR"
            }
            Self::MalformedRecord { .. } => "TRANSFORM_ERROR",
            Self::Config(_) | Self::Io(_) | Self::Json(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for IntegraError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = ErrorBody {
            code: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
