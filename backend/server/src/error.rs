use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::upstream::UpstreamError;

pub const UPSTREAM_FAILURE: &str = "The AI service failed to respond.";
pub const ORIGIN_NOT_ALLOWED: &str = "Origin not allowed";

/// Body returned when the AI service could not produce an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Origin not allowed")]
    OriginNotAllowed,

    #[error("The AI service failed to respond. {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MalformedPayload => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            AppError::OriginNotAllowed => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": ORIGIN_NOT_ALLOWED })),
            )
                .into_response(),
            AppError::Upstream(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorEnvelope {
                    error: UPSTREAM_FAILURE.to_string(),
                    details: e.to_string(),
                }),
            )
                .into_response(),
            AppError::Config(_) | AppError::Client(_) | AppError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
