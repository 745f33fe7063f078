use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::domain::query::query_error::QueryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Body parsing error: {0}")]
    BodyParsingError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Timed out after {0} seconds")]
    Timeout(u64),
}

/// Only undecodable settings fail a batch as a whole; every other
/// `QueryError` stays in its query's slot.
impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::ConfigurationError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::BodyParsingError(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigurationError(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        };

        let body = Json(json!({
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}
