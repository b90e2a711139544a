use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use std::num::ParseIntError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LabError {
    #[error("Connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A bound parameter did not match the type the statement expects.
    #[error("Type conversion error: {0}")]
    TypeConversion(String),

    #[error("Creating user failed, no ID obtained")]
    Creation,

    #[error("Format error: {0}")]
    Format(#[from] ParseIntError),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    /// Secure-path failure. Never carries engine text.
    #[error("Query failed")]
    Query,

    #[error("Bootstrap error: {0}")]
    Bootstrap(String),
}

impl LabError {
    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            LabError::Connection(_) => "CONNECTION_ERROR",
            LabError::TypeConversion(_) => "TYPE_CONVERSION",
            LabError::Creation => "CREATION_ERROR",
            LabError::Format(_) => "FORMAT_ERROR",
            LabError::Database(_) | LabError::Query => "QUERY_ERROR",
            LabError::Bootstrap(_) => "BOOTSTRAP_ERROR",
        }
    }
}

impl IntoResponse for LabError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            LabError::Connection(_) | LabError::Bootstrap(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Storage is unavailable.".to_string(),
            ),
            LabError::TypeConversion(_) => (
                StatusCode::BAD_REQUEST,
                "Parameter rejected by the statement binder.".to_string(),
            ),
            LabError::Format(e) => (StatusCode::BAD_REQUEST, format!("Invalid number: {e}")),
            LabError::Creation | LabError::Database(_) | LabError::Query => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred.".to_string(),
            ),
        };
        let body = ApiErrorBody {
            code: self.code().to_string(),
            message,
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
