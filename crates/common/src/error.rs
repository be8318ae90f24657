use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Common error types used across the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// A register row failed validation. `row` is 1-based.
    #[error("Data format error in row {row}, field `{field}`: {reason}")]
    DataFormat {
        row: usize,
        field: String,
        reason: String,
    },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// An aggregate does not fit in the currency type.
    #[error("Overflow: {0}")]
    Overflow(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn data_format(row: usize, field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::DataFormat {
            row,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::DataFormat { row, field, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string(), "row": row, "field": field }),
            ),
            AppError::EmptyInput(_) | AppError::Overflow(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string() }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}
