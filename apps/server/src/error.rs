//! Error types for the clinic server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Stored document is invalid: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn not_found(what: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            what,
            id: id.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Error::Validation(errors.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            Error::MissingParameter(_) | Error::Validation(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            Error::Database(_) | Error::InvalidDocument(_) | Error::Internal(_) | Error::Other(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "code": status_code_label(status),
        }));

        (status, body).into_response()
    }
}

fn status_code_label(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "invalid",
        StatusCode::NOT_FOUND => "not-found",
        StatusCode::CONFLICT => "conflict",
        _ => "internal",
    }
}
