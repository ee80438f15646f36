//! The `{ success, message, data }` response envelope used by every
//! endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message: message.into(),
            data: Some(data),
        }),
    )
        .into_response()
}

pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: message.into(),
            data: Some(data),
        }),
    )
        .into_response()
}

/// Success with no payload (deletes, cleanups).
pub fn message_only(message: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(Envelope::<()> {
            success: true,
            message: message.into(),
            data: None,
        }),
    )
        .into_response()
}
