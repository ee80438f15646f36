//! Custom Axum extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use molar_models::UserRef;
use std::convert::Infallible;
use uuid::Uuid;

/// The acting staff member, taken from the `x-user-id` / `x-username`
/// headers set by the fronting gateway (which owns authentication).
/// Absent headers yield `Actor(None)`; records are then created without
/// a `createdBy` stamp.
pub struct Actor(pub Option<UserRef>);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok());
        let username = parts
            .headers
            .get("x-username")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Actor(match (id, username) {
            (Some(id), Some(username)) => Some(UserRef { id, username }),
            _ => None,
        }))
    }
}
