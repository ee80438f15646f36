//! Disease catalog handlers.

use crate::{
    models::{envelope, requests::NewDisease},
    state::AppState,
    Result,
};
use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use uuid::Uuid;

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<NewDisease>,
) -> Result<Response> {
    let disease = state.catalog.add_disease(request).await?;
    Ok(envelope::created("Disease added successfully", disease))
}

pub async fn list(State(state): State<AppState>) -> Result<Response> {
    let diseases = state.catalog.list_diseases().await?;
    Ok(envelope::ok("Diseases retrieved successfully", diseases))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    state.catalog.delete_disease(id).await?;
    Ok(envelope::message_only("Disease deleted successfully"))
}
