//! Medical finding handlers.

use crate::{
    api::extractors::Actor,
    models::{
        envelope,
        requests::{NewFinding, UpdateFinding},
    },
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
    Path(patient_id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<NewFinding>,
) -> Result<Response> {
    let finding = state.findings.create(patient_id, request, actor).await?;
    Ok(envelope::created(
        "Medical finding created successfully",
        finding,
    ))
}

pub async fn list_for_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Response> {
    let findings = state.findings.list_for_patient(patient_id).await?;
    let message = if findings.is_empty() {
        "No medical findings available for this patient"
    } else {
        "Medical findings retrieved successfully"
    };
    Ok(envelope::ok(message, findings))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let finding = state.findings.detail(id).await?;
    Ok(envelope::ok("Medical finding retrieved successfully", finding))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<UpdateFinding>,
) -> Result<Response> {
    let finding = state.findings.update(id, request, actor).await?;
    Ok(envelope::ok("Medical finding updated successfully", finding))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    state.findings.delete(id).await?;
    Ok(envelope::message_only("Medical finding deleted successfully"))
}
