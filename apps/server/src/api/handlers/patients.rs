//! Patient handlers.

use crate::{
    api::extractors::Actor,
    models::{envelope, requests::{PatientSearch, RegisterPatient}},
    state::AppState,
    Result,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

pub async fn register(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<RegisterPatient>,
) -> Result<Response> {
    let patient = state.patients.register(request, actor).await?;
    Ok(envelope::created("Patient registered successfully", patient))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<PatientSearch>,
) -> Result<Response> {
    let patients = state.patients.search(&params).await?;
    let message = if patients.is_empty() {
        "No patients found"
    } else {
        "Patients retrieved successfully"
    };
    Ok(envelope::ok(message, patients))
}

pub async fn recent(State(state): State<AppState>) -> Result<Response> {
    let patients = state.patients.recently_registered().await?;
    Ok(envelope::ok("Recently registered patients retrieved", patients))
}

pub async fn highest_card(State(state): State<AppState>) -> Result<Response> {
    let highest = state.patients.highest_card_number().await?;
    Ok(envelope::ok(
        "Highest card number retrieved",
        json!({ "highestCardNumber": highest }),
    ))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let patient = state.patients.get(id).await?;
    Ok(envelope::ok("Patient retrieved successfully", patient))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<JsonValue>,
) -> Result<Response> {
    let patient = state.patients.update(id, &changes).await?;
    Ok(envelope::ok("Patient updated successfully", patient))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    state.patients.delete(id).await?;
    Ok(envelope::message_only("Patient deleted successfully"))
}
