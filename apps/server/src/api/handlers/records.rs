//! Health info, prescription and medical certificate handlers.

use crate::{
    api::extractors::Actor,
    models::{
        envelope,
        requests::{NewCertificate, NewHealthInfo, NewPrescription},
    },
    state::AppState,
    Result,
};
use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

pub async fn add_health_info(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<NewHealthInfo>,
) -> Result<Response> {
    let record = state.records.add_health_info(patient_id, request, actor).await?;
    Ok(envelope::created("Health info created successfully", record))
}

pub async fn list_health_info(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Response> {
    let records = state.records.list_health_info(patient_id).await?;
    Ok(envelope::ok("Health info retrieved successfully", records))
}

pub async fn update_health_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<JsonValue>,
) -> Result<Response> {
    let record = state.records.update_health_info(id, &changes).await?;
    Ok(envelope::ok("Health info updated successfully", record))
}

pub async fn delete_health_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    state.records.delete_health_info(id).await?;
    Ok(envelope::message_only("Health info deleted successfully"))
}

pub async fn add_prescription(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<NewPrescription>,
) -> Result<Response> {
    let prescription = state
        .records
        .add_prescription(patient_id, request, actor)
        .await?;
    Ok(envelope::created(
        "Prescription created successfully",
        prescription,
    ))
}

pub async fn list_prescriptions(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Response> {
    let prescriptions = state.records.list_prescriptions(patient_id).await?;
    Ok(envelope::ok(
        "Prescriptions retrieved successfully",
        prescriptions,
    ))
}

pub async fn get_prescription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let prescription = state.records.get_prescription(id).await?;
    Ok(envelope::ok(
        "Prescription retrieved successfully",
        prescription,
    ))
}

pub async fn delete_prescription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    state.records.delete_prescription(id).await?;
    Ok(envelope::message_only("Prescription deleted successfully"))
}

pub async fn add_certificate(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<NewCertificate>,
) -> Result<Response> {
    let certificate = state
        .records
        .add_certificate(patient_id, request, actor)
        .await?;
    Ok(envelope::created(
        "Medical certificate created successfully",
        certificate,
    ))
}

pub async fn list_certificates(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Response> {
    let certificates = state.records.list_certificates(patient_id).await?;
    Ok(envelope::ok(
        "Medical certificates retrieved successfully",
        certificates,
    ))
}

pub async fn delete_certificate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    state.records.delete_certificate(id).await?;
    Ok(envelope::message_only(
        "Medical certificate deleted successfully",
    ))
}
