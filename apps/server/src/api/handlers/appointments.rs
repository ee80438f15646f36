//! Appointment handlers.

use crate::{
    api::extractors::Actor,
    models::{
        envelope,
        requests::{AppointmentsByDate, NewAppointment},
    },
    services::parse_date,
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

pub async fn create(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<NewAppointment>,
) -> Result<Response> {
    let appointment = state.appointments.create(patient_id, request, actor).await?;
    Ok(envelope::created(
        "Appointment created successfully",
        appointment,
    ))
}

pub async fn scheduled(State(state): State<AppState>) -> Result<Response> {
    let appointments = state.appointments.scheduled().await?;
    Ok(envelope::ok(
        "Appointments retrieved successfully",
        appointments,
    ))
}

pub async fn by_date(
    State(state): State<AppState>,
    Json(request): Json<AppointmentsByDate>,
) -> Result<Response> {
    let date = parse_date("appointment", &request.date)?;
    let appointments = state.appointments.on_day(date).await?;
    Ok(envelope::ok(
        "Appointments retrieved successfully",
        appointments,
    ))
}

pub async fn tomorrow(State(state): State<AppState>) -> Result<Response> {
    let appointments = state.appointments.tomorrow().await?;
    let message = if appointments.is_empty() {
        "No scheduled appointments for tomorrow"
    } else {
        "Tomorrow's scheduled appointments retrieved successfully"
    };
    Ok(envelope::ok(message, appointments))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<JsonValue>,
) -> Result<Response> {
    let appointment = state.appointments.update(id, &changes).await?;
    Ok(envelope::ok("Appointment updated successfully", appointment))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    state.appointments.delete(id).await?;
    Ok(envelope::message_only("Appointment deleted successfully"))
}
