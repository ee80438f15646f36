//! Statistics handlers.

use crate::{
    models::{
        envelope,
        requests::{DateRange, ServiceStatsRequest},
    },
    state::AppState,
    Result,
};
use axum::{extract::State, response::Response, Json};

pub async fn service_ranking(State(state): State<AppState>) -> Result<Response> {
    let ranking = state.stats.service_ranking().await?;
    Ok(envelope::ok(
        "Service statistics retrieved successfully",
        ranking,
    ))
}

pub async fn service_ranking_filtered(
    State(state): State<AppState>,
    Json(request): Json<ServiceStatsRequest>,
) -> Result<Response> {
    let ranking = state.stats.service_ranking_filtered(&request).await?;
    Ok(envelope::ok(
        "Service statistics retrieved successfully",
        ranking,
    ))
}

pub async fn disease_demographics(
    State(state): State<AppState>,
    Json(range): Json<DateRange>,
) -> Result<Response> {
    let stats = state.stats.disease_demographics(&range).await?;
    Ok(envelope::ok("Disease statistics retrieved successfully", stats))
}

pub async fn age_groups(State(state): State<AppState>) -> Result<Response> {
    let distribution = state.stats.age_distribution().await?;
    Ok(envelope::ok(
        "Age distribution retrieved successfully",
        distribution,
    ))
}

pub async fn prosthetics(State(state): State<AppState>) -> Result<Response> {
    let entries = state.stats.prosthetics().await?;
    Ok(envelope::ok(
        "Prosthetics follow-up list retrieved successfully",
        entries,
    ))
}
