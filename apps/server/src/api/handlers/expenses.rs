//! Expense handlers.

use crate::{
    api::extractors::Actor,
    models::{envelope, requests::NewExpense},
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
    Actor(actor): Actor,
    Json(request): Json<NewExpense>,
) -> Result<Response> {
    let expense = state.catalog.add_expense(request, actor).await?;
    Ok(envelope::created("Expense recorded successfully", expense))
}

pub async fn list(State(state): State<AppState>) -> Result<Response> {
    let expenses = state.catalog.list_expenses().await?;
    Ok(envelope::ok("Expenses retrieved successfully", expenses))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    state.catalog.delete_expense(id).await?;
    Ok(envelope::message_only("Expense deleted successfully"))
}
