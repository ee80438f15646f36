//! Invoice, credit and card handlers.

use crate::{
    api::extractors::Actor,
    models::{
        envelope,
        requests::{IssueCard, NewBillingDocument, PaymentUpdate},
    },
    services::billing::BillingKind,
    state::AppState,
    Result,
};
use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use uuid::Uuid;

pub async fn create_invoice(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<NewBillingDocument>,
) -> Result<Response> {
    let invoice = state
        .billing
        .create(BillingKind::Invoice, patient_id, request, actor)
        .await?;
    Ok(envelope::created("Invoice created successfully", invoice))
}

pub async fn list_invoices(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Response> {
    let invoices = state
        .billing
        .list_for_patient(BillingKind::Invoice, patient_id)
        .await?;
    Ok(envelope::ok("Invoices retrieved successfully", invoices))
}

pub async fn get_invoice(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let invoice = state.billing.get(BillingKind::Invoice, id).await?;
    Ok(envelope::ok("Invoice retrieved successfully", invoice))
}

pub async fn record_invoice_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<PaymentUpdate>,
) -> Result<Response> {
    let invoice = state
        .billing
        .record_payment(BillingKind::Invoice, id, request, actor)
        .await?;
    Ok(envelope::ok("Payment recorded successfully", invoice))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    state.billing.delete(BillingKind::Invoice, id).await?;
    Ok(envelope::message_only("Invoice deleted successfully"))
}

/// Invoices whose current payment still awaits cashier confirmation.
pub async fn unconfirmed_invoices(State(state): State<AppState>) -> Result<Response> {
    let invoices = state.billing.unconfirmed(BillingKind::Invoice).await?;
    Ok(envelope::ok("Invoices retrieved successfully", invoices))
}

pub async fn create_credit(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<NewBillingDocument>,
) -> Result<Response> {
    let credit = state
        .billing
        .create(BillingKind::Credit, patient_id, request, actor)
        .await?;
    Ok(envelope::created("Credit created successfully", credit))
}

pub async fn list_credits(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Response> {
    let credits = state
        .billing
        .list_for_patient(BillingKind::Credit, patient_id)
        .await?;
    Ok(envelope::ok("Credits retrieved successfully", credits))
}

pub async fn get_credit(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let credit = state.billing.get(BillingKind::Credit, id).await?;
    Ok(envelope::ok("Credit retrieved successfully", credit))
}

pub async fn record_credit_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<PaymentUpdate>,
) -> Result<Response> {
    let credit = state
        .billing
        .record_payment(BillingKind::Credit, id, request, actor)
        .await?;
    Ok(envelope::ok("Payment recorded successfully", credit))
}

pub async fn delete_credit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    state.billing.delete(BillingKind::Credit, id).await?;
    Ok(envelope::message_only("Credit deleted successfully"))
}

pub async fn issue_card(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Actor(actor): Actor,
    Json(request): Json<IssueCard>,
) -> Result<Response> {
    let card = state.billing.issue_card(patient_id, request, actor).await?;
    Ok(envelope::created("Card issued successfully", card))
}

pub async fn list_cards(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Response> {
    let cards = state.billing.list_cards(patient_id).await?;
    Ok(envelope::ok("Cards retrieved successfully", cards))
}
