//! Payment report handler.

use crate::{
    models::{envelope, requests::PaymentReportRequest},
    state::AppState,
    Result,
};
use axum::{extract::State, response::Response, Json};

pub async fn payment_report(
    State(state): State<AppState>,
    Json(request): Json<PaymentReportRequest>,
) -> Result<Response> {
    let report = state.reports.payment_report(&request).await?;
    Ok(envelope::ok(
        "Invoices, cards, and expenses retrieved successfully",
        report,
    ))
}
