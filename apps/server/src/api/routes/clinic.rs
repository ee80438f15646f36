//! Clinic API routes: one route per resource/action, conventional verbs,
//! path parameters for entity IDs.

use crate::api::handlers::{
    appointments, billing, diseases, expenses, findings, patients, records, reports, stats,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};

pub fn clinic_routes() -> Router<AppState> {
    Router::new()
        // Patients (exact routes before the parameterized ones)
        .route("/patients", post(patients::register))
        .route("/patients/search", get(patients::search))
        .route("/patients/recent", get(patients::recent))
        .route("/patients/highest-card", get(patients::highest_card))
        .route(
            "/patients/:id",
            get(patients::get_patient)
                .patch(patients::update_patient)
                .delete(patients::delete_patient),
        )
        // Patient-owned documents
        .route("/patients/:id/appointments", post(appointments::create))
        .route(
            "/patients/:id/findings",
            post(findings::create).get(findings::list_for_patient),
        )
        .route(
            "/patients/:id/health-info",
            post(records::add_health_info).get(records::list_health_info),
        )
        .route(
            "/patients/:id/prescriptions",
            post(records::add_prescription).get(records::list_prescriptions),
        )
        .route(
            "/patients/:id/certificates",
            post(records::add_certificate).get(records::list_certificates),
        )
        .route(
            "/patients/:id/invoices",
            post(billing::create_invoice).get(billing::list_invoices),
        )
        .route(
            "/patients/:id/credits",
            post(billing::create_credit).get(billing::list_credits),
        )
        .route(
            "/patients/:id/cards",
            post(billing::issue_card).get(billing::list_cards),
        )
        // Appointments
        .route("/appointments/scheduled", get(appointments::scheduled))
        .route("/appointments/by-date", post(appointments::by_date))
        .route("/appointments/tomorrow", get(appointments::tomorrow))
        .route(
            "/appointments/:id",
            patch(appointments::update).delete(appointments::delete),
        )
        // Medical findings
        .route(
            "/findings/:id",
            get(findings::detail)
                .patch(findings::update)
                .delete(findings::delete),
        )
        // Health info / prescriptions / certificates
        .route(
            "/health-info/:id",
            patch(records::update_health_info).delete(records::delete_health_info),
        )
        .route(
            "/prescriptions/:id",
            get(records::get_prescription).delete(records::delete_prescription),
        )
        .route("/certificates/:id", delete(records::delete_certificate))
        // Billing
        .route("/invoices/unconfirmed", get(billing::unconfirmed_invoices))
        .route("/invoices/report", post(reports::payment_report))
        .route(
            "/invoices/:id",
            get(billing::get_invoice)
                .patch(billing::record_invoice_payment)
                .delete(billing::delete_invoice),
        )
        .route(
            "/credits/:id",
            get(billing::get_credit)
                .patch(billing::record_credit_payment)
                .delete(billing::delete_credit),
        )
        // Expenses and the disease catalog
        .route("/expenses", post(expenses::create).get(expenses::list))
        .route("/expenses/:id", delete(expenses::delete))
        .route("/diseases", post(diseases::create).get(diseases::list))
        .route("/diseases/:id", delete(diseases::delete))
        // Statistics
        .route(
            "/stats/services",
            get(stats::service_ranking).post(stats::service_ranking_filtered),
        )
        .route("/stats/diseases", post(stats::disease_demographics))
        .route("/stats/age-groups", get(stats::age_groups))
        .route("/stats/prosthetics", get(stats::prosthetics))
}
