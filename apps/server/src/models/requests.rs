//! Request payloads, validated with `validator` before any store access.

use chrono::{DateTime, Utc};
use molar_models::{
    AppointmentStatus, ScreeningChecklist, Sex, TreatmentRecord, UserRef,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPatient {
    #[validate(range(min = 1))]
    pub card_number: i64,
    #[validate(length(min = 3, max = 50))]
    pub first_name: String,
    pub age: u32,
    pub sex: Sex,
    pub phone: Option<String>,
    pub town: Option<String>,
    pub kebele: Option<String>,
    pub house_number: Option<String>,
    pub woreda: Option<String>,
    pub region: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub disability: bool,
    #[serde(default)]
    pub credit: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSearch {
    pub card_number: Option<i64>,
    pub phone: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub date: DateTime<Utc>,
    pub time: Option<String>,
    pub reason: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub doctor: Option<UserRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentsByDate {
    pub date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFinding {
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub drug_allergy: Option<String>,
    pub diagnosis: Option<String>,
    pub past_medical_history: Option<String>,
    pub past_dental_history: Option<String>,
    pub intraoral_examination: Option<String>,
    pub extraoral_examination: Option<String>,
    pub investigation: Option<String>,
    pub assessment: Option<String>,
    pub next_procedure: Option<String>,
    #[serde(default)]
    pub treatment_plan: Vec<TreatmentRecord>,
    #[serde(default)]
    pub treatment_done: Vec<TreatmentRecord>,
    #[serde(default)]
    pub diseases: Vec<Uuid>,
}

/// PATCH body for a finding: an optional replacement disease list plus
/// arbitrary merge-patch fields.
#[derive(Debug, Deserialize)]
pub struct UpdateFinding {
    #[serde(default)]
    pub diseases: Option<Vec<Uuid>>,
    #[serde(flatten)]
    pub changes: serde_json::Map<String, JsonValue>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthInfo {
    pub blood_group: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub allergies: Option<String>,
    pub medication: Option<String>,
    pub core_temperature: Option<String>,
    pub respiratory_rate: Option<String>,
    pub blood_oxygen: Option<String>,
    #[validate(length(min = 1, message = "blood pressure is required"))]
    pub blood_pressure: String,
    #[validate(length(min = 1, message = "heart rate is required"))]
    pub heart_rate: String,
    pub habits: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub screening: ScreeningChecklist,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPrescription {
    #[validate(length(min = 1, message = "medicine is required"))]
    pub medicine: String,
    pub diagnosis: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCertificate {
    pub brief_explanation: Option<String>,
    pub diagnosis: Option<String>,
    pub rest_period: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewBillingDocument {
    #[validate(
        length(min = 1, message = "at least one line item is required"),
        nested
    )]
    pub items: Vec<LineItemInput>,
    pub payment: Option<PaymentInput>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub service_id: Uuid,
    #[validate(length(min = 1))]
    pub service_name: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub amount: Decimal,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub receipt: bool,
}

/// PATCH body confirming the pending payment on an invoice or credit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub amount: Decimal,
    #[serde(default)]
    pub receipt: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCard {
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: Decimal,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDisease {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatsRequest {
    pub created_by: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReportRequest {
    pub created_by: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub receipt: Option<bool>,
}
