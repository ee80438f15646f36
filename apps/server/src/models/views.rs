//! Shaped responses for the statistics and reporting endpoints.

use crate::db::ServiceUsageRow;
use molar_models::{BillingDocument, Card, Expense, MedicalFinding, Sex};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRanking {
    pub rank_by_usage: Vec<ServiceUsageRow>,
    pub rank_by_revenue: Vec<ServiceUsageRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicCell {
    pub sex: String,
    pub age_group: String,
    pub count: i64,
}

/// Per-disease demographics: one row per (sex, age group) cell observed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseStat {
    pub disease: String,
    pub stats: Vec<DemographicCell>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroupCount {
    pub age_group: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReport {
    pub invoices: Vec<BillingDocument>,
    pub cards: Vec<Card>,
    pub expenses: Vec<Expense>,
}

/// A patient on the prosthetics follow-up list, with the findings that
/// put them there.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProstheticsEntry {
    pub id: Uuid,
    pub card_number: i64,
    pub first_name: String,
    pub age: u32,
    pub sex: Sex,
    pub findings: Vec<MedicalFinding>,
}
