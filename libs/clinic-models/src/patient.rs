//! The patient record: demographics plus arrays of owned document IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::refs::UserRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// A registered patient.
///
/// The `Vec<Uuid>` fields are the manually maintained parent side of every
/// parent/child relation: creating a child document pushes its ID here,
/// deleting one pulls it back out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    /// Unique clinic card number, allocated from the previous maximum.
    pub card_number: i64,
    pub first_name: String,
    pub age: u32,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kebele: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub woreda: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub disability: bool,
    /// Whether the patient settles through a credit arrangement.
    #[serde(default)]
    pub credit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,

    #[serde(default)]
    pub medical_findings: Vec<Uuid>,
    #[serde(default)]
    pub health_info: Vec<Uuid>,
    #[serde(default)]
    pub appointments: Vec<Uuid>,
    #[serde(default)]
    pub invoices: Vec<Uuid>,
    #[serde(default)]
    pub credits: Vec<Uuid>,
    #[serde(default)]
    pub cards: Vec<Uuid>,
    #[serde(default)]
    pub prescriptions: Vec<Uuid>,
    #[serde(default)]
    pub certificates: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
