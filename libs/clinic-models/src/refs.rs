//! Reference sub-documents embedded across entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Who created or last touched a record.
///
/// The username is denormalized alongside the ID so lists can render an
/// author without an extra lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Uuid,
    pub username: String,
}

/// Denormalized reference to the owning patient.
///
/// Name and card number are snapshots taken at creation time; the patient
/// document remains the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRef {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<i64>,
}

impl PatientRef {
    pub fn bare(id: Uuid) -> Self {
        Self {
            id,
            name: None,
            card_number: None,
        }
    }
}

/// One entry of an embedded change-history audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserRef>,
    pub updated_at: DateTime<Utc>,
    /// The fields that were changed, as submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<JsonValue>,
}
