//! Medical certificates issued to patients (sick leave and referral).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::refs::{ChangeRecord, PatientRef, UserRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalCertificate {
    pub id: Uuid,
    /// Sequential certificate number, allocated from the previous maximum
    /// with a configured floor.
    pub number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief_explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    /// Prescribed rest period, as written ("2026-03-01 to 2026-03-05").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_period: Option<String>,
    pub patient: PatientRef,
    #[serde(default)]
    pub change_history: Vec<ChangeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
