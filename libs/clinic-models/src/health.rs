//! Health information: vitals and the screening checklist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::refs::{PatientRef, UserRef};

/// Yes/no screening questions asked before treatment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningChecklist {
    #[serde(default)]
    pub hypotension: bool,
    #[serde(default)]
    pub tuberculosis: bool,
    #[serde(default)]
    pub hepatitis: bool,
    #[serde(default)]
    pub diabetes: bool,
    #[serde(default)]
    pub bleeding_tendency: bool,
    #[serde(default)]
    pub epilepsy: bool,
    #[serde(default)]
    pub asthma: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_oxygen: Option<String>,
    pub blood_pressure: String,
    pub heart_rate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub screening: ScreeningChecklist,
    pub patient: PatientRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
