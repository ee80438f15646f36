//! Medical findings: the clinical record written per visit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::refs::{ChangeRecord, PatientRef, UserRef};

/// One row of the treatment checklist, used both for planned work and for
/// work already done. The booleans mirror the clinic's paper form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRecord {
    #[serde(default)]
    pub extraction: bool,
    #[serde(default)]
    pub scaling: bool,
    #[serde(default)]
    pub root_canal: bool,
    #[serde(default)]
    pub filling: bool,
    #[serde(default)]
    pub bridge: bool,
    #[serde(default)]
    pub crown: bool,
    #[serde(default)]
    pub apicectomy: bool,
    #[serde(default)]
    pub fixed_orthodontic_appliance: bool,
    #[serde(default)]
    pub removable_orthodontic_appliance: bool,
    #[serde(default)]
    pub removable_denture: bool,
    #[serde(default)]
    pub splinting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooth_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A diagnosed disease reference with the time it was recorded, which the
/// demographics report ranges over.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseLink {
    pub disease: Uuid,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalFinding {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_of_present_illness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drug_allergy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub past_medical_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub past_dental_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intraoral_examination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraoral_examination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investigation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_procedure: Option<String>,
    #[serde(default)]
    pub treatment_plan: Vec<TreatmentRecord>,
    #[serde(default)]
    pub treatment_done: Vec<TreatmentRecord>,
    #[serde(default)]
    pub diseases: Vec<DiseaseLink>,
    #[serde(default)]
    pub change_history: Vec<ChangeRecord>,
    pub patient: PatientRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicalFinding {
    /// Whether any planned or completed row includes prosthetic work
    /// (bridge or crown).
    pub fn involves_prosthetics(&self) -> bool {
        self.treatment_plan
            .iter()
            .chain(self.treatment_done.iter())
            .any(|row| row.bridge || row.crown)
    }
}
