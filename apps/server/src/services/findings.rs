//! Medical findings: creation, history views, merge-patch updates with an
//! audit trail, and delete with parent cleanup.

use crate::{
    db::{Collection, DocumentStore, TypedCollection},
    models::requests::{NewFinding, UpdateFinding},
    services::{attach_to_patient, detach_from_patient, load_children, merge_changes},
    Error, Result,
};
use chrono::Utc;
use molar_models::{ChangeRecord, Disease, DiseaseLink, MedicalFinding, Patient, PatientRef, UserRef};
use serde_json::{json, Value as JsonValue};
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

const PROTECTED_FIELDS: &[&str] = &[
    "id",
    "createdAt",
    "updatedAt",
    "createdBy",
    "patient",
    "changeHistory",
    "diseases",
];

const UNKNOWN_DISEASE: &str = "Unknown disease";

#[derive(Clone)]
pub struct FindingService {
    findings: TypedCollection<MedicalFinding>,
    patients: TypedCollection<Patient>,
    diseases: TypedCollection<Disease>,
}

impl FindingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            findings: TypedCollection::new(Arc::clone(&store), Collection::MedicalFindings),
            patients: TypedCollection::new(Arc::clone(&store), Collection::Patients),
            diseases: TypedCollection::new(store, Collection::Diseases),
        }
    }

    pub async fn create(
        &self,
        patient_id: Uuid,
        request: NewFinding,
        actor: Option<UserRef>,
    ) -> Result<MedicalFinding> {
        let patient = self.patients.require(patient_id).await?;

        let now = Utc::now();
        let finding = MedicalFinding {
            id: Uuid::new_v4(),
            chief_complaint: request.chief_complaint,
            history_of_present_illness: request.history_of_present_illness,
            drug_allergy: request.drug_allergy,
            diagnosis: request.diagnosis,
            past_medical_history: request.past_medical_history,
            past_dental_history: request.past_dental_history,
            intraoral_examination: request.intraoral_examination,
            extraoral_examination: request.extraoral_examination,
            investigation: request.investigation,
            assessment: request.assessment,
            next_procedure: request.next_procedure,
            treatment_plan: request.treatment_plan,
            treatment_done: request.treatment_done,
            diseases: request
                .diseases
                .into_iter()
                .map(|disease| DiseaseLink {
                    disease,
                    recorded_at: now,
                })
                .collect(),
            change_history: Vec::new(),
            patient: PatientRef::bare(patient.id),
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        self.findings.insert(finding.id, &finding).await?;
        attach_to_patient(
            &self.patients,
            patient_id,
            Collection::MedicalFindings,
            finding.id,
        )
        .await?;

        Ok(finding)
    }

    /// A patient's findings, newest first, with disease references
    /// resolved to catalog names.
    pub async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<JsonValue>> {
        let patient = self.patients.require(patient_id).await?;

        let mut findings = load_children(&self.findings, &patient.medical_findings).await?;
        findings.sort_by_key(|finding| std::cmp::Reverse(finding.created_at));

        let names = self.disease_names(&findings).await?;

        findings
            .into_iter()
            .map(|finding| {
                let resolved: Vec<&str> = finding
                    .diseases
                    .iter()
                    .map(|link| {
                        names
                            .get(&link.disease)
                            .map(String::as_str)
                            .unwrap_or(UNKNOWN_DISEASE)
                    })
                    .collect();
                let mut document = serde_json::to_value(&finding)?;
                document["diseases"] = json!(resolved);
                Ok(document)
            })
            .collect()
    }

    /// One finding with its disease links flattened to bare IDs, the shape
    /// the edit form expects.
    pub async fn detail(&self, id: Uuid) -> Result<JsonValue> {
        let finding = self.findings.require(id).await?;
        let ids: Vec<Uuid> = finding.diseases.iter().map(|link| link.disease).collect();

        let mut document = serde_json::to_value(&finding)?;
        document["diseases"] = json!(ids);
        Ok(document)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateFinding,
        actor: Option<UserRef>,
    ) -> Result<MedicalFinding> {
        let finding = self.findings.require(id).await?;
        let now = Utc::now();

        let changes = JsonValue::Object(request.changes.clone());
        let mut document = serde_json::to_value(&finding)?;
        merge_changes(&mut document, &changes, PROTECTED_FIELDS);

        let mut updated: MedicalFinding = serde_json::from_value(document)
            .map_err(|e| Error::Validation(format!("Invalid finding update: {e}")))?;

        // A submitted disease list replaces the links, re-stamped now
        if let Some(diseases) = request.diseases {
            updated.diseases = diseases
                .into_iter()
                .map(|disease| DiseaseLink {
                    disease,
                    recorded_at: now,
                })
                .collect();
        }

        updated.change_history.push(ChangeRecord {
            updated_by: actor,
            updated_at: now,
            changes: Some(JsonValue::Object(request.changes)),
        });
        updated.updated_at = now;

        self.findings.put(id, &updated).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.findings.delete(id).await? {
            return Err(Error::not_found("Medical finding", id));
        }
        detach_from_patient(&self.patients, Collection::MedicalFindings, id).await
    }

    async fn disease_names(
        &self,
        findings: &[MedicalFinding],
    ) -> Result<HashMap<Uuid, String>> {
        let mut names = HashMap::new();
        for finding in findings {
            for link in &finding.diseases {
                if names.contains_key(&link.disease) {
                    continue;
                }
                if let Some(disease) = self.diseases.get(link.disease).await? {
                    names.insert(link.disease, disease.name);
                }
            }
        }
        Ok(names)
    }
}
