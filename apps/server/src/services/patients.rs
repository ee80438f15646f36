//! Patient registration, search and record maintenance.

use crate::{
    config::ClinicConfig,
    db::{Collection, DocumentQuery, DocumentStore, Filter, TypedCollection},
    models::requests::{PatientSearch, RegisterPatient},
    services::{child_ids_mut, merge_changes},
    Error, Result,
};
use chrono::{Months, Utc};
use molar_models::{Patient, UserRef};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Fields a PATCH must not rewrite: identity, audit stamps and the
/// ownership arrays the services maintain themselves.
const PROTECTED_FIELDS: &[&str] = &[
    "id",
    "createdAt",
    "updatedAt",
    "createdBy",
    "cardNumber",
    "medicalFindings",
    "healthInfo",
    "appointments",
    "invoices",
    "credits",
    "cards",
    "prescriptions",
    "certificates",
];

#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn DocumentStore>,
    patients: TypedCollection<Patient>,
    clinic: ClinicConfig,
}

impl PatientService {
    pub fn new(store: Arc<dyn DocumentStore>, clinic: ClinicConfig) -> Self {
        Self {
            patients: TypedCollection::new(Arc::clone(&store), Collection::Patients),
            store,
            clinic,
        }
    }

    pub async fn register(
        &self,
        request: RegisterPatient,
        actor: Option<UserRef>,
    ) -> Result<Patient> {
        request.validate()?;

        let taken = self
            .store
            .count(
                Collection::Patients,
                &Filter::eq("cardNumber", json!(request.card_number)),
            )
            .await?;
        if taken > 0 {
            return Err(Error::Conflict(format!(
                "Card number {} is already in use",
                request.card_number
            )));
        }

        let now = Utc::now();
        let patient = Patient {
            id: Uuid::new_v4(),
            card_number: request.card_number,
            first_name: request.first_name,
            age: request.age,
            sex: request.sex,
            phone: request.phone,
            town: request.town,
            kebele: request.kebele,
            house_number: request.house_number,
            woreda: request.woreda,
            region: request.region,
            description: request.description,
            disability: request.disability,
            credit: request.credit,
            created_by: actor,
            medical_findings: Vec::new(),
            health_info: Vec::new(),
            appointments: Vec::new(),
            invoices: Vec::new(),
            credits: Vec::new(),
            cards: Vec::new(),
            prescriptions: Vec::new(),
            certificates: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.patients.insert(patient.id, &patient).await?;
        Ok(patient)
    }

    /// Card number matches exactly; phone and name match as
    /// case-insensitive substrings. At least one parameter is required.
    pub async fn search(&self, params: &PatientSearch) -> Result<Vec<Patient>> {
        let mut filters = Vec::new();
        if let Some(card_number) = params.card_number {
            filters.push(Filter::eq("cardNumber", json!(card_number)));
        }
        if let Some(phone) = params.phone.as_deref().filter(|s| !s.is_empty()) {
            filters.push(Filter::contains("phone", phone));
        }
        if let Some(name) = params.name.as_deref().filter(|s| !s.is_empty()) {
            filters.push(Filter::contains("firstName", name));
        }

        if filters.is_empty() {
            return Err(Error::MissingParameter(
                "at least one of cardNumber, phone or name is required".to_string(),
            ));
        }

        self.patients
            .find(&DocumentQuery::filtered(Filter::And(filters)))
            .await
    }

    /// Patients registered within the configured recent window.
    pub async fn recently_registered(&self) -> Result<Vec<Patient>> {
        let now = Utc::now();
        let from = now
            .checked_sub_months(Months::new(self.clinic.recent_registration_months))
            .unwrap_or(now);

        self.patients
            .find(&DocumentQuery::filtered(Filter::between(
                "createdAt",
                from,
                now,
            )))
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Patient> {
        self.patients.require(id).await
    }

    pub async fn update(&self, id: Uuid, changes: &JsonValue) -> Result<Patient> {
        let patient = self.patients.require(id).await?;
        let mut document = serde_json::to_value(&patient)?;
        merge_changes(&mut document, changes, PROTECTED_FIELDS);

        let mut updated: Patient = serde_json::from_value(document)
            .map_err(|e| Error::Validation(format!("Invalid patient update: {e}")))?;
        updated.updated_at = Utc::now();

        self.patients.put(id, &updated).await?;
        Ok(updated)
    }

    /// Delete a patient and best-effort delete every owned child document.
    /// A missing child is logged and skipped; it never aborts the delete.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut patient = self.patients.require(id).await?;

        for collection in [
            Collection::MedicalFindings,
            Collection::HealthInfo,
            Collection::Appointments,
            Collection::Invoices,
            Collection::Credits,
            Collection::Cards,
            Collection::Prescriptions,
            Collection::Certificates,
        ] {
            let ids = child_ids_mut(&mut patient, collection)
                .map(std::mem::take)
                .unwrap_or_default();
            for child_id in ids {
                match self.store.remove(collection, child_id).await {
                    Ok(true) => {}
                    Ok(false) => tracing::warn!(
                        collection = %collection,
                        child_id = %child_id,
                        patient_id = %id,
                        "Referenced document was already gone during cascade delete"
                    ),
                    Err(e) => tracing::warn!(
                        collection = %collection,
                        child_id = %child_id,
                        patient_id = %id,
                        error = %e,
                        "Failed to delete referenced document during cascade delete"
                    ),
                }
            }
        }

        self.patients.delete(id).await?;
        Ok(())
    }

    /// Highest allocated card number, for the front desk to hand out the
    /// next card. Read-then-write; concurrent registrations can race, the
    /// uniqueness check on register is the backstop.
    pub async fn highest_card_number(&self) -> Result<Option<i64>> {
        self.store
            .max_number(Collection::Patients, "cardNumber")
            .await
    }
}
