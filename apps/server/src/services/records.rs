//! Patient-owned records: health info, prescriptions and medical
//! certificates.

use crate::{
    config::ClinicConfig,
    db::{Collection, DocumentStore, TypedCollection},
    models::requests::{NewCertificate, NewHealthInfo, NewPrescription},
    services::{attach_to_patient, detach_from_patient, load_children, merge_changes},
    Error, Result,
};
use chrono::Utc;
use molar_models::{HealthInfo, MedicalCertificate, Patient, PatientRef, Prescription, UserRef};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const PROTECTED_FIELDS: &[&str] = &["id", "createdAt", "updatedAt", "createdBy", "patient"];

#[derive(Clone)]
pub struct RecordsService {
    store: Arc<dyn DocumentStore>,
    patients: TypedCollection<Patient>,
    health: TypedCollection<HealthInfo>,
    prescriptions: TypedCollection<Prescription>,
    certificates: TypedCollection<MedicalCertificate>,
    clinic: ClinicConfig,
}

impl RecordsService {
    pub fn new(store: Arc<dyn DocumentStore>, clinic: ClinicConfig) -> Self {
        Self {
            patients: TypedCollection::new(Arc::clone(&store), Collection::Patients),
            health: TypedCollection::new(Arc::clone(&store), Collection::HealthInfo),
            prescriptions: TypedCollection::new(Arc::clone(&store), Collection::Prescriptions),
            certificates: TypedCollection::new(Arc::clone(&store), Collection::Certificates),
            store,
            clinic,
        }
    }

    pub async fn add_health_info(
        &self,
        patient_id: Uuid,
        request: NewHealthInfo,
        actor: Option<UserRef>,
    ) -> Result<HealthInfo> {
        request.validate()?;
        let patient = self.patients.require(patient_id).await?;

        let now = Utc::now();
        let record = HealthInfo {
            id: Uuid::new_v4(),
            blood_group: request.blood_group,
            weight: request.weight,
            height: request.height,
            allergies: request.allergies,
            medication: request.medication,
            core_temperature: request.core_temperature,
            respiratory_rate: request.respiratory_rate,
            blood_oxygen: request.blood_oxygen,
            blood_pressure: request.blood_pressure,
            heart_rate: request.heart_rate,
            habits: request.habits,
            description: request.description,
            screening: request.screening,
            patient: PatientRef::bare(patient.id),
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        self.health.insert(record.id, &record).await?;
        attach_to_patient(&self.patients, patient_id, Collection::HealthInfo, record.id).await?;
        Ok(record)
    }

    pub async fn list_health_info(&self, patient_id: Uuid) -> Result<Vec<HealthInfo>> {
        let patient = self.patients.require(patient_id).await?;
        let mut records = load_children(&self.health, &patient.health_info).await?;
        records.sort_by_key(|record| std::cmp::Reverse(record.created_at));
        Ok(records)
    }

    pub async fn update_health_info(&self, id: Uuid, changes: &JsonValue) -> Result<HealthInfo> {
        let record = self.health.require(id).await?;
        let mut document = serde_json::to_value(&record)?;
        merge_changes(&mut document, changes, PROTECTED_FIELDS);

        let mut updated: HealthInfo = serde_json::from_value(document)
            .map_err(|e| Error::Validation(format!("Invalid health info update: {e}")))?;
        updated.updated_at = Utc::now();

        self.health.put(id, &updated).await?;
        Ok(updated)
    }

    pub async fn delete_health_info(&self, id: Uuid) -> Result<()> {
        if !self.health.delete(id).await? {
            return Err(Error::not_found("Health info", id));
        }
        detach_from_patient(&self.patients, Collection::HealthInfo, id).await
    }

    pub async fn add_prescription(
        &self,
        patient_id: Uuid,
        request: NewPrescription,
        actor: Option<UserRef>,
    ) -> Result<Prescription> {
        request.validate()?;
        let patient = self.patients.require(patient_id).await?;

        let now = Utc::now();
        let prescription = Prescription {
            id: Uuid::new_v4(),
            medicine: request.medicine,
            diagnosis: request.diagnosis,
            description: request.description,
            patient: PatientRef::bare(patient.id),
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        self.prescriptions
            .insert(prescription.id, &prescription)
            .await?;
        attach_to_patient(
            &self.patients,
            patient_id,
            Collection::Prescriptions,
            prescription.id,
        )
        .await?;
        Ok(prescription)
    }

    pub async fn list_prescriptions(&self, patient_id: Uuid) -> Result<Vec<Prescription>> {
        let patient = self.patients.require(patient_id).await?;
        let mut prescriptions =
            load_children(&self.prescriptions, &patient.prescriptions).await?;
        prescriptions.sort_by_key(|p| std::cmp::Reverse(p.created_at));
        Ok(prescriptions)
    }

    pub async fn get_prescription(&self, id: Uuid) -> Result<Prescription> {
        self.prescriptions.require(id).await
    }

    pub async fn delete_prescription(&self, id: Uuid) -> Result<()> {
        if !self.prescriptions.delete(id).await? {
            return Err(Error::not_found("Prescription", id));
        }
        detach_from_patient(&self.patients, Collection::Prescriptions, id).await
    }

    pub async fn add_certificate(
        &self,
        patient_id: Uuid,
        request: NewCertificate,
        actor: Option<UserRef>,
    ) -> Result<MedicalCertificate> {
        let patient = self.patients.require(patient_id).await?;

        // Previous maximum + 1, never below the configured floor.
        // Read-then-write, same caveat as card numbers.
        let number = self
            .store
            .max_number(Collection::Certificates, "number")
            .await?
            .map(|max| max + 1)
            .unwrap_or(self.clinic.certificate_number_floor)
            .max(self.clinic.certificate_number_floor);

        let now = Utc::now();
        let certificate = MedicalCertificate {
            id: Uuid::new_v4(),
            number,
            brief_explanation: request.brief_explanation,
            diagnosis: request.diagnosis,
            rest_period: request.rest_period,
            patient: PatientRef::bare(patient.id),
            change_history: Vec::new(),
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        self.certificates
            .insert(certificate.id, &certificate)
            .await?;
        attach_to_patient(
            &self.patients,
            patient_id,
            Collection::Certificates,
            certificate.id,
        )
        .await?;
        Ok(certificate)
    }

    pub async fn list_certificates(&self, patient_id: Uuid) -> Result<Vec<MedicalCertificate>> {
        let patient = self.patients.require(patient_id).await?;
        let mut certificates = load_children(&self.certificates, &patient.certificates).await?;
        certificates.sort_by_key(|c| std::cmp::Reverse(c.created_at));
        Ok(certificates)
    }

    pub async fn delete_certificate(&self, id: Uuid) -> Result<()> {
        if !self.certificates.delete(id).await? {
            return Err(Error::not_found("Medical certificate", id));
        }
        detach_from_patient(&self.patients, Collection::Certificates, id).await
    }
}
