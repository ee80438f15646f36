//! Domain services. Handlers stay thin; the rules live here.

pub mod appointments;
pub mod billing;
pub mod catalog;
pub mod findings;
pub mod patients;
pub mod records;
pub mod reports;
pub mod stats;

use crate::{
    db::{Collection, DocumentQuery, Filter, TypedCollection},
    Result,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use molar_models::Patient;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

/// The `[start, end)` UTC window of a calendar day.
pub(crate) fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight is valid"));
    (start, start + chrono::Duration::days(1))
}

/// Merge submitted changes into a stored document, RFC 7386 style, after
/// stripping fields callers must not rewrite (identity, timestamps,
/// ownership arrays).
pub(crate) fn merge_changes(document: &mut JsonValue, changes: &JsonValue, protected: &[&str]) {
    let mut changes = changes.clone();
    if let Some(map) = changes.as_object_mut() {
        for key in protected {
            map.remove(*key);
        }
    }
    json_patch::merge(document, &changes);
}

/// Parse a `YYYY-MM-DD` request field.
pub(crate) fn parse_date(field: &str, value: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| crate::Error::Validation(format!("Invalid {field} date: '{value}'")))
}

/// The patient-side ID array for a child collection, if it has one.
pub(crate) fn child_ids_mut(
    patient: &mut Patient,
    collection: Collection,
) -> Option<&mut Vec<Uuid>> {
    match collection {
        Collection::MedicalFindings => Some(&mut patient.medical_findings),
        Collection::HealthInfo => Some(&mut patient.health_info),
        Collection::Appointments => Some(&mut patient.appointments),
        Collection::Invoices => Some(&mut patient.invoices),
        Collection::Credits => Some(&mut patient.credits),
        Collection::Cards => Some(&mut patient.cards),
        Collection::Prescriptions => Some(&mut patient.prescriptions),
        Collection::Certificates => Some(&mut patient.certificates),
        _ => None,
    }
}

/// Wire name of the patient-side ID array for a child collection.
pub(crate) fn child_field(collection: Collection) -> Option<&'static str> {
    match collection {
        Collection::MedicalFindings => Some("medicalFindings"),
        Collection::HealthInfo => Some("healthInfo"),
        Collection::Appointments => Some("appointments"),
        Collection::Invoices => Some("invoices"),
        Collection::Credits => Some("credits"),
        Collection::Cards => Some("cards"),
        Collection::Prescriptions => Some("prescriptions"),
        Collection::Certificates => Some("certificates"),
        _ => None,
    }
}

/// Load a patient's child documents in stored-array order. Dangling
/// references are logged and skipped.
pub(crate) async fn load_children<T>(
    collection: &TypedCollection<T>,
    ids: &[Uuid],
) -> Result<Vec<T>>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    let mut children = Vec::with_capacity(ids.len());
    for id in ids {
        match collection.get(*id).await? {
            Some(child) => children.push(child),
            None => tracing::warn!(
                collection = %collection.collection(),
                id = %id,
                "Dangling child reference on patient record"
            ),
        }
    }
    Ok(children)
}

/// Push a created child's ID onto its patient. The patient must exist;
/// callers validate that before creating the child.
pub(crate) async fn attach_to_patient(
    patients: &TypedCollection<Patient>,
    patient_id: Uuid,
    collection: Collection,
    child_id: Uuid,
) -> Result<()> {
    let mut patient = patients.require(patient_id).await?;
    if let Some(ids) = child_ids_mut(&mut patient, collection) {
        ids.push(child_id);
        patient.updated_at = Utc::now();
        patients.put(patient_id, &patient).await?;
    }
    Ok(())
}

/// Pull a deleted child's ID from whichever patient holds it. Missing
/// owners are logged, not surfaced: the child itself is already gone.
pub(crate) async fn detach_from_patient(
    patients: &TypedCollection<Patient>,
    collection: Collection,
    child_id: Uuid,
) -> Result<()> {
    let Some(field) = child_field(collection) else {
        return Ok(());
    };

    let owners = patients
        .find(&DocumentQuery::filtered(Filter::array_contains(
            field,
            json!(child_id),
        )))
        .await?;

    match owners.into_iter().next() {
        Some(mut patient) => {
            let patient_id = patient.id;
            if let Some(ids) = child_ids_mut(&mut patient, collection) {
                ids.retain(|id| *id != child_id);
            }
            patient.updated_at = Utc::now();
            patients.put(patient_id, &patient).await?;
        }
        None => {
            tracing::warn!(
                collection = %collection,
                child_id = %child_id,
                "No patient holds a reference to the deleted document"
            );
        }
    }

    Ok(())
}
