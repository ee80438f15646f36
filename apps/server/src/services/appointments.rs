//! Appointment scheduling and the day-window queries behind the
//! reception lists.

use crate::{
    db::{Collection, DocumentQuery, DocumentStore, Filter, Sort, SortKind, TypedCollection},
    models::requests::NewAppointment,
    services::{attach_to_patient, day_bounds, detach_from_patient, merge_changes},
    Error, Result,
};
use chrono::{NaiveDate, Utc};
use molar_models::{Appointment, AppointmentStatus, Patient, PatientRef, UserRef};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use uuid::Uuid;

const PROTECTED_FIELDS: &[&str] = &["id", "createdAt", "updatedAt", "createdBy", "patient"];

#[derive(Clone)]
pub struct AppointmentService {
    appointments: TypedCollection<Appointment>,
    patients: TypedCollection<Patient>,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            appointments: TypedCollection::new(Arc::clone(&store), Collection::Appointments),
            patients: TypedCollection::new(store, Collection::Patients),
        }
    }

    pub async fn create(
        &self,
        patient_id: Uuid,
        request: NewAppointment,
        actor: Option<UserRef>,
    ) -> Result<Appointment> {
        let patient = self.patients.require(patient_id).await?;

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            date: request.date,
            time: request.time,
            reason: request.reason,
            status: request.status.unwrap_or(AppointmentStatus::Scheduled),
            doctor: request.doctor,
            patient: PatientRef {
                id: patient.id,
                name: Some(patient.first_name.clone()),
                card_number: Some(patient.card_number),
            },
            created_by: actor,
            created_at: now,
            updated_at: now,
        };

        self.appointments.insert(appointment.id, &appointment).await?;
        attach_to_patient(
            &self.patients,
            patient_id,
            Collection::Appointments,
            appointment.id,
        )
        .await?;

        Ok(appointment)
    }

    /// Every Scheduled appointment, soonest first.
    pub async fn scheduled(&self) -> Result<Vec<Appointment>> {
        self.appointments
            .find(&DocumentQuery::sorted(
                scheduled_filter(),
                Sort::ascending("date", SortKind::Timestamp),
            ))
            .await
    }

    /// Scheduled appointments within one calendar day.
    pub async fn on_day(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        let (start, end) = day_bounds(date);
        self.appointments
            .find(&DocumentQuery::sorted(
                Filter::And(vec![scheduled_filter(), Filter::between("date", start, end)]),
                Sort::ascending("date", SortKind::Timestamp),
            ))
            .await
    }

    /// Tomorrow's Scheduled appointments, for the reminder list.
    pub async fn tomorrow(&self) -> Result<Vec<Appointment>> {
        let tomorrow = Utc::now().date_naive() + chrono::Duration::days(1);
        self.on_day(tomorrow).await
    }

    pub async fn update(&self, id: Uuid, changes: &JsonValue) -> Result<Appointment> {
        let appointment = self.appointments.require(id).await?;
        let mut document = serde_json::to_value(&appointment)?;
        merge_changes(&mut document, changes, PROTECTED_FIELDS);

        let mut updated: Appointment = serde_json::from_value(document)
            .map_err(|e| Error::Validation(format!("Invalid appointment update: {e}")))?;
        updated.updated_at = Utc::now();

        self.appointments.put(id, &updated).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.appointments.delete(id).await? {
            return Err(Error::not_found("Appointment", id));
        }
        detach_from_patient(&self.patients, Collection::Appointments, id).await
    }
}

fn scheduled_filter() -> Filter {
    Filter::eq("status", json!(AppointmentStatus::Scheduled.as_str()))
}
