//! Entity documents for the Molar dental-clinic server.
//!
//! Every type here is a flat document with embedded sub-documents, stored
//! as JSON in the server's document store. Wire naming is camelCase
//! throughout; referential fields hold plain UUIDs (the server maintains
//! parent/child arrays itself, there is no foreign-key enforcement).

pub mod appointment;
pub mod billing;
pub mod certificate;
pub mod disease;
pub mod expense;
pub mod finding;
pub mod health;
pub mod patient;
pub mod prescription;
pub mod refs;

pub use appointment::{Appointment, AppointmentStatus};
pub use billing::{BillingDocument, Card, LineItem, PaymentState, ServiceRef, SettlementStatus};
pub use certificate::MedicalCertificate;
pub use disease::Disease;
pub use expense::Expense;
pub use finding::{DiseaseLink, MedicalFinding, TreatmentRecord};
pub use health::{HealthInfo, ScreeningChecklist};
pub use patient::{Patient, Sex};
pub use prescription::Prescription;
pub use refs::{ChangeRecord, PatientRef, UserRef};
