//! The clinic's document collections.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Patients,
    Appointments,
    MedicalFindings,
    HealthInfo,
    Invoices,
    Credits,
    Cards,
    Expenses,
    Prescriptions,
    Diseases,
    Certificates,
}

impl Collection {
    /// Storage name, used as the `collection` column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Patients => "patients",
            Collection::Appointments => "appointments",
            Collection::MedicalFindings => "medical_findings",
            Collection::HealthInfo => "health_info",
            Collection::Invoices => "invoices",
            Collection::Credits => "credits",
            Collection::Cards => "cards",
            Collection::Expenses => "expenses",
            Collection::Prescriptions => "prescriptions",
            Collection::Diseases => "diseases",
            Collection::Certificates => "certificates",
        }
    }

    /// Human name used in error messages ("Patient not found: ...").
    pub fn entity_name(&self) -> &'static str {
        match self {
            Collection::Patients => "Patient",
            Collection::Appointments => "Appointment",
            Collection::MedicalFindings => "Medical finding",
            Collection::HealthInfo => "Health info",
            Collection::Invoices => "Invoice",
            Collection::Credits => "Credit",
            Collection::Cards => "Card",
            Collection::Expenses => "Expense",
            Collection::Prescriptions => "Prescription",
            Collection::Diseases => "Disease",
            Collection::Certificates => "Medical certificate",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
