//! Staff models.

use serde::{Deserialize, Serialize};

/// An employee record. Doctors and nurses are specializations keyed by the same VAT.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub vat: String,
    pub name: String,
    pub birth_date: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub iban: String,
    pub salary: f64,
}

/// Doctor-specific details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorProfile {
    pub specialization: String,
    pub biography: String,
    pub email: String,
}

/// VAT and display name of a doctor or nurse, as listed in forms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffMember {
    pub vat: String,
    pub name: String,
}
