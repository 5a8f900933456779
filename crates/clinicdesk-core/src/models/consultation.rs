//! Consultation models: SOAP notes, diagnostics and prescriptions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp::{format_timestamp, url_timestamp};

/// Identity of a consultation: the doctor and the appointment slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ConsultationKey {
    pub doctor_vat: String,
    pub timestamp: NaiveDateTime,
}

impl ConsultationKey {
    pub fn new(doctor_vat: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            doctor_vat: doctor_vat.into(),
            timestamp,
        }
    }

    /// Timestamp as stored in the database.
    pub fn stored_timestamp(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    /// Timestamp as carried in URL path segments.
    pub fn url_timestamp(&self) -> String {
        url_timestamp(&self.timestamp)
    }
}

/// Subjective / Objective / Assessment / Plan notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SoapNotes {
    pub subjective: String,
    pub objective: String,
    pub assessment: String,
    pub plan: String,
}

/// Entry of the global diagnostic catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticCode {
    pub id: i64,
    pub description: String,
}

/// Entry of the global medication catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medication {
    pub name: String,
    pub lab: String,
}

/// Prescription as submitted for a (consultation, diagnostic) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionRequest {
    pub medication: Medication,
    pub dosage: String,
    pub description: String,
}

/// Prescription as shown in the consultation details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionLine {
    pub diagnostic_id: i64,
    pub name: String,
    pub lab: String,
    pub dosage: String,
    pub description: String,
}

/// Everything recorded about one consultation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationDetails {
    pub key: ConsultationKey,
    /// `None` until the SOAP step has been completed
    pub soap: Option<SoapNotes>,
    /// Names of assisting nurses
    pub nurses: Vec<String>,
    pub diagnostics: Vec<DiagnosticCode>,
    pub prescriptions: Vec<PrescriptionLine>,
}
