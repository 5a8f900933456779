//! Reporting rows read from `facts_consultations`.

use serde::{Deserialize, Serialize};

/// One recorded consultation, flattened for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationFact {
    /// Client VAT
    pub vat: String,
    pub doctor_vat: String,
    /// Consultation date (YYYY-MM-DD)
    pub date: String,
    /// Client zip code
    pub zip: String,
    pub num_nurses: i64,
    pub num_diagnostic_codes: i64,
    pub num_prescriptions: i64,
}

/// Consultation count for one client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConsultationCount {
    pub vat: String,
    pub total_consultations: i64,
}

/// Consultation count for one calendar year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearConsultationCount {
    pub year: i32,
    pub total_consultations: i64,
}
