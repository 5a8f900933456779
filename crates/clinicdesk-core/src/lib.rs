//! Clinicdesk Core Library
//!
//! Client registration, appointment scheduling and consultation records for a
//! small clinic, on top of SQLite.
//!
//! # Architecture
//!
//! ```text
//!  Client registry ──► Scheduler ──► Consultation workflow ──► Dashboard
//!  (register/search)   (±1h window)   SOAP → nurses →          (facts_consultations)
//!                                     diagnostic → prescription
//!                  \          |          /
//!                   └──── Database (one connection per scope) ────┘
//! ```
//!
//! Every check-then-write sequence runs inside [`Database::atomically`]
//! (`BEGIN IMMEDIATE`), so concurrent requests cannot interleave between the
//! check and the write.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer and embedded schema
//! - [`models`]: Domain types (Client, Appointment, ConsultationKey, etc.)
//! - [`registry`]: Client registration and search
//! - [`scheduling`]: Exclusion window, booking, availability, attendance status
//! - [`workflow`]: Consultation entry steps
//! - [`reporting`]: Dashboard aggregates

pub mod db;
pub mod models;
pub mod registry;
pub mod reporting;
pub mod scheduling;
pub mod workflow;

use std::fmt;

use chrono::NaiveDateTime;

// Re-export commonly used types
pub use db::{Database, DbError, DbResult};
pub use models::{
    Appointment, AppointmentStatus, Client, ClientFilter, ClientSearch, ConsultationKey,
    SoapNotes,
};
pub use registry::ClientRegistry;
pub use reporting::{Dashboard, DateInterval};
pub use scheduling::{AppointmentRequest, ExclusionWindow, Scheduler};
pub use workflow::{ConsultationStep, ConsultationWorkflow, PrescriptionContext};

/// Which workflow link was submitted twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Diagnostic,
    Prescription,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Diagnostic => f.write_str("diagnostic"),
            LinkKind::Prescription => f.write_str("prescription"),
        }
    }
}

/// Errors surfaced by clinic operations.
///
/// Everything except [`ClinicError::Database`] is recoverable: the form is
/// shown again with [`ClinicError::user_message`] as a notice.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("{entity} already exists: {key}")]
    DuplicateKey { entity: &'static str, key: String },

    #[error("Validation failure: {0}")]
    ValidationFailure(String),

    #[error("Unknown doctor: {0}")]
    UnknownDoctor(String),

    #[error("Unknown nurse: {0}")]
    UnknownNurse(String),

    #[error("Doctor {doctor_vat} already has an appointment within an hour of {requested}")]
    SlotConflict {
        doctor_vat: String,
        requested: NaiveDateTime,
    },

    #[error("Nurse {0} is already assisting this consultation")]
    AlreadyAssisting(String),

    #[error("The {0} is already linked to this consultation")]
    DuplicateLink(LinkKind),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type ClinicResult<T> = Result<T, ClinicError>;

impl ClinicError {
    /// Classify a failed INSERT: unique violations become `duplicate`,
    /// anything else a validation failure.
    pub fn from_insert(err: DbError, duplicate: impl FnOnce() -> ClinicError) -> Self {
        if err.is_unique_violation() {
            duplicate()
        } else {
            ClinicError::ValidationFailure(err.to_string())
        }
    }

    /// False only for infrastructure failures.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ClinicError::Database(_))
    }

    /// Notice shown to the user. Never contains internal detail.
    pub fn user_message(&self) -> String {
        match self {
            ClinicError::DuplicateKey { entity, .. } => format!("{entity} already exists"),
            ClinicError::ValidationFailure(_) => "Check your inputs. Try again!".to_string(),
            ClinicError::UnknownDoctor(_) => "Incorrect Doctor VAT inserted".to_string(),
            ClinicError::UnknownNurse(_) => {
                "The following VAT does not correspond to a nurse.".to_string()
            }
            ClinicError::SlotConflict { .. } => {
                "Overlapping appointments for the selected doctor. Choose a different time."
                    .to_string()
            }
            ClinicError::AlreadyAssisting(_) => {
                "That nurse is already registered as assisting that consultation".to_string()
            }
            ClinicError::DuplicateLink(LinkKind::Diagnostic) => {
                "The inserted diagnostic has already been linked to this consultation.".to_string()
            }
            ClinicError::DuplicateLink(LinkKind::Prescription) => {
                "The medication inserted has already been prescribed for this consultation diagnostic."
                    .to_string()
            }
            ClinicError::Database(_) => {
                "Something went wrong. Try to refresh the page and repeat.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_insert_classifies_unique_violation() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute("INSERT INTO medication (name, lab) VALUES ('A', 'L')", [])
            .unwrap();
        let err: DbError = db
            .conn()
            .execute("INSERT INTO medication (name, lab) VALUES ('A', 'L')", [])
            .unwrap_err()
            .into();

        let classified = ClinicError::from_insert(err, || ClinicError::DuplicateKey {
            entity: "Medication",
            key: "A/L".into(),
        });
        assert!(matches!(classified, ClinicError::DuplicateKey { .. }));
        assert_eq!(classified.user_message(), "Medication already exists");
    }

    #[test]
    fn test_from_insert_other_failures_are_validation() {
        let db = Database::open_in_memory().unwrap();
        let err: DbError = db
            .conn()
            .execute("INSERT INTO nurse (vat) VALUES ('404')", [])
            .unwrap_err()
            .into();

        let classified = ClinicError::from_insert(err, || unreachable!());
        assert!(matches!(classified, ClinicError::ValidationFailure(_)));
        assert!(classified.is_recoverable());
        assert_eq!(classified.user_message(), "Check your inputs. Try again!");
    }

    #[test]
    fn test_database_errors_are_not_recoverable() {
        let err = ClinicError::Database(DbError::InvalidValue("bad".into()));
        assert!(!err.is_recoverable());
        assert!(!err.user_message().contains("bad"));
    }
}
