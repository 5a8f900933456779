//! Consultation entry workflow.
//!
//! Steps: SOAP notes → nurse assignment → diagnostic coding → prescription.
//! Every step that checks before it writes runs inside one immediate
//! transaction.

mod similarity;
mod steps;

pub use similarity::*;
pub use steps::*;

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{
    non_blank, ConsultationDetails, ConsultationKey, DiagnosticCode, Medication,
    PrescriptionRequest, SoapNotes, StaffMember,
};
use crate::{ClinicError, ClinicResult, LinkKind};

/// Result of the diagnostic step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticAssignment {
    pub code: DiagnosticCode,
    /// True when the description was new and a catalog entry was allocated
    pub created: bool,
    /// Existing description the new one closely resembles
    pub similar_to: Option<String>,
}

impl DiagnosticAssignment {
    /// Where the workflow continues.
    pub fn next_step(&self) -> ConsultationStep {
        ConsultationStep::Prescription {
            diagnostic_id: self.code.id,
        }
    }
}

/// Result of the prescription step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionOutcome {
    /// True when the medication/lab pair was added to the catalog
    pub medication_created: bool,
    /// Existing medication whose name closely resembles the new one
    pub similar_to: Option<Medication>,
}

/// Consultation workflow over one connection.
pub struct ConsultationWorkflow<'a> {
    db: &'a Database,
}

impl<'a> ConsultationWorkflow<'a> {
    /// Create a new workflow handle.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Step 1: record SOAP notes. Returns the step to continue with.
    pub fn record_soap(&self, key: &ConsultationKey, soap: &SoapNotes) -> ClinicResult<ConsultationStep> {
        self.db.insert_consultation(key, soap).map_err(|e| {
            ClinicError::from_insert(e, || ClinicError::DuplicateKey {
                entity: "Consultation",
                key: format!("{}/{}", key.doctor_vat, key.stored_timestamp()),
            })
        })?;
        tracing::info!(doctor_vat = %key.doctor_vat, at = %key.timestamp, "consultation recorded");
        Ok(ConsultationStep::Nurses)
    }

    /// Nurses that can still be assigned to the consultation.
    pub fn eligible_nurses(&self, key: &ConsultationKey) -> ClinicResult<Vec<StaffMember>> {
        Ok(self.db.list_nurses_not_assisting(key)?)
    }

    /// Step 2: assign an assisting nurse.
    pub fn assign_nurse(&self, key: &ConsultationKey, nurse_vat: &str) -> ClinicResult<StaffMember> {
        let nurse_vat = nurse_vat.trim();
        self.db.atomically(|db| {
            if db.is_nurse_assisting(key, nurse_vat)? {
                return Err(ClinicError::AlreadyAssisting(nurse_vat.to_string()));
            }

            let nurse = db
                .list_nurses_not_assisting(key)?
                .into_iter()
                .find(|n| n.vat == nurse_vat)
                .ok_or_else(|| ClinicError::UnknownNurse(nurse_vat.to_string()))?;

            db.insert_consultation_assistant(key, &nurse.vat).map_err(|e| {
                ClinicError::from_insert(e, || ClinicError::AlreadyAssisting(nurse.vat.clone()))
            })?;
            tracing::info!(doctor_vat = %key.doctor_vat, at = %key.timestamp, nurse_vat, "nurse assigned");
            Ok(nurse)
        })
    }

    /// Diagnostic catalog, for the selection list.
    pub fn diagnostic_catalog(&self) -> ClinicResult<Vec<DiagnosticCode>> {
        Ok(self.db.list_diagnostic_codes()?)
    }

    /// Step 3: link a diagnostic, allocating a catalog entry for new descriptions.
    pub fn assign_diagnostic(
        &self,
        key: &ConsultationKey,
        description: &str,
    ) -> ClinicResult<DiagnosticAssignment> {
        let description = non_blank(Some(description.to_string()))
            .ok_or_else(|| ClinicError::ValidationFailure("diagnostic description is required".into()))?;

        self.db.atomically(|db| {
            let (code, created, similar_to) = match db.find_diagnostic_by_description(&description)? {
                Some(code) => (code, false, None),
                None => {
                    let catalog = db.list_diagnostic_codes()?;
                    let similar_to = closest_match(
                        &description,
                        catalog.iter().map(|c| c.description.as_str()),
                    )
                    .map(str::to_string);

                    let code = DiagnosticCode {
                        id: db.next_diagnostic_id()?,
                        description: description.clone(),
                    };
                    db.insert_diagnostic_code(&code)
                        .map_err(|e| ClinicError::from_insert(e, || ClinicError::DuplicateKey {
                            entity: "Diagnostic code",
                            key: code.description.clone(),
                        }))?;
                    tracing::info!(id = code.id, description = %code.description, "diagnostic code allocated");
                    (code, true, similar_to)
                }
            };

            db.insert_consultation_diagnostic(key, code.id).map_err(|e| {
                ClinicError::from_insert(e, || ClinicError::DuplicateLink(LinkKind::Diagnostic))
            })?;

            Ok(DiagnosticAssignment {
                code,
                created,
                similar_to,
            })
        })
    }

    /// Medication catalog, for the selection list.
    pub fn medication_catalog(&self) -> ClinicResult<Vec<Medication>> {
        Ok(self.db.list_medications()?)
    }

    /// Step 4: prescribe a medication for one of the consultation's diagnostics.
    pub fn prescribe(
        &self,
        context: &PrescriptionContext,
        request: &PrescriptionRequest,
    ) -> ClinicResult<PrescriptionOutcome> {
        let medication = &request.medication;
        if medication.name.trim().is_empty()
            || medication.lab.trim().is_empty()
            || request.dosage.trim().is_empty()
        {
            return Err(ClinicError::ValidationFailure(
                "medication name, lab and dosage are required".into(),
            ));
        }

        self.db.atomically(|db| {
            let mut outcome = PrescriptionOutcome {
                medication_created: false,
                similar_to: None,
            };

            if !db.medication_exists(medication)? {
                let catalog = db.list_medications()?;
                outcome.similar_to = closest_match(
                    &medication.name,
                    catalog.iter().map(|m| m.name.as_str()),
                )
                .and_then(|name| catalog.iter().find(|m| m.name == name).cloned());

                db.insert_medication(medication)
                    .map_err(|e| ClinicError::from_insert(e, || ClinicError::DuplicateKey {
                        entity: "Medication",
                        key: format!("{}/{}", medication.name, medication.lab),
                    }))?;
                outcome.medication_created = true;
            }

            db.insert_prescription(&context.consultation, context.diagnostic_id, request)
                .map_err(|e| {
                    ClinicError::from_insert(e, || ClinicError::DuplicateLink(LinkKind::Prescription))
                })?;

            tracing::info!(
                doctor_vat = %context.consultation.doctor_vat,
                at = %context.consultation.timestamp,
                diagnostic_id = context.diagnostic_id,
                medication = %medication.name,
                "prescription recorded"
            );
            Ok(outcome)
        })
    }

    /// Everything recorded for one consultation.
    pub fn details(&self, key: &ConsultationKey) -> ClinicResult<ConsultationDetails> {
        Ok(ConsultationDetails {
            key: key.clone(),
            soap: self.db.get_soap_notes(key)?,
            nurses: self.db.list_assisting_nurse_names(key)?,
            diagnostics: self.db.list_consultation_diagnostics(key)?,
            prescriptions: self.db.list_consultation_prescriptions(key)?,
        })
    }
}
