//! Consultation database operations: SOAP notes, assistants, diagnostics, prescriptions.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{ConsultationKey, DiagnosticCode, PrescriptionLine, PrescriptionRequest, SoapNotes};

impl Database {
    /// Insert the consultation row with its SOAP notes.
    pub fn insert_consultation(&self, key: &ConsultationKey, soap: &SoapNotes) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO consultation (vat_doctor, date_timestamp, soap_s, soap_o, soap_a, soap_p)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                key.doctor_vat,
                key.stored_timestamp(),
                soap.subjective,
                soap.objective,
                soap.assessment,
                soap.plan,
            ],
        )?;
        Ok(())
    }

    /// Get the SOAP notes of a consultation, if it was recorded.
    pub fn get_soap_notes(&self, key: &ConsultationKey) -> DbResult<Option<SoapNotes>> {
        self.conn
            .query_row(
                r#"
                SELECT soap_s, soap_o, soap_a, soap_p
                FROM consultation
                WHERE vat_doctor = ?1 AND date_timestamp = ?2
                "#,
                params![key.doctor_vat, key.stored_timestamp()],
                |row| {
                    Ok(SoapNotes {
                        subjective: row.get(0)?,
                        objective: row.get(1)?,
                        assessment: row.get(2)?,
                        plan: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Check whether a nurse is already assisting the consultation.
    pub fn is_nurse_assisting(&self, key: &ConsultationKey, nurse_vat: &str) -> DbResult<bool> {
        let exists: bool = self.conn.query_row(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM consultation_assistant
                WHERE vat_doctor = ?1 AND date_timestamp = ?2 AND vat_nurse = ?3
            )
            "#,
            params![key.doctor_vat, key.stored_timestamp(), nurse_vat],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Record a nurse as assisting the consultation.
    pub fn insert_consultation_assistant(&self, key: &ConsultationKey, nurse_vat: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO consultation_assistant (vat_doctor, date_timestamp, vat_nurse) VALUES (?1, ?2, ?3)",
            params![key.doctor_vat, key.stored_timestamp(), nurse_vat],
        )?;
        Ok(())
    }

    /// Names of the nurses assisting the consultation.
    pub fn list_assisting_nurse_names(&self, key: &ConsultationKey) -> DbResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT e.name
            FROM consultation_assistant ca
            JOIN employee e ON e.vat = ca.vat_nurse
            WHERE ca.vat_doctor = ?1 AND ca.date_timestamp = ?2
            ORDER BY e.name
            "#,
        )?;

        let rows = stmt.query_map(params![key.doctor_vat, key.stored_timestamp()], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Link a diagnostic code to the consultation.
    pub fn insert_consultation_diagnostic(&self, key: &ConsultationKey, diagnostic_id: i64) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO consultation_diagnostic (vat_doctor, date_timestamp, id) VALUES (?1, ?2, ?3)",
            params![key.doctor_vat, key.stored_timestamp(), diagnostic_id],
        )?;
        Ok(())
    }

    /// Diagnostic codes linked to the consultation.
    pub fn list_consultation_diagnostics(&self, key: &ConsultationKey) -> DbResult<Vec<DiagnosticCode>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT d.id, d.description
            FROM consultation_diagnostic cd
            JOIN diagnostic_code d ON d.id = cd.id
            WHERE cd.vat_doctor = ?1 AND cd.date_timestamp = ?2
            ORDER BY d.id
            "#,
        )?;

        let rows = stmt.query_map(params![key.doctor_vat, key.stored_timestamp()], |row| {
            Ok(DiagnosticCode {
                id: row.get(0)?,
                description: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Insert a prescription for a (consultation, diagnostic) pair.
    pub fn insert_prescription(
        &self,
        key: &ConsultationKey,
        diagnostic_id: i64,
        prescription: &PrescriptionRequest,
    ) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO prescription (vat_doctor, date_timestamp, id, name, lab, dosage, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                key.doctor_vat,
                key.stored_timestamp(),
                diagnostic_id,
                prescription.medication.name,
                prescription.medication.lab,
                prescription.dosage,
                prescription.description,
            ],
        )?;
        Ok(())
    }

    /// Prescriptions issued during the consultation.
    pub fn list_consultation_prescriptions(&self, key: &ConsultationKey) -> DbResult<Vec<PrescriptionLine>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.id, m.name, m.lab, p.dosage, p.description
            FROM prescription p
            JOIN medication m ON m.name = p.name AND m.lab = p.lab
            WHERE p.vat_doctor = ?1 AND p.date_timestamp = ?2
            ORDER BY p.id, m.name
            "#,
        )?;

        let rows = stmt.query_map(params![key.doctor_vat, key.stored_timestamp()], |row| {
            Ok(PrescriptionLine {
                diagnostic_id: row.get(0)?,
                name: row.get(1)?,
                lab: row.get(2)?,
                dosage: row.get(3)?,
                description: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
