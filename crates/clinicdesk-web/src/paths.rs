//! URL path parameters and links between pages.

use clinicdesk_core::models::parse_timestamp;
use clinicdesk_core::{ConsultationKey, ConsultationStep, PrescriptionContext};
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, CONTROLS};

use crate::error::WebError;

/// Bytes escaped inside one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(value: &str) -> PercentEncode<'_> {
    utf8_percent_encode(value, SEGMENT)
}

/// Parse the `{doctor_vat}/{date}` segments of a consultation route.
pub fn consultation_key(doctor_vat: &str, date: &str) -> Result<ConsultationKey, WebError> {
    let timestamp = parse_timestamp(date)
        .ok_or_else(|| WebError::BadRequest(format!("malformed consultation date '{date}'")))?;
    Ok(ConsultationKey::new(doctor_vat.trim(), timestamp))
}

/// Parse the `{diagnostic_id}/{doctor_vat}/{date}` segments of the prescription route.
pub fn prescription_context(
    diagnostic_id: &str,
    doctor_vat: &str,
    date: &str,
) -> Result<PrescriptionContext, WebError> {
    let diagnostic_id = diagnostic_id
        .parse()
        .map_err(|_| WebError::BadRequest(format!("malformed diagnostic id '{diagnostic_id}'")))?;
    Ok(PrescriptionContext {
        consultation: consultation_key(doctor_vat, date)?,
        diagnostic_id,
    })
}

/// Page handling `step` for the consultation.
pub fn step_url(step: ConsultationStep, key: &ConsultationKey) -> String {
    let (vat, date) = (segment(&key.doctor_vat), key.url_timestamp());
    match step {
        ConsultationStep::Soap => format!("/new_consultation_soap/{vat}/{date}"),
        ConsultationStep::Nurses => format!("/new_consultation_nurse/{vat}/{date}"),
        ConsultationStep::Diagnostic => format!("/new_consultation_diagnostic/{vat}/{date}"),
        ConsultationStep::Prescription { diagnostic_id } => {
            format!("/new_consultation_prescription/{diagnostic_id}/{vat}/{date}")
        }
    }
}

/// Manual "continue" link offered from `step`, if any.
pub fn next_step_url(step: ConsultationStep, key: &ConsultationKey) -> Option<String> {
    step.next().map(|next| step_url(next, key))
}

pub fn details_url(key: &ConsultationKey) -> String {
    format!(
        "/consultation_details/{}/{}",
        segment(&key.doctor_vat),
        key.url_timestamp()
    )
}

pub fn client_appointments_url(client_vat: &str) -> String {
    format!("/client/{}/appointments", segment(client_vat))
}

pub fn new_appointment_url(client_vat: &str) -> String {
    format!("/appointments/{}", segment(client_vat))
}
