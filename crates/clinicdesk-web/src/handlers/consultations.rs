//! Consultation entry workflow and detail pages.
//!
//! SOAP and diagnostic submissions redirect onwards on success; nurse and
//! prescription submissions stay on their page so several can be entered.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Form;

use clinicdesk_core::workflow::{DiagnosticAssignment, PrescriptionOutcome};
use clinicdesk_core::{ConsultationKey, ConsultationStep, ConsultationWorkflow, PrescriptionContext};

use crate::error::WebError;
use crate::flash::{redirect_with, Flash};
use crate::forms::{DiagnosticForm, NurseForm, PrescriptionForm, SoapForm};
use crate::handlers::{recover, respond};
use crate::paths::{consultation_key, details_url, next_step_url, prescription_context, step_url};
use crate::render::{Notice, Page};
use crate::state::AppState;

/// Values every workflow page carries.
fn step_page(template: &'static str, step: ConsultationStep, key: &ConsultationKey) -> Result<Page, WebError> {
    Page::new(template)
        .with("step", &step)?
        .with("vat_doctor", &key.doctor_vat)?
        .with("consultation_date", &key.url_timestamp())?
        .with("submit_url", &step_url(step, key))?
        .with("next_url", &next_step_url(step, key))?
        .with("details_url", &details_url(key))
        .map_err(WebError::from)
}

/// `GET /consultation_details/:doctor_vat/:date`
pub async fn details(
    State(state): State<AppState>,
    Path((doctor_vat, date)): Path<(String, String)>,
    flash: Flash,
) -> Result<Response, WebError> {
    let key = consultation_key(&doctor_vat, &date)?;
    let db = state.open_db()?;
    let details = ConsultationWorkflow::new(&db).details(&key)?;

    let page = Page::new("consultation_details")
        .with("vat_doctor", &key.doctor_vat)?
        .with("consultation_date", &key.url_timestamp())?
        .with("soap_notes", &details.soap)?
        .with("nurses", &details.nurses)?
        .with("diagnostic_codes", &details.diagnostics)?
        .with("prescriptions", &details.prescriptions)?;
    respond(&state, page, flash)
}

/// `GET /new_consultation_soap/:doctor_vat/:date`
pub async fn soap_form(
    State(state): State<AppState>,
    Path((doctor_vat, date)): Path<(String, String)>,
    flash: Flash,
) -> Result<Response, WebError> {
    let key = consultation_key(&doctor_vat, &date)?;
    let page = step_page("new_consultation_soap", ConsultationStep::Soap, &key)?;
    respond(&state, page, flash)
}

/// `POST /new_consultation_soap/:doctor_vat/:date`
pub async fn record_soap(
    State(state): State<AppState>,
    Path((doctor_vat, date)): Path<(String, String)>,
    flash: Flash,
    Form(form): Form<SoapForm>,
) -> Result<Response, WebError> {
    let key = consultation_key(&doctor_vat, &date)?;
    let notes = form.into_notes();
    let db = state.open_db()?;

    match ConsultationWorkflow::new(&db).record_soap(&key, &notes) {
        Ok(next) => redirect_with(
            &state,
            &step_url(next, &key),
            &[Notice::success("Consultation notes recorded.")],
        ),
        Err(err) => {
            let page = step_page("new_consultation_soap", ConsultationStep::Soap, &key)?
                .with("form", &notes)?
                .notice(recover(err)?);
            respond(&state, page, flash)
        }
    }
}

fn nurse_page(workflow: &ConsultationWorkflow<'_>, key: &ConsultationKey) -> Result<Page, WebError> {
    let nurses = workflow.eligible_nurses(key)?;
    step_page("new_consultation_nurse", ConsultationStep::Nurses, key)?.with("nurses", &nurses)
        .map_err(WebError::from)
}

/// `GET /new_consultation_nurse/:doctor_vat/:date`
pub async fn nurse_form(
    State(state): State<AppState>,
    Path((doctor_vat, date)): Path<(String, String)>,
    flash: Flash,
) -> Result<Response, WebError> {
    let key = consultation_key(&doctor_vat, &date)?;
    let db = state.open_db()?;
    let page = nurse_page(&ConsultationWorkflow::new(&db), &key)?;
    respond(&state, page, flash)
}

/// `POST /new_consultation_nurse/:doctor_vat/:date`
pub async fn assign_nurse(
    State(state): State<AppState>,
    Path((doctor_vat, date)): Path<(String, String)>,
    flash: Flash,
    Form(form): Form<NurseForm>,
) -> Result<Response, WebError> {
    let key = consultation_key(&doctor_vat, &date)?;
    let db = state.open_db()?;
    let workflow = ConsultationWorkflow::new(&db);

    let notice = match workflow.assign_nurse(&key, form.input_nurse_vat.as_deref().unwrap_or_default()) {
        Ok(nurse) => Notice::success(format!(
            "Nurse with VAT {} successfully registered as assisting in the consultation!",
            nurse.vat
        )),
        Err(err) => recover(err)?,
    };
    // Listed after the write so the assigned nurse drops out
    let page = nurse_page(&workflow, &key)?.notice(notice);
    respond(&state, page, flash)
}

fn diagnostic_page(workflow: &ConsultationWorkflow<'_>, key: &ConsultationKey) -> Result<Page, WebError> {
    let catalog = workflow.diagnostic_catalog()?;
    step_page("new_consultation_diagnostic", ConsultationStep::Diagnostic, key)?
        .with("diagnostic_list", &catalog)
        .map_err(WebError::from)
}

/// `GET /new_consultation_diagnostic/:doctor_vat/:date`
pub async fn diagnostic_form(
    State(state): State<AppState>,
    Path((doctor_vat, date)): Path<(String, String)>,
    flash: Flash,
) -> Result<Response, WebError> {
    let key = consultation_key(&doctor_vat, &date)?;
    let db = state.open_db()?;
    let page = diagnostic_page(&ConsultationWorkflow::new(&db), &key)?;
    respond(&state, page, flash)
}

fn diagnostic_notices(assignment: &DiagnosticAssignment) -> Vec<Notice> {
    let mut notices = vec![Notice::success(format!(
        "Diagnostic '{}' linked to the consultation.",
        assignment.code.description
    ))];
    if let Some(similar) = &assignment.similar_to {
        notices.push(Notice::info(format!(
            "New diagnostic code {} created; it looks similar to the existing '{similar}'.",
            assignment.code.id
        )));
    }
    notices
}

/// `POST /new_consultation_diagnostic/:doctor_vat/:date`
pub async fn assign_diagnostic(
    State(state): State<AppState>,
    Path((doctor_vat, date)): Path<(String, String)>,
    flash: Flash,
    Form(form): Form<DiagnosticForm>,
) -> Result<Response, WebError> {
    let key = consultation_key(&doctor_vat, &date)?;
    let db = state.open_db()?;
    let workflow = ConsultationWorkflow::new(&db);

    match workflow.assign_diagnostic(&key, form.input_diagnostic.as_deref().unwrap_or_default()) {
        Ok(assignment) => redirect_with(
            &state,
            &step_url(assignment.next_step(), &key),
            &diagnostic_notices(&assignment),
        ),
        Err(err) => {
            let notice = recover(err)?;
            let page = diagnostic_page(&workflow, &key)?.notice(notice);
            respond(&state, page, flash)
        }
    }
}

fn prescription_page(
    workflow: &ConsultationWorkflow<'_>,
    context: &PrescriptionContext,
) -> Result<Page, WebError> {
    let catalog = workflow.medication_catalog()?;
    step_page("new_consultation_prescription", context.step(), &context.consultation)?
        .with("diagnostic_id", &context.diagnostic_id)?
        .with("med_lab_list", &catalog)
        .map_err(WebError::from)
}

/// `GET /new_consultation_prescription/:diagnostic_id/:doctor_vat/:date`
pub async fn prescription_form(
    State(state): State<AppState>,
    Path((diagnostic_id, doctor_vat, date)): Path<(String, String, String)>,
    flash: Flash,
) -> Result<Response, WebError> {
    let context = prescription_context(&diagnostic_id, &doctor_vat, &date)?;
    let db = state.open_db()?;
    let page = prescription_page(&ConsultationWorkflow::new(&db), &context)?;
    respond(&state, page, flash)
}

fn prescription_notices(outcome: &PrescriptionOutcome, medication: &str) -> Vec<Notice> {
    let mut notices = vec![Notice::success(format!("Prescription of {medication} recorded."))];
    if let Some(similar) = &outcome.similar_to {
        notices.push(Notice::info(format!(
            "{medication} was added to the catalog; it looks similar to the existing {} ({}).",
            similar.name, similar.lab
        )));
    }
    notices
}

/// `POST /new_consultation_prescription/:diagnostic_id/:doctor_vat/:date`
pub async fn prescribe(
    State(state): State<AppState>,
    Path((diagnostic_id, doctor_vat, date)): Path<(String, String, String)>,
    flash: Flash,
    Form(form): Form<PrescriptionForm>,
) -> Result<Response, WebError> {
    let context = prescription_context(&diagnostic_id, &doctor_vat, &date)?;
    let request = form.into_request();
    let db = state.open_db()?;
    let workflow = ConsultationWorkflow::new(&db);

    let notices = match workflow.prescribe(&context, &request) {
        Ok(outcome) => prescription_notices(&outcome, &request.medication.name),
        Err(err) => vec![recover(err)?],
    };
    let mut page = prescription_page(&workflow, &context)?;
    for notice in notices {
        page = page.notice(notice);
    }
    respond(&state, page, flash)
}
