//! Booking, availability and appointment history pages.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Form;
use serde::Serialize;

use clinicdesk_core::models::{format_timestamp, parse_date_time, ClientAppointment};
use clinicdesk_core::{
    AppointmentRequest, AppointmentStatus, ClinicError, ConsultationKey, ConsultationStep,
    Scheduler,
};

use crate::error::WebError;
use crate::flash::Flash;
use crate::forms::{AppointmentForm, AvailabilityForm};
use crate::handlers::{recover, respond};
use crate::paths::{details_url, step_url};
use crate::render::{Notice, Page};
use crate::state::AppState;

fn booking_page(state: &AppState, client_vat: &str) -> Result<Page, WebError> {
    let db = state.open_db()?;
    let doctors = Scheduler::new(&db).doctors()?;
    let client = db.get_client(client_vat)?;
    Ok(Page::new("new_appointment")
        .with("vat", client_vat)?
        .with("client", &client)?
        .with("doctors", &doctors)?)
}

/// `GET /appointments/:vat`
pub async fn booking_form(
    State(state): State<AppState>,
    Path(client_vat): Path<String>,
    flash: Flash,
) -> Result<Response, WebError> {
    let page = booking_page(&state, &client_vat)?;
    respond(&state, page, flash)
}

/// `POST /appointments/:vat`
pub async fn book(
    State(state): State<AppState>,
    Path(client_vat): Path<String>,
    flash: Flash,
    Form(form): Form<AppointmentForm>,
) -> Result<Response, WebError> {
    let outcome = {
        let db = state.open_db()?;
        AppointmentRequest::parse(
            &client_vat,
            form.date.as_deref().unwrap_or_default(),
            form.time.as_deref().unwrap_or_default(),
            form.doctorvat,
            form.description,
        )
        .and_then(|request| Scheduler::new(&db).book(&request))
    };

    let page = booking_page(&state, &client_vat)?;
    let page = match outcome {
        Ok(appointment) => page
            .with("appointment", &appointment)?
            .notice(Notice::success("New appointment registered successfully!")),
        Err(err) => page.notice(recover(err)?),
    };
    respond(&state, page, flash)
}

/// `GET /available_doctors`
pub async fn availability_form(State(state): State<AppState>, flash: Flash) -> Result<Response, WebError> {
    respond(&state, Page::new("available_doctors"), flash)
}

/// `POST /available_doctors`
pub async fn available_doctors(
    State(state): State<AppState>,
    flash: Flash,
    Form(form): Form<AvailabilityForm>,
) -> Result<Response, WebError> {
    let date = form.date.unwrap_or_default();
    let time = form.time.unwrap_or_default();
    let page = Page::new("available_doctors")
        .with("date", &date)?
        .with("time", &time)?;

    let page = match parse_date_time(&date, &time) {
        Some(at) => {
            let db = state.open_db()?;
            match Scheduler::new(&db).available_doctors(at) {
                Ok(doctors) => page.with("available_doctors", &doctors)?,
                Err(err) => page.notice(recover(err)?),
            }
        }
        None => page.notice(recover(ClinicError::ValidationFailure(format!(
            "unparsable slot '{date} {time}'"
        )))?),
    };
    respond(&state, page, flash)
}

/// One row of the history page.
#[derive(Serialize)]
struct AppointmentRow<'a> {
    date_timestamp: String,
    doctor_vat: &'a str,
    doctor_name: &'a str,
    description: &'a str,
    status: AppointmentStatus,
    /// Details for attended appointments, SOAP entry otherwise
    consultation_url: String,
}

impl<'a> From<&'a ClientAppointment> for AppointmentRow<'a> {
    fn from(appointment: &'a ClientAppointment) -> Self {
        let key = ConsultationKey::new(appointment.doctor_vat.as_str(), appointment.timestamp);
        let consultation_url = match appointment.status {
            AppointmentStatus::Attended => details_url(&key),
            _ => step_url(ConsultationStep::Soap, &key),
        };
        Self {
            date_timestamp: format_timestamp(&appointment.timestamp),
            doctor_vat: &appointment.doctor_vat,
            doctor_name: &appointment.doctor_name,
            description: &appointment.description,
            status: appointment.status,
            consultation_url,
        }
    }
}

/// `GET /client/:vat/appointments`
pub async fn client_appointments(
    State(state): State<AppState>,
    Path(client_vat): Path<String>,
    flash: Flash,
) -> Result<Response, WebError> {
    let db = state.open_db()?;
    let now = chrono::Local::now().naive_local();
    let appointments = Scheduler::new(&db).client_appointments(&client_vat, now)?;
    let rows: Vec<AppointmentRow<'_>> = appointments.iter().map(AppointmentRow::from).collect();

    let page = Page::new("client_appointments")
        .with("vat", &client_vat)?
        .with("appointments", &rows)?;
    respond(&state, page, flash)
}
