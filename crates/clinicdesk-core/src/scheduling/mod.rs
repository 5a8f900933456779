//! Appointment scheduling.
//!
//! Booking: doctor check → exclusion-window check → insert, all in one
//! immediate transaction.

mod window;

pub use window::*;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{
    is_storable, non_blank, parse_date_time, Appointment, ClientAppointment, StaffMember,
};
use crate::{ClinicError, ClinicResult};

/// A booking request for one client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentRequest {
    pub client_vat: String,
    pub doctor_vat: String,
    pub timestamp: NaiveDateTime,
    pub description: String,
}

impl AppointmentRequest {
    /// Build a request from raw form values (`YYYY-MM-DD`, `HH:MM`).
    pub fn parse(
        client_vat: &str,
        date: &str,
        time: &str,
        doctor_vat: Option<String>,
        description: Option<String>,
    ) -> ClinicResult<Self> {
        let timestamp = parse_date_time(date, time).ok_or_else(|| {
            ClinicError::ValidationFailure(format!("unparsable appointment slot '{date} {time}'"))
        })?;
        let doctor_vat = non_blank(doctor_vat)
            .ok_or_else(|| ClinicError::ValidationFailure("doctor VAT is required".into()))?;

        Ok(Self {
            client_vat: client_vat.trim().to_string(),
            doctor_vat,
            timestamp,
            description: description.unwrap_or_default().trim().to_string(),
        })
    }
}

fn window_around(at: NaiveDateTime) -> ClinicResult<ExclusionWindow> {
    ExclusionWindow::around(at)
        .filter(|window| is_storable(&window.start) && is_storable(&window.end))
        .ok_or_else(|| ClinicError::ValidationFailure(format!("appointment slot {at} is out of range")))
}

/// Scheduling operations over one connection.
pub struct Scheduler<'a> {
    db: &'a Database,
}

impl<'a> Scheduler<'a> {
    /// Create a new scheduler.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Book an appointment if the doctor has nothing within an hour of the slot.
    pub fn book(&self, request: &AppointmentRequest) -> ClinicResult<Appointment> {
        self.db.atomically(|db| {
            if !db.doctor_exists(&request.doctor_vat)? {
                return Err(ClinicError::UnknownDoctor(request.doctor_vat.clone()));
            }
            if !db.client_exists(&request.client_vat)? {
                return Err(ClinicError::ValidationFailure(format!(
                    "no client registered with VAT {}",
                    request.client_vat
                )));
            }

            let window = window_around(request.timestamp)?;
            let conflicts = db.doctor_appointments_in_window(&request.doctor_vat, &window)?;
            if !conflicts.is_empty() {
                tracing::info!(
                    doctor_vat = %request.doctor_vat,
                    requested = %request.timestamp,
                    conflicts = conflicts.len(),
                    "appointment rejected: slot conflict"
                );
                return Err(ClinicError::SlotConflict {
                    doctor_vat: request.doctor_vat.clone(),
                    requested: request.timestamp,
                });
            }

            let appointment = Appointment {
                doctor_vat: request.doctor_vat.clone(),
                client_vat: request.client_vat.clone(),
                timestamp: request.timestamp,
                description: request.description.clone(),
            };
            db.insert_appointment(&appointment).map_err(|e| {
                ClinicError::from_insert(e, || ClinicError::SlotConflict {
                    doctor_vat: request.doctor_vat.clone(),
                    requested: request.timestamp,
                })
            })?;

            tracing::info!(
                doctor_vat = %appointment.doctor_vat,
                client_vat = %appointment.client_vat,
                at = %appointment.timestamp,
                "appointment booked"
            );
            Ok(appointment)
        })
    }

    /// Doctors with no appointment within an hour of `at`.
    pub fn available_doctors(&self, at: NaiveDateTime) -> ClinicResult<Vec<StaffMember>> {
        let window = window_around(at)?;
        Ok(self.db.list_available_doctors(&window)?)
    }

    /// All doctors, for booking forms.
    pub fn doctors(&self) -> ClinicResult<Vec<StaffMember>> {
        Ok(self.db.list_doctors()?)
    }

    /// A client's appointments with attendance status relative to `now`.
    pub fn client_appointments(
        &self,
        client_vat: &str,
        now: NaiveDateTime,
    ) -> ClinicResult<Vec<ClientAppointment>> {
        Ok(self.db.list_client_appointments(client_vat, now)?)
    }
}
