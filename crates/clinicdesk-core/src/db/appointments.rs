//! Appointment database operations.

use chrono::NaiveDateTime;
use rusqlite::params;

use super::{Database, DbError, DbResult};
use crate::models::{
    format_timestamp, parse_timestamp, Appointment, AppointmentStatus, ClientAppointment,
};
use crate::scheduling::ExclusionWindow;

impl Database {
    /// Insert a new appointment.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointment (vat_doctor, date_timestamp, description, vat_client)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                appointment.doctor_vat,
                format_timestamp(&appointment.timestamp),
                appointment.description,
                appointment.client_vat,
            ],
        )?;
        Ok(())
    }

    /// Timestamps of a doctor's appointments that fall inside the window (bounds inclusive).
    pub fn doctor_appointments_in_window(
        &self,
        doctor_vat: &str,
        window: &ExclusionWindow,
    ) -> DbResult<Vec<NaiveDateTime>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT date_timestamp
            FROM appointment
            WHERE vat_doctor = ?1 AND date_timestamp BETWEEN ?2 AND ?3
            ORDER BY date_timestamp
            "#,
        )?;

        let rows = stmt.query_map(
            params![
                doctor_vat,
                format_timestamp(&window.start),
                format_timestamp(&window.end)
            ],
            |row| row.get::<_, String>(0),
        )?;

        let mut timestamps = Vec::new();
        for row in rows {
            timestamps.push(stored_timestamp(&row?)?);
        }
        Ok(timestamps)
    }

    /// A client's appointments, newest first, with status derived against `now`.
    pub fn list_client_appointments(
        &self,
        client_vat: &str,
        now: NaiveDateTime,
    ) -> DbResult<Vec<ClientAppointment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT a.date_timestamp, a.vat_doctor, e.name, a.description,
                   c.date_timestamp IS NOT NULL AS has_consultation
            FROM appointment a
            JOIN employee e ON e.vat = a.vat_doctor
            LEFT JOIN consultation c
                ON c.vat_doctor = a.vat_doctor AND c.date_timestamp = a.date_timestamp
            WHERE a.vat_client = ?
            ORDER BY a.date_timestamp DESC
            "#,
        )?;

        let rows = stmt.query_map([client_vat], |row| {
            Ok(HistoryRow {
                timestamp: row.get(0)?,
                doctor_vat: row.get(1)?,
                doctor_name: row.get(2)?,
                description: row.get(3)?,
                has_consultation: row.get(4)?,
            })
        })?;

        let mut appointments = Vec::new();
        for row in rows {
            let row = row?;
            let timestamp = stored_timestamp(&row.timestamp)?;
            appointments.push(ClientAppointment {
                timestamp,
                doctor_vat: row.doctor_vat,
                doctor_name: row.doctor_name,
                description: row.description,
                status: AppointmentStatus::derive(timestamp, row.has_consultation, now),
            });
        }
        tracing::debug!(client_vat, count = appointments.len(), "client appointments");
        Ok(appointments)
    }
}

/// Intermediate row struct for database mapping.
struct HistoryRow {
    timestamp: String,
    doctor_vat: String,
    doctor_name: String,
    description: String,
    has_consultation: bool,
}

fn stored_timestamp(value: &str) -> DbResult<NaiveDateTime> {
    parse_timestamp(value)
        .ok_or_else(|| DbError::InvalidValue(format!("timestamp '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, DoctorProfile, Employee};
    use crate::scheduling::EXCLUSION_RADIUS_MINUTES;
    use chrono::Duration;
    use proptest::prelude::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.insert_client(&Client {
            vat: "111222333".into(),
            name: "Alice".into(),
            birth_date: "1990-05-17".into(),
            street: "Rua Augusta".into(),
            city: "Lisboa".into(),
            zip: "1100-048".into(),
            gender: "F".into(),
        })
        .unwrap();
        db.insert_employee(&Employee {
            vat: "999888777".into(),
            name: "Dr. Silva".into(),
            birth_date: "1970-01-01".into(),
            street: "Rua B".into(),
            city: "Lisboa".into(),
            zip: "1000".into(),
            iban: "PT50999".into(),
            salary: 4000.0,
        })
        .unwrap();
        db.insert_doctor(
            "999888777",
            &DoctorProfile {
                specialization: "GP".into(),
                biography: String::new(),
                email: "silva@clinic.test".into(),
            },
        )
        .unwrap();
        db
    }

    fn appointment(at: &str) -> Appointment {
        Appointment {
            doctor_vat: "999888777".into(),
            client_vat: "111222333".into(),
            timestamp: ts(at),
            description: "Check-up".into(),
        }
    }

    fn window(at: &str) -> ExclusionWindow {
        ExclusionWindow::around(ts(at)).unwrap()
    }

    #[test]
    fn test_window_query_includes_both_bounds() {
        let db = setup_db();
        for at in [
            "2024-01-10 08:59",
            "2024-01-10 09:00",
            "2024-01-10 11:00",
            "2024-01-10 11:01",
        ] {
            db.insert_appointment(&appointment(at)).unwrap();
        }

        let hits = db
            .doctor_appointments_in_window("999888777", &window("2024-01-10 10:00"))
            .unwrap();
        assert_eq!(hits, vec![ts("2024-01-10 09:00"), ts("2024-01-10 11:00")]);
    }

    #[test]
    fn test_window_query_is_per_doctor() {
        let db = setup_db();
        db.insert_appointment(&appointment("2024-01-10 10:00")).unwrap();
        let hits = db
            .doctor_appointments_in_window("555444333", &window("2024-01-10 10:00"))
            .unwrap();
        assert!(hits.is_empty());
    }

    proptest! {
        #[test]
        fn prop_window_hit_iff_within_an_hour(offset_min in -600i64..600) {
            let db = setup_db();
            db.insert_appointment(&appointment("2024-01-10 10:00")).unwrap();

            let requested = ts("2024-01-10 10:00") + Duration::minutes(offset_min);
            let window = ExclusionWindow::around(requested).unwrap();
            let hits = db.doctor_appointments_in_window("999888777", &window).unwrap();
            prop_assert_eq!(!hits.is_empty(), offset_min.abs() <= EXCLUSION_RADIUS_MINUTES);
        }

        #[test]
        fn prop_available_doctors_agrees_with_window(offset_min in -180i64..180) {
            let db = setup_db();
            db.insert_appointment(&appointment("2024-01-10 10:00")).unwrap();

            let requested = ts("2024-01-10 10:00") + Duration::minutes(offset_min);
            let window = ExclusionWindow::around(requested).unwrap();
            let conflicts = db.doctor_appointments_in_window("999888777", &window).unwrap();
            let free = db.list_available_doctors(&window).unwrap();
            prop_assert_eq!(free.is_empty(), !conflicts.is_empty());
        }
    }

    #[test]
    fn test_client_history_statuses() {
        let db = setup_db();
        db.insert_appointment(&appointment("2024-01-10 10:00")).unwrap();
        db.insert_appointment(&appointment("2024-02-10 10:00")).unwrap();
        db.insert_appointment(&appointment("2024-09-10 10:00")).unwrap();
        db.conn()
            .execute(
                "INSERT INTO consultation (vat_doctor, date_timestamp) VALUES ('999888777', '2024-01-10 10:00:00')",
                [],
            )
            .unwrap();

        let history = db
            .list_client_appointments("111222333", ts("2024-06-01 00:00"))
            .unwrap();
        let statuses: Vec<_> = history.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                AppointmentStatus::Scheduled,
                AppointmentStatus::NotAttended,
                AppointmentStatus::Attended,
            ]
        );
        assert_eq!(history[0].doctor_name, "Dr. Silva");
    }
}
