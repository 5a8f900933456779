//! Dashboard aggregates over the `facts_consultations` view.

use chrono::NaiveDate;

use crate::db::Database;
use crate::models::{
    parse_date, ClientConsultationCount, ConsultationFact, YearConsultationCount,
};
use crate::{ClinicError, ClinicResult};

/// An inclusive reporting interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    /// Parse `YYYY-MM-DD` bounds. Fails on unparsable or inverted bounds.
    pub fn parse(start: &str, end: &str) -> ClinicResult<Self> {
        let parse = |raw: &str| {
            parse_date(raw)
                .ok_or_else(|| ClinicError::ValidationFailure(format!("unparsable date '{raw}'")))
        };
        let interval = Self {
            start: parse(start)?,
            end: parse(end)?,
        };
        if interval.start > interval.end {
            return Err(ClinicError::ValidationFailure(format!(
                "interval starts after it ends: {} > {}",
                interval.start, interval.end
            )));
        }
        Ok(interval)
    }
}

/// Read-only reporting over one connection.
pub struct Dashboard<'a> {
    db: &'a Database,
}

impl<'a> Dashboard<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Every consultation row.
    pub fn consultations(&self) -> ClinicResult<Vec<ConsultationFact>> {
        Ok(self.db.list_consultation_facts()?)
    }

    pub fn total_consultations(&self) -> ClinicResult<i64> {
        let total = self.db.count_consultation_facts()?;
        tracing::debug!(total, "dashboard total computed");
        Ok(total)
    }

    pub fn by_client(&self) -> ClinicResult<Vec<ClientConsultationCount>> {
        Ok(self.db.count_consultations_by_client()?)
    }

    pub fn by_year(&self) -> ClinicResult<Vec<YearConsultationCount>> {
        Ok(self.db.count_consultations_by_year()?)
    }

    /// Consultation rows dated within the interval, bounds included.
    pub fn between(&self, interval: &DateInterval) -> ClinicResult<Vec<ConsultationFact>> {
        let facts = self
            .db
            .list_consultation_facts_between(interval.start, interval.end)?;
        tracing::debug!(
            start = %interval.start,
            end = %interval.end,
            rows = facts.len(),
            "dashboard interval computed"
        );
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_timestamp, Appointment, Client, ConsultationKey, DoctorProfile, Employee, SoapNotes};

    fn seed(db: &Database) {
        for (vat, zip) in [("111", "1000"), ("222", "4000")] {
            db.insert_client(&Client {
                vat: vat.into(),
                name: format!("Client {vat}"),
                birth_date: "1990-01-01".into(),
                street: "Rua".into(),
                city: "Lisboa".into(),
                zip: zip.into(),
                gender: "F".into(),
            })
            .unwrap();
        }
        db.insert_employee(&Employee {
            vat: "900".into(),
            name: "Dr. Silva".into(),
            birth_date: "1970-01-01".into(),
            street: "Rua".into(),
            city: "Lisboa".into(),
            zip: "1000".into(),
            iban: "PT50900".into(),
            salary: 4000.0,
        })
        .unwrap();
        db.insert_doctor(
            "900",
            &DoctorProfile {
                specialization: "GP".into(),
                biography: String::new(),
                email: "silva@clinic.test".into(),
            },
        )
        .unwrap();

        for (client, at) in [
            ("111", "2023-06-01 09:00"),
            ("111", "2024-01-10 10:00"),
            ("222", "2024-02-20 15:00"),
        ] {
            let timestamp = parse_timestamp(at).unwrap();
            db.insert_appointment(&Appointment {
                doctor_vat: "900".into(),
                client_vat: client.into(),
                timestamp,
                description: String::new(),
            })
            .unwrap();
            db.insert_consultation(&ConsultationKey::new("900", timestamp), &SoapNotes::default())
                .unwrap();
        }

        // Booked but never attended: not a consultation
        db.insert_appointment(&Appointment {
            doctor_vat: "900".into(),
            client_vat: "222".into(),
            timestamp: parse_timestamp("2024-03-01 09:00").unwrap(),
            description: String::new(),
        })
        .unwrap();
    }

    #[test]
    fn test_sections() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let dashboard = Dashboard::new(&db);

        assert_eq!(dashboard.total_consultations().unwrap(), 3);
        let consultations = dashboard.consultations().unwrap();
        assert_eq!(consultations.len(), 3);
        assert_eq!(consultations[0].date, "2023-06-01");
        assert_eq!(consultations[2].zip, "4000");

        let by_client: Vec<(String, i64)> = dashboard
            .by_client()
            .unwrap()
            .iter()
            .map(|c| (c.vat.clone(), c.total_consultations))
            .collect();
        assert_eq!(by_client, vec![("111".to_string(), 2), ("222".to_string(), 1)]);

        let by_year: Vec<(i32, i64)> = dashboard
            .by_year()
            .unwrap()
            .iter()
            .map(|y| (y.year, y.total_consultations))
            .collect();
        assert_eq!(by_year, vec![(2023, 1), (2024, 2)]);
    }

    #[test]
    fn test_empty_sections() {
        let db = Database::open_in_memory().unwrap();
        let dashboard = Dashboard::new(&db);
        assert_eq!(dashboard.total_consultations().unwrap(), 0);
        assert!(dashboard.consultations().unwrap().is_empty());
        assert!(dashboard.by_client().unwrap().is_empty());
        assert!(dashboard.by_year().unwrap().is_empty());
    }

    #[test]
    fn test_undated_row_fails_only_dated_sections() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        db.conn()
            .execute_batch(
                "INSERT INTO appointment (vat_doctor, date_timestamp, description, vat_client)
                     VALUES ('900', 'not a date', '', '111');
                 INSERT INTO consultation (vat_doctor, date_timestamp) VALUES ('900', 'not a date');",
            )
            .unwrap();
        let dashboard = Dashboard::new(&db);

        assert_eq!(dashboard.total_consultations().unwrap(), 4);
        assert_eq!(dashboard.by_client().unwrap()[0].total_consultations, 3);
        assert!(dashboard.consultations().is_err());
        assert!(dashboard.by_year().is_err());
    }

    #[test]
    fn test_interval_is_inclusive() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let dashboard = Dashboard::new(&db);

        let interval = DateInterval::parse("2024-01-10", "2024-02-20").unwrap();
        assert_eq!(dashboard.between(&interval).unwrap().len(), 2);

        let single_day = DateInterval::parse("2023-06-01", "2023-06-01").unwrap();
        assert_eq!(dashboard.between(&single_day).unwrap().len(), 1);
    }

    #[test]
    fn test_interval_parsing_errors() {
        assert!(matches!(
            DateInterval::parse("2024-02-01", "2024-01-01"),
            Err(ClinicError::ValidationFailure(_))
        ));
        assert!(matches!(
            DateInterval::parse("yesterday", "2024-01-01"),
            Err(ClinicError::ValidationFailure(_))
        ));
    }
}
