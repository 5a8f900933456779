//! Read-only aggregates over the `facts_consultations` view.

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{Database, DbResult};
use crate::models::{ClientConsultationCount, ConsultationFact, YearConsultationCount, DATE_FORMAT};

const FACT_COLUMNS: &str =
    "vat, vat_doctor, date, zip, num_nurses, num_diagnostic_codes, num_prescriptions";

fn fact_from_row(row: &Row<'_>) -> rusqlite::Result<ConsultationFact> {
    Ok(ConsultationFact {
        vat: row.get(0)?,
        doctor_vat: row.get(1)?,
        date: row.get(2)?,
        zip: row.get(3)?,
        num_nurses: row.get(4)?,
        num_diagnostic_codes: row.get(5)?,
        num_prescriptions: row.get(6)?,
    })
}

impl Database {
    /// Every consultation fact, by date.
    pub fn list_consultation_facts(&self) -> DbResult<Vec<ConsultationFact>> {
        let sql = format!("SELECT {FACT_COLUMNS} FROM facts_consultations ORDER BY date, vat");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], fact_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Consultation facts dated within `[start, end]`.
    pub fn list_consultation_facts_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<ConsultationFact>> {
        let sql = format!(
            "SELECT {FACT_COLUMNS} FROM facts_consultations WHERE date BETWEEN ?1 AND ?2 ORDER BY date, vat"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string()
            ],
            fact_from_row,
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Total number of recorded consultations.
    pub fn count_consultation_facts(&self) -> DbResult<i64> {
        let total: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM facts_consultations", [], |row| row.get(0))?;
        Ok(total)
    }

    /// Consultation counts grouped by client.
    pub fn count_consultations_by_client(&self) -> DbResult<Vec<ClientConsultationCount>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT vat, COUNT(*) AS total_consultations
            FROM facts_consultations
            GROUP BY vat
            ORDER BY vat
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ClientConsultationCount {
                vat: row.get(0)?,
                total_consultations: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Consultation counts grouped by calendar year.
    pub fn count_consultations_by_year(&self) -> DbResult<Vec<YearConsultationCount>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT CAST(strftime('%Y', date) AS INTEGER) AS year, COUNT(*) AS total_consultations
            FROM facts_consultations
            GROUP BY year
            ORDER BY year
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(YearConsultationCount {
                year: row.get(0)?,
                total_consultations: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
