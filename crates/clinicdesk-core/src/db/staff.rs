//! Employee, doctor and nurse database operations.

use rusqlite::params;

use super::{Database, DbResult};
use crate::models::{format_timestamp, ConsultationKey, DoctorProfile, Employee, StaffMember};
use crate::scheduling::ExclusionWindow;

impl Database {
    /// Insert a new employee.
    pub fn insert_employee(&self, employee: &Employee) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO employee (vat, name, birth_date, street, city, zip, iban, salary)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                employee.vat,
                employee.name,
                employee.birth_date,
                employee.street,
                employee.city,
                employee.zip,
                employee.iban,
                employee.salary,
            ],
        )?;
        Ok(())
    }

    /// Register an existing employee as a doctor.
    pub fn insert_doctor(&self, vat: &str, profile: &DoctorProfile) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO doctor (vat, specialization, biography, email) VALUES (?1, ?2, ?3, ?4)",
            params![vat, profile.specialization, profile.biography, profile.email],
        )?;
        Ok(())
    }

    /// Register an existing employee as a nurse.
    pub fn insert_nurse(&self, vat: &str) -> DbResult<()> {
        self.conn
            .execute("INSERT INTO nurse (vat) VALUES (?)", [vat])?;
        Ok(())
    }

    /// Check whether a VAT belongs to a doctor.
    pub fn doctor_exists(&self, vat: &str) -> DbResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM doctor WHERE vat = ?)",
            [vat],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// List all doctors by name.
    pub fn list_doctors(&self) -> DbResult<Vec<StaffMember>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT d.vat, e.name
            FROM doctor d
            JOIN employee e ON e.vat = d.vat
            ORDER BY e.name
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(StaffMember {
                vat: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Doctors with no appointment inside the window, by name.
    pub fn list_available_doctors(&self, window: &ExclusionWindow) -> DbResult<Vec<StaffMember>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT d.vat, e.name
            FROM doctor d
            JOIN employee e ON e.vat = d.vat
            WHERE d.vat NOT IN (
                SELECT a.vat_doctor
                FROM appointment a
                WHERE a.date_timestamp BETWEEN ?1 AND ?2
            )
            ORDER BY e.name
            "#,
        )?;

        let rows = stmt.query_map(
            params![format_timestamp(&window.start), format_timestamp(&window.end)],
            |row| {
                Ok(StaffMember {
                    vat: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Nurses not yet assisting the consultation, by name.
    pub fn list_nurses_not_assisting(&self, key: &ConsultationKey) -> DbResult<Vec<StaffMember>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT n.vat, e.name
            FROM nurse n
            JOIN employee e ON e.vat = n.vat
            WHERE n.vat NOT IN (
                SELECT vat_nurse
                FROM consultation_assistant
                WHERE vat_doctor = ?1 AND date_timestamp = ?2
            )
            ORDER BY e.name
            "#,
        )?;

        let rows = stmt.query_map(params![key.doctor_vat, key.stored_timestamp()], |row| {
            Ok(StaffMember {
                vat: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(vat: &str, name: &str) -> Employee {
        Employee {
            vat: vat.into(),
            name: name.into(),
            birth_date: "1975-03-02".into(),
            street: "Av. da Liberdade".into(),
            city: "Lisboa".into(),
            zip: "1250-096".into(),
            iban: format!("PT50{vat}"),
            salary: 2500.0,
        }
    }

    fn profile(vat: &str) -> DoctorProfile {
        DoctorProfile {
            specialization: "General Practice".into(),
            biography: String::new(),
            email: format!("{vat}@clinic.test"),
        }
    }

    #[test]
    fn test_doctor_registration() {
        let db = Database::open_in_memory().unwrap();
        db.insert_employee(&employee("999888777", "Dr. Silva")).unwrap();
        db.insert_doctor("999888777", &profile("999888777")).unwrap();

        assert!(db.doctor_exists("999888777").unwrap());
        assert!(!db.doctor_exists("123").unwrap());

        let doctors = db.list_doctors().unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].name, "Dr. Silva");
    }

    #[test]
    fn test_nurse_cannot_become_doctor() {
        let db = Database::open_in_memory().unwrap();
        db.insert_employee(&employee("500", "Rita")).unwrap();
        db.insert_nurse("500").unwrap();

        assert!(db.insert_doctor("500", &profile("500")).is_err());
        assert!(!db.doctor_exists("500").unwrap());
    }

    #[test]
    fn test_specialization_requires_employee() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_nurse("404").is_err());
    }
}
