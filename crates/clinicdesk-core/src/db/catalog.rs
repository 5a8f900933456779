//! Diagnostic code and medication catalog operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{DiagnosticCode, Medication};

impl Database {
    /// Find a diagnostic code by its exact description.
    pub fn find_diagnostic_by_description(&self, description: &str) -> DbResult<Option<DiagnosticCode>> {
        self.conn
            .query_row(
                "SELECT id, description FROM diagnostic_code WHERE description = ?",
                [description],
                |row| {
                    Ok(DiagnosticCode {
                        id: row.get(0)?,
                        description: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Next free diagnostic id: `max(id) + 1`, starting at 1.
    ///
    /// Only race-free when called inside [`Database::atomically`].
    pub fn next_diagnostic_id(&self) -> DbResult<i64> {
        let next: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(id), 0) + 1 FROM diagnostic_code",
            [],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    /// Insert a diagnostic code into the catalog.
    pub fn insert_diagnostic_code(&self, code: &DiagnosticCode) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO diagnostic_code (id, description) VALUES (?1, ?2)",
            params![code.id, code.description],
        )?;
        Ok(())
    }

    /// All diagnostic codes, by id.
    pub fn list_diagnostic_codes(&self) -> DbResult<Vec<DiagnosticCode>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, description FROM diagnostic_code ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(DiagnosticCode {
                id: row.get(0)?,
                description: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Check whether a medication/lab pair is in the catalog.
    pub fn medication_exists(&self, medication: &Medication) -> DbResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM medication WHERE name = ?1 AND lab = ?2)",
            params![medication.name, medication.lab],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Insert a medication into the catalog.
    pub fn insert_medication(&self, medication: &Medication) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO medication (name, lab) VALUES (?1, ?2)",
            params![medication.name, medication.lab],
        )?;
        Ok(())
    }

    /// All medications, by name then lab.
    pub fn list_medications(&self) -> DbResult<Vec<Medication>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, lab FROM medication ORDER BY name, lab")?;
        let rows = stmt.query_map([], |row| {
            Ok(Medication {
                name: row.get(0)?,
                lab: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_diagnostic_id_is_one() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.next_diagnostic_id().unwrap(), 1);
    }

    #[test]
    fn test_next_id_follows_max() {
        let db = Database::open_in_memory().unwrap();
        db.insert_diagnostic_code(&DiagnosticCode {
            id: 41,
            description: "Otitis media".into(),
        })
        .unwrap();
        assert_eq!(db.next_diagnostic_id().unwrap(), 42);

        let found = db.find_diagnostic_by_description("Otitis media").unwrap().unwrap();
        assert_eq!(found.id, 41);
        assert!(db.find_diagnostic_by_description("otitis").unwrap().is_none());
    }

    #[test]
    fn test_description_is_unique() {
        let db = Database::open_in_memory().unwrap();
        db.insert_diagnostic_code(&DiagnosticCode {
            id: 1,
            description: "Migraine".into(),
        })
        .unwrap();
        let err = db
            .insert_diagnostic_code(&DiagnosticCode {
                id: 2,
                description: "Migraine".into(),
            })
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_medication_catalog() {
        let db = Database::open_in_memory().unwrap();
        let med = Medication {
            name: "Amoxicillin".into(),
            lab: "Generis".into(),
        };
        assert!(!db.medication_exists(&med).unwrap());
        db.insert_medication(&med).unwrap();
        assert!(db.medication_exists(&med).unwrap());
        assert_eq!(db.list_medications().unwrap(), vec![med]);
    }
}
