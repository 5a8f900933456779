//! Database layer for clinicdesk.

mod schema;
mod clients;
mod staff;
mod appointments;
mod consultations;
mod catalog;
mod reporting;

pub use schema::*;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use thiserror::Error;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}

impl DbError {
    /// True when the statement failed on a primary-key or unique constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == ErrorCode::ConstraintViolation
                    && (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
            }
            _ => false,
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
///
/// One `Database` is one SQLite connection; it is closed when dropped.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating it and applying the schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let db = Self::connect(path)?;
        db.initialize()?;
        Ok(db)
    }

    /// Connect to an existing database without touching the schema.
    pub fn connect<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        Ok(Self { conn })
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The write lock is taken up front, so a check followed by a write inside
    /// `f` cannot interleave with another writer. Any error rolls back.
    pub fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(DbError::from)?;
        let value = f(self)?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type IN ('table', 'view') ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for expected in [
            "appointment",
            "client",
            "consultation",
            "consultation_assistant",
            "consultation_diagnostic",
            "diagnostic_code",
            "doctor",
            "employee",
            "facts_consultations",
            "medication",
            "nurse",
            "prescription",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_unique_violation_detected() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute("INSERT INTO medication (name, lab) VALUES ('Ibuprofen', 'Bayer')", [])
            .unwrap();
        let err: DbError = db
            .conn()
            .execute("INSERT INTO medication (name, lab) VALUES ('Ibuprofen', 'Bayer')", [])
            .unwrap_err()
            .into();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_foreign_key_is_not_unique_violation() {
        let db = Database::open_in_memory().unwrap();
        let err: DbError = db
            .conn()
            .execute("INSERT INTO nurse (vat) VALUES ('404')", [])
            .unwrap_err()
            .into();
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_atomically_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();

        let result: DbResult<()> = db.atomically(|db| {
            db.conn()
                .execute("INSERT INTO medication (name, lab) VALUES ('A', 'L')", [])?;
            Err(DbError::InvalidValue("abort".into()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM medication", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_connect_shares_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");

        let first = Database::open(&path).unwrap();
        first
            .conn()
            .execute("INSERT INTO medication (name, lab) VALUES ('A', 'L')", [])
            .unwrap();
        drop(first);

        let second = Database::connect(&path).unwrap();
        let count: i64 = second
            .conn()
            .query_row("SELECT COUNT(*) FROM medication", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
