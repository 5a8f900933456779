//! SQLite schema definition.

/// Per-connection settings, applied every time a connection is opened.
pub const CONNECTION_PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
"#;

/// Complete database schema for clinicdesk.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Clients
-- ============================================================================

CREATE TABLE IF NOT EXISTS client (
    vat TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    birth_date TEXT NOT NULL,                    -- YYYY-MM-DD
    street TEXT NOT NULL,
    city TEXT NOT NULL,
    zip TEXT NOT NULL,
    gender TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_client_name ON client(name);

-- ============================================================================
-- Staff
-- ============================================================================

CREATE TABLE IF NOT EXISTS employee (
    vat TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    birth_date TEXT NOT NULL,
    street TEXT NOT NULL,
    city TEXT NOT NULL,
    zip TEXT NOT NULL,
    iban TEXT NOT NULL UNIQUE,
    salary REAL NOT NULL CHECK (salary >= 0)
);

CREATE TABLE IF NOT EXISTS doctor (
    vat TEXT PRIMARY KEY REFERENCES employee(vat),
    specialization TEXT NOT NULL,
    biography TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS nurse (
    vat TEXT PRIMARY KEY REFERENCES employee(vat)
);

-- An employee holds at most one specialization
CREATE TRIGGER IF NOT EXISTS doctor_not_nurse BEFORE INSERT ON doctor
WHEN EXISTS (SELECT 1 FROM nurse WHERE vat = new.vat)
BEGIN
    SELECT RAISE(ABORT, 'Employee is already registered as a nurse');
END;

CREATE TRIGGER IF NOT EXISTS nurse_not_doctor BEFORE INSERT ON nurse
WHEN EXISTS (SELECT 1 FROM doctor WHERE vat = new.vat)
BEGIN
    SELECT RAISE(ABORT, 'Employee is already registered as a doctor');
END;

-- ============================================================================
-- Appointments & Consultations
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointment (
    vat_doctor TEXT NOT NULL REFERENCES doctor(vat),
    date_timestamp TEXT NOT NULL,                -- YYYY-MM-DD HH:MM:SS
    description TEXT NOT NULL DEFAULT '',
    vat_client TEXT NOT NULL REFERENCES client(vat),
    PRIMARY KEY (vat_doctor, date_timestamp)
);

CREATE INDEX IF NOT EXISTS idx_appointment_client ON appointment(vat_client);
CREATE INDEX IF NOT EXISTS idx_appointment_timestamp ON appointment(date_timestamp);

CREATE TABLE IF NOT EXISTS consultation (
    vat_doctor TEXT NOT NULL,
    date_timestamp TEXT NOT NULL,
    soap_s TEXT NOT NULL DEFAULT '',
    soap_o TEXT NOT NULL DEFAULT '',
    soap_a TEXT NOT NULL DEFAULT '',
    soap_p TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (vat_doctor, date_timestamp),
    FOREIGN KEY (vat_doctor, date_timestamp)
        REFERENCES appointment(vat_doctor, date_timestamp)
);

CREATE TABLE IF NOT EXISTS consultation_assistant (
    vat_doctor TEXT NOT NULL,
    date_timestamp TEXT NOT NULL,
    vat_nurse TEXT NOT NULL REFERENCES nurse(vat),
    PRIMARY KEY (vat_doctor, date_timestamp, vat_nurse),
    FOREIGN KEY (vat_doctor, date_timestamp)
        REFERENCES consultation(vat_doctor, date_timestamp)
);

-- ============================================================================
-- Diagnostics & Prescriptions
-- ============================================================================

CREATE TABLE IF NOT EXISTS diagnostic_code (
    id INTEGER PRIMARY KEY,
    description TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS consultation_diagnostic (
    vat_doctor TEXT NOT NULL,
    date_timestamp TEXT NOT NULL,
    id INTEGER NOT NULL REFERENCES diagnostic_code(id),
    PRIMARY KEY (vat_doctor, date_timestamp, id),
    FOREIGN KEY (vat_doctor, date_timestamp)
        REFERENCES consultation(vat_doctor, date_timestamp)
);

CREATE TABLE IF NOT EXISTS medication (
    name TEXT NOT NULL,
    lab TEXT NOT NULL,
    PRIMARY KEY (name, lab)
);

CREATE TABLE IF NOT EXISTS prescription (
    name TEXT NOT NULL,
    lab TEXT NOT NULL,
    vat_doctor TEXT NOT NULL,
    date_timestamp TEXT NOT NULL,
    id INTEGER NOT NULL,
    dosage TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (vat_doctor, date_timestamp, id, name, lab),
    FOREIGN KEY (name, lab) REFERENCES medication(name, lab),
    FOREIGN KEY (vat_doctor, date_timestamp, id)
        REFERENCES consultation_diagnostic(vat_doctor, date_timestamp, id)
);

-- ============================================================================
-- Reporting
-- ============================================================================

-- One row per recorded consultation
CREATE VIEW IF NOT EXISTS facts_consultations AS
SELECT
    a.vat_client AS vat,
    c.vat_doctor AS vat_doctor,
    date(c.date_timestamp) AS date,
    cl.zip AS zip,
    (SELECT COUNT(*) FROM consultation_assistant ca
        WHERE ca.vat_doctor = c.vat_doctor AND ca.date_timestamp = c.date_timestamp) AS num_nurses,
    (SELECT COUNT(*) FROM consultation_diagnostic cd
        WHERE cd.vat_doctor = c.vat_doctor AND cd.date_timestamp = c.date_timestamp) AS num_diagnostic_codes,
    (SELECT COUNT(*) FROM prescription p
        WHERE p.vat_doctor = c.vat_doctor AND p.date_timestamp = c.date_timestamp) AS num_prescriptions
FROM consultation c
JOIN appointment a ON a.vat_doctor = c.vat_doctor AND a.date_timestamp = c.date_timestamp
JOIN client cl ON cl.vat = a.vat_client;
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CONNECTION_PRAGMAS).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = setup();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_single_specialization() {
        let conn = setup();
        conn.execute(
            "INSERT INTO employee VALUES ('100', 'Ana', '1980-01-01', 'Rua A', 'Lisboa', '1000', 'PT01', 1000)",
            [],
        )
        .unwrap();
        conn.execute("INSERT INTO nurse (vat) VALUES ('100')", []).unwrap();

        let result = conn.execute(
            "INSERT INTO doctor (vat, specialization, email) VALUES ('100', 'GP', 'ana@clinic')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_consultation_requires_appointment() {
        let conn = setup();
        let result = conn.execute(
            "INSERT INTO consultation (vat_doctor, date_timestamp) VALUES ('1', '2024-01-10 10:00:00')",
            [],
        );
        assert!(result.is_err());
    }
}
