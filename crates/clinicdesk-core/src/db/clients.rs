//! Client database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Client, ClientFilter};

fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        vat: row.get(0)?,
        name: row.get(1)?,
        birth_date: row.get(2)?,
        street: row.get(3)?,
        city: row.get(4)?,
        zip: row.get(5)?,
        gender: row.get(6)?,
    })
}

impl Database {
    /// Insert a new client.
    pub fn insert_client(&self, client: &Client) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO client (vat, name, birth_date, street, city, zip, gender)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                client.vat,
                client.name,
                client.birth_date,
                client.street,
                client.city,
                client.zip,
                client.gender,
            ],
        )?;
        Ok(())
    }

    /// Get a client by VAT.
    pub fn get_client(&self, vat: &str) -> DbResult<Option<Client>> {
        self.conn
            .query_row(
                r#"
                SELECT vat, name, birth_date, street, city, zip, gender
                FROM client
                WHERE vat = ?
                "#,
                [vat],
                client_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Check whether a client is registered.
    pub fn client_exists(&self, vat: &str) -> DbResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM client WHERE vat = ?)",
            [vat],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Search clients. Absent criteria match everything; results ordered by name.
    pub fn search_clients(&self, filter: &ClientFilter) -> DbResult<Vec<Client>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT vat, name, birth_date, street, city, zip, gender
            FROM client
            WHERE (?1 IS NULL OR vat = ?1)
              AND (?2 IS NULL OR name LIKE '%' || ?2 || '%')
              AND (?3 IS NULL OR city LIKE '%' || ?3 || '%')
              AND (?4 IS NULL OR street LIKE '%' || ?4 || '%')
              AND (?5 IS NULL OR zip LIKE '%' || ?5 || '%')
            ORDER BY name ASC
            "#,
        )?;

        let rows = stmt.query_map(
            params![filter.vat, filter.name, filter.city, filter.street, filter.zip],
            client_from_row,
        )?;

        let clients = rows.collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = clients.len(), "client search");
        Ok(clients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn client(vat: &str, name: &str, city: &str) -> Client {
        Client {
            vat: vat.into(),
            name: name.into(),
            birth_date: "1990-05-17".into(),
            street: "Rua Augusta".into(),
            city: city.into(),
            zip: "1100-048".into(),
            gender: "F".into(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        db.insert_client(&client("111222333", "Alice", "Lisboa")).unwrap();

        let retrieved = db.get_client("111222333").unwrap().unwrap();
        assert_eq!(retrieved.name, "Alice");
        assert!(db.client_exists("111222333").unwrap());
        assert!(!db.client_exists("000").unwrap());
    }

    #[test]
    fn test_duplicate_vat_is_unique_violation() {
        let db = setup_db();
        db.insert_client(&client("111222333", "Alice", "Lisboa")).unwrap();

        let err = db
            .insert_client(&client("111222333", "Alicia", "Porto"))
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_search_by_substring_ordered_by_name() {
        let db = setup_db();
        db.insert_client(&client("3", "Carla Mendes", "Lisboa")).unwrap();
        db.insert_client(&client("1", "Alice Mendes", "Lisboa")).unwrap();
        db.insert_client(&client("2", "Bruno Costa", "Porto")).unwrap();

        let filter = ClientFilter {
            name: Some("Mendes".into()),
            ..Default::default()
        };
        let results = db.search_clients(&filter).unwrap();
        let names: Vec<_> = results.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alice Mendes", "Carla Mendes"]);
    }

    #[test]
    fn test_search_combines_criteria() {
        let db = setup_db();
        db.insert_client(&client("1", "Alice", "Lisboa")).unwrap();
        db.insert_client(&client("2", "Alice", "Porto")).unwrap();

        let filter = ClientFilter {
            name: Some("Ali".into()),
            city: Some("Port".into()),
            ..Default::default()
        };
        let results = db.search_clients(&filter).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].vat, "2");
    }

    #[test]
    fn test_search_vat_is_exact() {
        let db = setup_db();
        db.insert_client(&client("111", "Alice", "Lisboa")).unwrap();
        db.insert_client(&client("1112", "Bruno", "Lisboa")).unwrap();

        let filter = ClientFilter {
            vat: Some("111".into()),
            ..Default::default()
        };
        let results = db.search_clients(&filter).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Alice");
    }
}
