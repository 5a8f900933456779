//! Client registration and search.

use crate::db::Database;
use crate::models::{non_blank, parse_date, Client, ClientFilter, ClientSearch};
use crate::{ClinicError, ClinicResult};

/// Client registry over one connection.
pub struct ClientRegistry<'a> {
    db: &'a Database,
}

impl<'a> ClientRegistry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Search clients. With no criteria nothing is queried.
    pub fn search(&self, filter: &ClientFilter) -> ClinicResult<ClientSearch> {
        if filter.is_empty() {
            return Ok(ClientSearch::NoCriteria);
        }

        let clients = self.db.search_clients(filter)?;
        if clients.is_empty() {
            Ok(ClientSearch::NoMatches)
        } else {
            Ok(ClientSearch::Found(clients))
        }
    }

    /// Register a new client.
    pub fn register(&self, client: &Client) -> ClinicResult<Client> {
        let vat = non_blank(Some(client.vat.clone()))
            .ok_or_else(|| ClinicError::ValidationFailure("client VAT is required".into()))?;
        let name = non_blank(Some(client.name.clone()))
            .ok_or_else(|| ClinicError::ValidationFailure("client name is required".into()))?;
        if parse_date(&client.birth_date).is_none() {
            return Err(ClinicError::ValidationFailure(format!(
                "unparsable birth date '{}'",
                client.birth_date
            )));
        }

        let client = Client {
            vat,
            name,
            birth_date: client.birth_date.trim().to_string(),
            street: client.street.trim().to_string(),
            city: client.city.trim().to_string(),
            zip: client.zip.trim().to_string(),
            gender: client.gender.trim().to_string(),
        };

        self.db.insert_client(&client).map_err(|e| {
            ClinicError::from_insert(e, || ClinicError::DuplicateKey {
                entity: "Client",
                key: client.vat.clone(),
            })
        })?;
        tracing::info!(vat = %client.vat, "client registered");
        Ok(client)
    }
}
