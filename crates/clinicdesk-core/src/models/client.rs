//! Client models.

use serde::{Deserialize, Serialize};

/// A registered client of the clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    /// Tax number, primary key
    pub vat: String,
    pub name: String,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub gender: String,
}

/// Client search criteria. `None` means "match anything".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientFilter {
    /// Exact match
    pub vat: Option<String>,
    /// Substring matches
    pub name: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub zip: Option<String>,
}

impl ClientFilter {
    /// Build a filter from raw form values, treating blank input as absent.
    pub fn from_inputs(
        vat: Option<String>,
        name: Option<String>,
        city: Option<String>,
        street: Option<String>,
        zip: Option<String>,
    ) -> Self {
        Self {
            vat: non_blank(vat),
            name: non_blank(name),
            city: non_blank(city),
            street: non_blank(street),
            zip: non_blank(zip),
        }
    }

    /// True when no criterion was supplied.
    pub fn is_empty(&self) -> bool {
        self.vat.is_none()
            && self.name.is_none()
            && self.city.is_none()
            && self.street.is_none()
            && self.zip.is_none()
    }
}

/// Result of a client search.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientSearch {
    /// No criteria supplied; nothing was queried.
    NoCriteria,
    /// Criteria supplied but nothing matched.
    NoMatches,
    Found(Vec<Client>),
}

/// Trim a form value and drop it if nothing is left.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
