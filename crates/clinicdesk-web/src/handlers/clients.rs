//! Client search and registration pages.

use axum::extract::State;
use axum::response::Response;
use axum::Form;
use serde::Serialize;

use clinicdesk_core::{Client, ClientRegistry, ClientSearch};

use crate::error::WebError;
use crate::flash::Flash;
use crate::forms::{NewClientForm, SearchForm};
use crate::handlers::{recover, respond};
use crate::paths::{client_appointments_url, new_appointment_url};
use crate::render::{Notice, Page};
use crate::state::AppState;

/// A search hit with the pages reachable from it.
#[derive(Serialize)]
struct ClientRow<'a> {
    #[serde(flatten)]
    client: &'a Client,
    appointments_url: String,
    new_appointment_url: String,
}

fn client_rows(clients: &[Client]) -> Vec<ClientRow<'_>> {
    clients
        .iter()
        .map(|client| ClientRow {
            client,
            appointments_url: client_appointments_url(&client.vat),
            new_appointment_url: new_appointment_url(&client.vat),
        })
        .collect()
}

/// `GET /search_clients`
pub async fn search_form(State(state): State<AppState>, flash: Flash) -> Result<Response, WebError> {
    respond(&state, Page::new("search_clients"), flash)
}

/// `POST /search_clients`
pub async fn search(
    State(state): State<AppState>,
    flash: Flash,
    Form(form): Form<SearchForm>,
) -> Result<Response, WebError> {
    let filter = form.into_filter();
    let db = state.open_db()?;

    let mut page = Page::new("search_clients").with("filter", &filter)?;
    page = match ClientRegistry::new(&db).search(&filter) {
        Ok(ClientSearch::NoCriteria) => page.notice(Notice::info("No values inserted.")),
        Ok(ClientSearch::NoMatches) => page.notice(Notice::info("No clients found.")),
        Ok(ClientSearch::Found(clients)) => page.with("clients", &client_rows(&clients))?,
        Err(err) => page.notice(recover(err)?),
    };
    respond(&state, page, flash)
}

/// `GET /new_client`
pub async fn new_client_form(State(state): State<AppState>, flash: Flash) -> Result<Response, WebError> {
    respond(&state, Page::new("new_client"), flash)
}

/// `POST /new_client`
pub async fn new_client(
    State(state): State<AppState>,
    flash: Flash,
    Form(form): Form<NewClientForm>,
) -> Result<Response, WebError> {
    let submitted = form.into_client();
    let db = state.open_db()?;

    let page = Page::new("new_client").with("form", &submitted)?;
    let page = match ClientRegistry::new(&db).register(&submitted) {
        Ok(client) => page
            .with("new_client", &client)?
            .with("new_appointment_url", &new_appointment_url(&client.vat))?
            .notice(Notice::success("New client added successfully.")),
        Err(err) => page.notice(recover(err)?),
    };
    respond(&state, page, flash)
}
