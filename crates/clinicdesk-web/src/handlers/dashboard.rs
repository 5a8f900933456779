//! Reporting dashboard.
//!
//! Failures here are logged and the affected section is left out; the page
//! itself always renders.

use axum::extract::State;
use axum::response::Response;
use axum::Form;

use clinicdesk_core::{ClinicError, Dashboard, Database, DateInterval};

use crate::error::WebError;
use crate::flash::Flash;
use crate::forms::DashboardForm;
use crate::handlers::respond;
use crate::render::Page;
use crate::state::AppState;

/// Adds each summary section that could be computed; failures are logged and skipped.
fn with_summary(mut page: Page, db: Option<&Database>) -> Result<Page, WebError> {
    let Some(db) = db else {
        return Ok(page);
    };
    let dashboard = Dashboard::new(db);

    match dashboard.consultations() {
        Ok(rows) => page = page.with("consultations_data", &rows)?,
        Err(err) => log_section_failure("consultations_data", &err),
    }
    match dashboard.total_consultations() {
        Ok(total) => page = page.with("total_consultations", &total)?,
        Err(err) => log_section_failure("total_consultations", &err),
    }
    match dashboard.by_client() {
        Ok(counts) => page = page.with("consultations_by_client", &counts)?,
        Err(err) => log_section_failure("consultations_by_client", &err),
    }
    match dashboard.by_year() {
        Ok(counts) => page = page.with("consultations_by_year", &counts)?,
        Err(err) => log_section_failure("consultations_by_year", &err),
    }
    Ok(page)
}

fn log_section_failure(section: &str, err: &ClinicError) {
    tracing::error!(section, error = %err, "dashboard section failed");
}

fn connect(state: &AppState) -> Option<Database> {
    state
        .open_db()
        .map_err(|err| tracing::error!(error = %err, "dashboard could not open the database"))
        .ok()
}

/// `GET /dashboard`
pub async fn show(State(state): State<AppState>, flash: Flash) -> Result<Response, WebError> {
    let db = connect(&state);
    let page = with_summary(Page::new("dashboard"), db.as_ref())?;
    respond(&state, page, flash)
}

/// `POST /dashboard`
pub async fn between(
    State(state): State<AppState>,
    flash: Flash,
    Form(form): Form<DashboardForm>,
) -> Result<Response, WebError> {
    let start = form.start_date.unwrap_or_default();
    let end = form.end_date.unwrap_or_default();
    let db = connect(&state);

    let mut page = with_summary(Page::new("dashboard"), db.as_ref())?
        .with("start_date", &start)?
        .with("end_date", &end)?;

    if let Some(db) = db.as_ref() {
        let interval = DateInterval::parse(&start, &end)
            .and_then(|interval| Dashboard::new(db).between(&interval));
        match interval {
            Ok(rows) => page = page.with("consultations_between", &rows)?,
            Err(err) => tracing::error!(error = %err, start = %start, end = %end, "dashboard interval failed"),
        }
    }
    respond(&state, page, flash)
}
