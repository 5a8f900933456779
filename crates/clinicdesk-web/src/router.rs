//! Route table.
//!
//! Path params use `:param` syntax (axum 0.7).

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{appointments, clients, consultations, dashboard, home};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route(
            "/search_clients",
            get(clients::search_form).post(clients::search),
        )
        .route(
            "/new_client",
            get(clients::new_client_form).post(clients::new_client),
        )
        .route(
            "/appointments/:vat",
            get(appointments::booking_form).post(appointments::book),
        )
        .route(
            "/available_doctors",
            get(appointments::availability_form).post(appointments::available_doctors),
        )
        .route(
            "/client/:vat/appointments",
            get(appointments::client_appointments),
        )
        .route(
            "/consultation_details/:doctor_vat/:date",
            get(consultations::details),
        )
        .route(
            "/new_consultation_soap/:doctor_vat/:date",
            get(consultations::soap_form).post(consultations::record_soap),
        )
        .route(
            "/new_consultation_nurse/:doctor_vat/:date",
            get(consultations::nurse_form).post(consultations::assign_nurse),
        )
        .route(
            "/new_consultation_diagnostic/:doctor_vat/:date",
            get(consultations::diagnostic_form).post(consultations::assign_diagnostic),
        )
        .route(
            "/new_consultation_prescription/:diagnostic_id/:doctor_vat/:date",
            get(consultations::prescription_form).post(consultations::prescribe),
        )
        .route("/dashboard", get(dashboard::show).post(dashboard::between))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
