//! Route handlers, one module per page group.

pub mod appointments;
pub mod clients;
pub mod consultations;
pub mod dashboard;
pub mod home;

use axum::response::{IntoResponse, Response};

use clinicdesk_core::ClinicError;

use crate::error::WebError;
use crate::flash::Flash;
use crate::render::{Notice, Page};
use crate::state::AppState;

/// Render `page` with any carried-over notices, clearing the flash cookie.
pub(crate) fn respond(state: &AppState, page: Page, flash: Flash) -> Result<Response, WebError> {
    let page = page.prepend_notices(flash.notices.clone());
    let mut response = state.renderer.render(&page)?.into_response();
    flash.consume(&mut response);
    Ok(response)
}

/// Turn a user-recoverable failure into the notice shown on the redisplayed
/// form. Infrastructure failures propagate.
pub(crate) fn recover(err: ClinicError) -> Result<Notice, WebError> {
    if !err.is_recoverable() {
        return Err(err.into());
    }
    match &err {
        ClinicError::ValidationFailure(detail) => {
            tracing::warn!(detail = %detail, "rejected input");
        }
        other => tracing::info!(error = %other, "request refused"),
    }
    Ok(Notice::error(err.user_message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicdesk_core::DbError;

    #[test]
    fn test_recoverable_errors_become_notices() {
        let notice = recover(ClinicError::UnknownDoctor("000".into())).unwrap();
        assert_eq!(notice, Notice::error("Incorrect Doctor VAT inserted"));

        let notice = recover(ClinicError::ValidationFailure("NOT NULL constraint".into())).unwrap();
        assert_eq!(notice.message, "Check your inputs. Try again!");
    }

    #[test]
    fn test_database_errors_propagate() {
        let err = recover(ClinicError::Database(DbError::InvalidValue("x".into())));
        assert!(matches!(err, Err(WebError::Internal(_))));
    }
}
