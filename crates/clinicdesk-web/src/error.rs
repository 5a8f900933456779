//! HTTP error responses with a structured JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use clinicdesk_core::{ClinicError, DbError};

use crate::render::RenderError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Failures that end a request without rendering its page.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            WebError::BadRequest(detail) => {
                tracing::debug!(detail = %detail, "bad request");
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            WebError::Internal(detail) => {
                tracing::error!(detail = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Something went wrong. Try to refresh the page and repeat.".to_string(),
                )
            }
            WebError::Render(err) => {
                tracing::error!(error = %err, "page rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_FAILED",
                    "Something went wrong. Try to refresh the page and repeat.".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DbError> for WebError {
    fn from(err: DbError) -> Self {
        WebError::Internal(err.to_string())
    }
}

impl From<ClinicError> for WebError {
    fn from(err: ClinicError) -> Self {
        match err {
            ClinicError::Database(e) => WebError::Internal(e.to_string()),
            other => WebError::BadRequest(other.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400_with_detail() {
        let response = WebError::BadRequest("malformed consultation date".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["message"], "malformed consultation date");
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let response = WebError::Internal("disk I/O error at page 7".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INTERNAL");
        assert!(!json["error"]["message"].as_str().unwrap().contains("disk"));
    }

    #[tokio::test]
    async fn database_failures_map_to_500() {
        let err: WebError = ClinicError::Database(DbError::InvalidValue("bad row".into())).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
