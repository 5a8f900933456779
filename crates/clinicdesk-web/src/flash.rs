//! One-shot notices carried across a redirect.
//!
//! Cookie value: `hex(json notices) "." hex(HMAC-SHA256(secret, payload))`.
//! A cookie whose tag does not verify is ignored.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::WebError;
use crate::render::Notice;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

pub const FLASH_COOKIE: &str = "clinicdesk_flash";

const CLEAR_COOKIE: &str = "clinicdesk_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

/// Signs and verifies flash cookie values.
#[derive(Clone)]
pub struct FlashSigner {
    secret: Arc<[u8]>,
}

impl FlashSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Arc::from(secret.as_bytes()),
        }
    }

    fn mac(&self, payload: &[u8]) -> Result<HmacSha256, InvalidLength> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)?;
        mac.update(payload);
        Ok(mac)
    }

    pub fn sign(&self, notices: &[Notice]) -> Result<String, WebError> {
        let payload = serde_json::to_vec(notices)
            .map_err(|e| WebError::Internal(format!("flash encoding failed: {e}")))?;
        let tag = self
            .mac(&payload)
            .map_err(|e| WebError::Internal(format!("flash key rejected: {e}")))?
            .finalize()
            .into_bytes();
        Ok(format!("{}.{}", hex::encode(&payload), hex::encode(tag)))
    }

    pub fn verify(&self, value: &str) -> Option<Vec<Notice>> {
        let (payload, tag) = value.split_once('.')?;
        let payload = hex::decode(payload).ok()?;
        let tag = hex::decode(tag).ok()?;
        self.mac(&payload).ok()?.verify_slice(&tag).ok()?;
        serde_json::from_slice(&payload).ok()
    }
}

/// Notices carried in from the previous response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flash {
    pub notices: Vec<Notice>,
    /// Whether the request carried a flash cookie that must now be cleared
    pub present: bool,
}

impl Flash {
    /// Clear the cookie on `response` if one was consumed.
    pub fn consume(&self, response: &mut Response) {
        if self.present {
            response
                .headers_mut()
                .append(SET_COOKIE, HeaderValue::from_static(CLEAR_COOKIE));
        }
    }
}

fn flash_cookie_value(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .map(|(_, value)| value.to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for Flash {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = flash_cookie_value(parts) else {
            return Ok(Flash::default());
        };

        let notices = state.flash.verify(&value).unwrap_or_else(|| {
            tracing::warn!("discarding flash cookie with invalid signature");
            Vec::new()
        });
        Ok(Flash {
            notices,
            present: true,
        })
    }
}

/// `303 See Other` to `location`, carrying `notices` to the next page.
pub fn redirect_with(state: &AppState, location: &str, notices: &[Notice]) -> Result<Response, WebError> {
    let location = HeaderValue::from_str(location)
        .map_err(|_| WebError::BadRequest(format!("cannot redirect to '{location}'")))?;
    let cookie = format!(
        "{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        state.flash.sign(notices)?
    );
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|e| WebError::Internal(format!("invalid flash cookie: {e}")))?;

    let mut response = StatusCode::SEE_OTHER.into_response();
    response.headers_mut().insert(LOCATION, location);
    response.headers_mut().insert(SET_COOKIE, cookie);
    Ok(response)
}
