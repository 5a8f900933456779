//! Page rendering.
//!
//! Handlers describe a page as a template name, named values and notices; a
//! [`Renderer`] turns that into a response body. [`JsonRenderer`] emits the
//! page itself so an HTML front end can be plugged in later.

use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to serialize page value: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// One-shot message shown at the top of a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A page to render.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page {
    pub template: &'static str,
    pub values: Map<String, Value>,
    pub notices: Vec<Notice>,
}

impl Page {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            values: Map::new(),
            notices: Vec::new(),
        }
    }

    /// Add a named value.
    pub fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Result<Self, RenderError> {
        self.values.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    /// Put notices carried over from a redirect ahead of this page's own.
    pub fn prepend_notices(mut self, carried: Vec<Notice>) -> Self {
        if !carried.is_empty() {
            let own = std::mem::replace(&mut self.notices, carried);
            self.notices.extend(own);
        }
        self
    }
}

/// A rendered body and its content type.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub content_type: &'static str,
    pub body: String,
}

impl IntoResponse for RenderedPage {
    fn into_response(self) -> Response {
        let mut response = self.body.into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        response
    }
}

/// Turns pages into response bodies.
pub trait Renderer: Send + Sync {
    fn render(&self, page: &Page) -> Result<RenderedPage, RenderError>;
}

/// Renders the page description as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, page: &Page) -> Result<RenderedPage, RenderError> {
        Ok(RenderedPage {
            content_type: "application/json",
            body: serde_json::to_string(page)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_rendering() {
        let page = Page::new("search_clients")
            .with("vat", "111222333")
            .unwrap()
            .notice(Notice::info("No clients found."));

        let rendered = JsonRenderer.render(&page).unwrap();
        assert_eq!(rendered.content_type, "application/json");

        let json: Value = serde_json::from_str(&rendered.body).unwrap();
        assert_eq!(json["template"], "search_clients");
        assert_eq!(json["values"]["vat"], "111222333");
        assert_eq!(json["notices"][0]["level"], "info");
        assert_eq!(json["notices"][0]["message"], "No clients found.");
    }

    #[test]
    fn test_carried_notices_come_first() {
        let page = Page::new("x")
            .notice(Notice::error("second"))
            .prepend_notices(vec![Notice::success("first")]);
        let messages: Vec<_> = page.notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
