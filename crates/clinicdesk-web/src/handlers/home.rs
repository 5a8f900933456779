//! Landing page.

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::error::WebError;
use crate::flash::Flash;
use crate::handlers::respond;
use crate::render::Page;
use crate::state::AppState;

#[derive(Serialize)]
struct Link {
    title: &'static str,
    href: &'static str,
}

const LINKS: [Link; 4] = [
    Link {
        title: "Search clients",
        href: "/search_clients",
    },
    Link {
        title: "New client",
        href: "/new_client",
    },
    Link {
        title: "Available doctors",
        href: "/available_doctors",
    },
    Link {
        title: "Dashboard",
        href: "/dashboard",
    },
];

/// `GET /`
pub async fn index(State(state): State<AppState>, flash: Flash) -> Result<Response, WebError> {
    let page = Page::new("index").with("links", &LINKS)?;
    respond(&state, page, flash)
}
