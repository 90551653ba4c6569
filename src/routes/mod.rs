//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The settings store exposes one resource, `/api/settings`, read with
//! `GET` and replaced with `POST`, plus a health check. The news feed reads
//! those settings on every request. CORS is open so an admin UI served from
//! another origin can reach it.

pub mod feed;
pub mod settings;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            panel::store::SETTINGS_PATH,
            get(settings::get_settings).post(settings::post_settings),
        )
        .route(feed::FEED_PATH, get(feed::get_feed))
        .route(feed::SEARCH_PATH, get(feed::search))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
