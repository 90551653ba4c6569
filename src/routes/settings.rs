//! Settings routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use panel::SettingsRecord;
use tracing::error;

use crate::services::settings;
use crate::state::AppState;

/// `GET /api/settings`: the current record.
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsRecord> {
    Json(settings::current(&state).await)
}

/// `POST /api/settings`: replace the record wholesale and echo it back.
///
/// Bodies that are not a full record are rejected by the `Json` extractor
/// before this runs.
pub async fn post_settings(
    State(state): State<AppState>,
    Json(record): Json<SettingsRecord>,
) -> Result<Json<SettingsRecord>, StatusCode> {
    settings::replace(&state, record).await.map(Json).map_err(|e| {
        error!(error = %e, "settings persist failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
