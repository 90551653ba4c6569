//! Settings service: read and wholesale replace of the singleton record.

use panel::SettingsRecord;
use tracing::info;

use super::persistence::PersistError;
use crate::state::AppState;

/// Current settings record.
pub async fn current(state: &AppState) -> SettingsRecord {
    state.settings.read().await.clone()
}

/// Replace the settings record.
///
/// The file is written first, under the write lock, so a failed write
/// leaves both the file and the in-memory record unchanged.
///
/// # Errors
///
/// Returns a [`PersistError`] if the backing file cannot be written.
pub async fn replace(state: &AppState, record: SettingsRecord) -> Result<SettingsRecord, PersistError> {
    let mut settings = state.settings.write().await;
    if let Some(file) = &state.file {
        file.write(&record).await?;
    }
    *settings = record.clone();
    info!(
        article_count = record.article_count,
        refresh_minutes = record.refresh_minutes,
        keywords = record.keyword_list().count(),
        "settings replaced"
    );
    Ok(record)
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
