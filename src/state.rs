//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the singleton settings record and, when configured, the file
//! that persists it. Saves replace the whole record under the write lock.
//! The news client is optional; without it the feed serves a setup notice.

use std::sync::Arc;

use panel::SettingsRecord;
use tokio::sync::RwLock;

use crate::feed::newsapi::NewsClient;
use crate::services::feed::FeedCache;
use crate::services::persistence::SettingsFile;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<RwLock<SettingsRecord>>,
    /// Backing file. `None` keeps settings in memory only.
    pub file: Option<SettingsFile>,
    pub news: Option<Arc<NewsClient>>,
    pub feed_cache: Arc<RwLock<FeedCache>>,
}

impl AppState {
    /// A store seeded with the default record and no persistence.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::seeded(SettingsRecord::builtin(), None)
    }

    /// A store seeded with `record` that writes every save to `file`.
    #[must_use]
    pub fn with_file(record: SettingsRecord, file: SettingsFile) -> Self {
        Self::seeded(record, Some(file))
    }

    /// Attach the news provider client.
    #[must_use]
    pub fn with_news(mut self, client: NewsClient) -> Self {
        self.news = Some(Arc::new(client));
        self
    }

    fn seeded(record: SettingsRecord, file: Option<SettingsFile>) -> Self {
        Self {
            settings: Arc::new(RwLock::new(record)),
            file,
            news: None,
            feed_cache: Arc::new(RwLock::new(FeedCache::default())),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
