//! Feed service: settings-driven news fetches behind a TTL cache.
//!
//! DESIGN
//! ======
//! Every fetch reads the current settings: `keywords` build the home query,
//! `article_count` is the page size, and `refresh_minutes` is the cache TTL.
//! Pages are cached per `(query, page_size)`, so a settings change misses
//! the cache immediately. A TTL of zero disables caching.
//!
//! Upstream failures never reach the caller. They are logged and replaced
//! by a single fallback item that is not cached, so the next request tries
//! again. Without an API key the feed is a single setup notice.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use panel::SettingsRecord;
use tracing::{debug, warn};

use crate::feed::{Article, build_query};
use crate::state::AppState;

pub const FALLBACK_TITLE: &str = "Unable to fetch news right now";
pub const MISSING_KEY_TITLE: &str = "Set NEWSAPI_KEY in your .env file";

struct CachedPage {
    fetched_at: Instant,
    articles: Vec<Article>,
}

/// Fetched pages keyed by query and page size.
#[derive(Default)]
pub struct FeedCache {
    pages: HashMap<(String, u32), CachedPage>,
}

impl FeedCache {
    fn get(&self, key: &(String, u32), now: Instant, ttl: Duration) -> Option<Vec<Article>> {
        self.pages
            .get(key)
            .filter(|page| is_fresh(page.fetched_at, now, ttl))
            .map(|page| page.articles.clone())
    }

    /// Store a page and drop every entry that has gone stale.
    fn insert(&mut self, key: (String, u32), articles: Vec<Article>, now: Instant, ttl: Duration) {
        self.pages.retain(|_, page| is_fresh(page.fetched_at, now, ttl));
        self.pages.insert(key, CachedPage { fetched_at: now, articles });
    }
}

/// `true` while a page fetched at `fetched_at` is younger than `ttl`.
#[must_use]
pub fn is_fresh(fetched_at: Instant, now: Instant, ttl: Duration) -> bool {
    now.saturating_duration_since(fetched_at) < ttl
}

/// Cache lifetime derived from the refresh interval.
#[must_use]
pub fn cache_ttl(record: &SettingsRecord) -> Duration {
    Duration::from_secs(u64::from(record.refresh_minutes) * 60)
}

/// Home feed for the current keywords.
///
/// Returns the query used alongside the articles.
pub async fn latest(state: &AppState) -> (String, Vec<Article>) {
    let record = state.settings.read().await.clone();
    let query = build_query(record.keyword_list());
    let articles = fetch(state, &query, &record).await;
    (query, articles)
}

/// Articles for a caller-supplied query, sized and cached per the settings.
pub async fn search(state: &AppState, query: &str) -> Vec<Article> {
    let record = state.settings.read().await.clone();
    fetch(state, query, &record).await
}

async fn fetch(state: &AppState, query: &str, record: &SettingsRecord) -> Vec<Article> {
    let Some(client) = &state.news else {
        return vec![missing_key_notice()];
    };

    let key = (query.to_owned(), record.article_count);
    let ttl = cache_ttl(record);
    if let Some(articles) = state.feed_cache.read().await.get(&key, Instant::now(), ttl) {
        debug!(query, "feed cache hit");
        return articles;
    }

    match client.everything(query, record.article_count).await {
        Ok(articles) => {
            debug!(query, count = articles.len(), "feed fetched");
            if !ttl.is_zero() {
                state
                    .feed_cache
                    .write()
                    .await
                    .insert(key, articles.clone(), Instant::now(), ttl);
            }
            articles
        }
        Err(e) => {
            warn!(error = %e, query, "news fetch failed");
            vec![fallback_notice()]
        }
    }
}

fn fallback_notice() -> Article {
    Article::notice(
        FALLBACK_TITLE,
        "Please try again later. This could be a network or API limit issue.",
        "#",
        "Fallback",
    )
}

fn missing_key_notice() -> Article {
    Article::notice(
        MISSING_KEY_TITLE,
        "Create a .env file with NEWSAPI_KEY=your_key to fetch live news.",
        "https://newsapi.org/",
        "Setup",
    )
}

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;
