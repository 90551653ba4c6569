//! NewsAPI `everything` client.

use std::time::Duration;

use serde::Deserialize;

use super::{Article, FeedError, format_iso};

pub const DEFAULT_NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 5;
/// Largest `pageSize` the provider accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

pub struct NewsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NewsClient {
    /// # Errors
    ///
    /// Returns [`FeedError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(api_key: String, base_url: Option<&str>) -> Result<Self, FeedError> {
        let base_url = base_url
            .unwrap_or(DEFAULT_NEWSAPI_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| FeedError::ClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    /// Newest English articles matching `query`, at most `page_size` of them.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-200 status, or a body
    /// that is not an articles listing.
    pub async fn everything(&self, query: &str, page_size: u32) -> Result<Vec<Article>, FeedError> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE).to_string();
        let url = format!("{}/everything", self.base_url);
        let response = self
            .http
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
                ("sortBy", "publishedAt"),
            ])
            .send()
            .await
            .map_err(|e| FeedError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| FeedError::Request(e.to_string()))?;
        if status != 200 {
            return Err(FeedError::Response { status, body: text });
        }
        parse_everything(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    source: Option<RawSource>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSource {
    name: Option<String>,
}

fn parse_everything(text: &str) -> Result<Vec<Article>, FeedError> {
    let body: EverythingResponse = serde_json::from_str(text).map_err(|e| FeedError::Decode(e.to_string()))?;
    Ok(body.articles.into_iter().map(normalize).collect())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn normalize(raw: RawArticle) -> Article {
    let published = non_empty(raw.published_at).unwrap_or_default();
    Article {
        title: non_empty(raw.title).unwrap_or_else(|| "Untitled".to_owned()),
        description: non_empty(raw.description).unwrap_or_default(),
        url: non_empty(raw.url).unwrap_or_else(|| "#".to_owned()),
        image: non_empty(raw.url_to_image).unwrap_or_default(),
        source: non_empty(raw.source.and_then(|s| s.name)).unwrap_or_else(|| "Unknown".to_owned()),
        published_display: format_iso(&published),
        published,
    }
}

#[cfg(test)]
#[path = "newsapi_test.rs"]
mod tests;
