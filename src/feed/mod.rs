//! News feed: article model, query building, and timestamp display.
//!
//! DESIGN
//! ======
//! Articles come from the NewsAPI `everything` endpoint (see `newsapi`) and
//! are normalised into a flat `Article` so handlers never see upstream
//! nulls. The query is derived from the settings keywords; an empty keyword
//! list falls back to `DEFAULT_QUERY`.

pub mod newsapi;

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Query used when the settings carry no keywords.
pub const DEFAULT_QUERY: &str = "cybersecurity OR malware OR \"information security\"";

/// Errors produced while talking to the news provider.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("news request failed: {0}")]
    Request(String),

    #[error("news provider returned HTTP {status}: {body}")]
    Response { status: u16, body: String },

    #[error("news response is not valid JSON: {0}")]
    Decode(String),
}

/// One normalised news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    /// Image URL, empty when the provider has none.
    pub image: String,
    pub source: String,
    /// Provider timestamp as received.
    pub published: String,
    /// `published` as `YYYY-MM-DD HH:MM`.
    pub published_display: String,
}

impl Article {
    /// A synthetic item shown in place of results, never cached.
    #[must_use]
    pub fn notice(title: &str, description: &str, url: &str, source: &str) -> Self {
        Self {
            title: title.to_owned(),
            description: description.to_owned(),
            url: url.to_owned(),
            image: String::new(),
            source: source.to_owned(),
            published: String::new(),
            published_display: String::new(),
        }
    }
}

/// Join keyword terms into a NewsAPI `q` expression.
///
/// Terms are OR-ed; terms containing whitespace are quoted as phrases.
#[must_use]
pub fn build_query<'a>(terms: impl IntoIterator<Item = &'a str>) -> String {
    let parts: Vec<String> = terms
        .into_iter()
        .map(|term| term.replace('"', ""))
        .map(|term| term.trim().to_owned())
        .filter(|term| !term.is_empty())
        .map(|term| {
            if term.contains(char::is_whitespace) {
                format!("\"{term}\"")
            } else {
                term
            }
        })
        .collect();
    if parts.is_empty() {
        DEFAULT_QUERY.to_owned()
    } else {
        parts.join(" OR ")
    }
}

/// Render an ISO-8601 timestamp as `YYYY-MM-DD HH:MM` in its own offset.
///
/// Empty input stays empty; unparsable input is returned unchanged.
#[must_use]
pub fn format_iso(ts: &str) -> String {
    let display = format_description!("[year]-[month]-[day] [hour]:[minute]");
    let naive = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

    if ts.is_empty() {
        return String::new();
    }
    let formatted = match OffsetDateTime::parse(ts, &Rfc3339) {
        Ok(dt) => dt.format(display),
        Err(_) => match PrimitiveDateTime::parse(ts, naive) {
            Ok(dt) => dt.format(display),
            Err(_) => return ts.to_owned(),
        },
    };
    formatted.unwrap_or_else(|_| ts.to_owned())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
