//! News feed routes.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::{Deserialize, Serialize};

use crate::feed::Article;
use crate::services::feed;
use crate::state::AppState;

pub const FEED_PATH: &str = "/api/feed";
pub const SEARCH_PATH: &str = "/api/search";

/// A page of articles and the query that produced it.
#[derive(Debug, Serialize)]
pub struct FeedPage {
    pub query: String,
    pub articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

/// `GET /api/feed`: articles for the configured keywords.
pub async fn get_feed(State(state): State<AppState>) -> Json<FeedPage> {
    let (query, articles) = feed::latest(&state).await;
    Json(FeedPage { query, articles })
}

/// `GET /api/search?q=term`: articles for `term`. A blank term redirects to
/// the home feed.
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Redirect::to(FEED_PATH).into_response();
    }
    let articles = feed::search(&state, query).await;
    Json(FeedPage { query: query.to_owned(), articles }).into_response()
}

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;
