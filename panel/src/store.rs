//! Settings Store client: the backend seam of the settings form.
//!
//! DESIGN
//! ======
//! The form only ever needs two calls, a read and a wholesale write, so the
//! seam is a small async trait. `HttpSettingsStore` is the production
//! implementation over `GET`/`POST {base}/api/settings`; tests swap in mocks.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-success statuses, and undecodable bodies all come
//! back as `StoreError`. The caller decides what is user-visible: the form
//! swallows read errors and reports write errors as a status line.

use std::time::Duration;

use crate::record::{SettingsPayload, SettingsRecord};

/// Path of the settings resource, relative to the store base URL.
pub const SETTINGS_PATH: &str = "/api/settings";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by Settings Store calls.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("settings request failed: {0}")]
    Request(String),

    /// The store answered with a non-success HTTP status.
    #[error("settings store returned status {status}")]
    Status { status: u16 },

    /// The response body was not a valid settings object.
    #[error("settings response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Request/response access to the backend that owns the settings record.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the current settings. Keys the store omits stay `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on transport failure, non-success status, or
    /// an undecodable body.
    async fn load(&self) -> Result<SettingsPayload, StoreError>;

    /// Replace the stored settings with `record`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on transport failure or non-success status.
    async fn save(&self, record: &SettingsRecord) -> Result<(), StoreError>;
}

// =============================================================================
// HTTP STORE
// =============================================================================

/// Settings Store reached over HTTP at `{base_url}/api/settings`.
#[derive(Debug, Clone)]
pub struct HttpSettingsStore {
    http: reqwest::Client,
    url: String,
}

impl HttpSettingsStore {
    /// Build a store client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::ClientBuild(e.to_string()))?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        let url = format!("{}{SETTINGS_PATH}", base_url.trim_end_matches('/'));
        Self { http, url }
    }

    /// Full URL of the settings resource.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl SettingsStore for HttpSettingsStore {
    async fn load(&self) -> Result<SettingsPayload, StoreError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status { status: status.as_u16() });
        }

        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn save(&self, record: &SettingsRecord) -> Result<(), StoreError> {
        // `.json()` sets `Content-Type: application/json`.
        let response = self
            .http
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status { status: status.as_u16() });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
