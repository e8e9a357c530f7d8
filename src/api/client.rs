//! Studio API Client
//!
//! Combines the HTTP wrapper with the backend base URL and optional token.

use super::http::ApiHttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Main backend client
#[derive(Clone)]
pub struct ApiClient {
    pub http: ApiHttpClient,
    pub base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new client for the given base URL
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must be http or https: {}", base_url);
        }

        let http = ApiHttpClient::new()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn get(&self, url: &str) -> Result<Value> {
        self.http.get(url, self.token()).await
    }

    pub async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        self.http.post(url, self.token(), body).await
    }

    pub async fn put(&self, url: &str, body: &Value) -> Result<Value> {
        self.http.put(url, self.token(), body).await
    }

    pub async fn delete(&self, url: &str) -> Result<Value> {
        self.http.delete(url, self.token()).await
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Collection URL for a resource endpoint, e.g. `.../api/Booking`
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_matches('/'))
    }

    /// Single-record URL, e.g. `.../api/Booking/42`
    pub fn record_url(&self, endpoint: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint_url(endpoint),
            urlencoding::encode(id)
        )
    }
}

pub use super::http::format_api_error;
