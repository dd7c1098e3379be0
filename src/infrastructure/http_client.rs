//! HTTP client for fetching per-title technical pages
//!
//! A thin reqwest wrapper with a bounded timeout and user-agent management.
//! The three outcomes the pipeline cares about are kept distinct: a body on
//! success, `FetchError::Http` for non-2xx statuses and
//! `FetchError::Transport` for connection/timeout failures. Retries are
//! deliberately not implemented here; failed titles are left absent in the
//! store so a future run picks them up again.

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

use crate::domain::repositories::{FetchError, TechnicalPageFetcher};
use crate::infrastructure::config::FetchConfig;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the remote source
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl HttpClientConfig {
    /// Create an HttpClientConfig from the process-level FetchConfig
    pub fn from_fetch_config(fetch_config: &FetchConfig) -> Self {
        Self {
            base_url: fetch_config.base_url.clone(),
            timeout_seconds: fetch_config.request_timeout_seconds,
            user_agent: fetch_config.user_agent.clone(),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let fetch = FetchConfig::default();
        Self {
            base_url: fetch.base_url,
            timeout_seconds: fetch.request_timeout_seconds,
            user_agent: fetch.user_agent,
        }
    }
}

/// HTTP client for technical-page retrieval
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client from the process-level FetchConfig
    pub fn from_fetch_config(fetch_config: &FetchConfig) -> Result<Self> {
        Self::with_config(HttpClientConfig::from_fetch_config(fetch_config))
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        // Validate the base URL up front rather than on every request
        Url::parse(&config.base_url)
            .map_err(|e| anyhow!("invalid base URL '{}': {}", config.base_url, e))?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| anyhow!("failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    /// URL of the technical page for one title id
    fn technical_page_url(&self, title_id: &str) -> String {
        format!(
            "{}/title/{}/technical",
            self.config.base_url.trim_end_matches('/'),
            title_id
        )
    }
}

#[async_trait]
impl TechnicalPageFetcher for HttpClient {
    async fn fetch_technical_page(&self, title_id: &str) -> Result<String, FetchError> {
        let url = self.technical_page_url(title_id);
        debug!("fetching technical page: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url,
            });
        }

        response.text().await.map_err(|e| FetchError::Transport {
            url,
            message: e.to_string(),
        })
    }
}
