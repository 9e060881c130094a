//! Thin HTTP transport shared by the boundary loader and the forecast fetcher
//!
//! Every call is a single GET; there is no retry and no cache. Transport
//! failures are converted into [`ForecastError::Fetch`] at this boundary.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::{ForecastError, Result};

pub const ACCEPT_XML: &str = "application/xml";
pub const ACCEPT_JSON: &str = "application/json";

/// HTTP client configured with the user agent and timeout from [`HttpConfig`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new fetcher
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .build()
            .map_err(|e| ForecastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// Issue one GET with the given `Accept` header and return the raw body
    #[tracing::instrument(name = "http_get", level = "debug", skip(self))]
    pub async fn get(&self, url: &str, accept: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("request timed out after {}s", self.timeout.as_secs())
                } else {
                    format!("request failed: {e}")
                };
                warn!("GET {} failed: {}", url, message);
                ForecastError::fetch(url, message)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} returned status {}", url, status);
            return Err(ForecastError::fetch(url, format!("unexpected status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ForecastError::fetch(url, format!("failed to read response body: {e}")))?;

        debug!("GET {} returned {} bytes", url, body.len());
        Ok(body.to_vec())
    }
}
