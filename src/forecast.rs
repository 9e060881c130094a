//! Forecast document model and fetcher
//!
//! The forecast service answers `GET {base}/{region_code}` with a
//! livedoor-compatible JSON document. Only the fields the report needs are
//! modelled; everything else in the payload is ignored.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::http::{ACCEPT_JSON, HttpFetcher};
use crate::{ForecastError, Result};

/// Decoded forecast response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub public_time: Option<String>,
    /// Day entries in the order the service returned them
    #[serde(default)]
    pub forecasts: Option<Vec<DayEntry>>,
}

impl ForecastDocument {
    /// Day entries, empty when the field was absent or `null`
    #[must_use]
    pub fn day_entries(&self) -> &[DayEntry] {
        self.forecasts.as_deref().unwrap_or_default()
    }
}

/// One day of the forecast
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    #[serde(default)]
    pub date: Option<String>,
    /// "今日", "明日", "明後日"
    #[serde(default)]
    pub date_label: Option<String>,
    #[serde(default)]
    pub telop: Option<String>,
    #[serde(default)]
    pub detail: Option<DayDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDetail {
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub wind: Option<String>,
    #[serde(default)]
    pub wave: Option<String>,
}

/// Decode a forecast body
pub fn decode_forecast(body: &[u8]) -> Result<ForecastDocument> {
    serde_json::from_slice(body)
        .map_err(|e| ForecastError::decode(format!("Failed to decode forecast response: {e}")))
}

/// Fetches forecast documents by region code
#[derive(Debug, Clone)]
pub struct ForecastFetcher {
    fetcher: HttpFetcher,
    base_url: String,
}

impl ForecastFetcher {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Endpoint for the given region code
    #[must_use]
    pub fn forecast_url(&self, region_code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), region_code)
    }

    /// Fetch and decode the forecast for a region code
    ///
    /// The code is passed through as given; a bad code surfaces as an
    /// upstream error or an empty forecast.
    #[tracing::instrument(name = "fetch_forecast", skip(self))]
    pub async fn fetch(&self, region_code: &str) -> Result<ForecastDocument> {
        let url = self.forecast_url(region_code);
        info!("Fetching forecast from: {}", url);

        let body = self.fetcher.get(&url, ACCEPT_JSON).await?;
        let document = decode_forecast(&body).inspect_err(|e| {
            warn!("Failed to decode forecast for {}: {}", region_code, e);
        })?;

        info!(
            "Received {} forecast entries for {}",
            document.day_entries().len(),
            region_code
        );
        Ok(document)
    }
}
