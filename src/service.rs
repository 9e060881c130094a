//! Top-level operations
//!
//! `get_city_id` composes the boundary loader with the resolver;
//! `get_alerts` composes the forecast fetcher with the formatter. The two
//! share nothing but the HTTP client.

use tracing::{info, warn};

use crate::alerts::format_report;
use crate::config::TenkiConfig;
use crate::forecast::ForecastFetcher;
use crate::http::HttpFetcher;
use crate::region::{BoundaryLoader, RegionCode, resolve_city_id};
use crate::Result;

/// Entry point used by the CLI and the HTTP tool host
#[derive(Debug, Clone)]
pub struct ForecastService {
    boundaries: BoundaryLoader,
    forecasts: ForecastFetcher,
}

impl ForecastService {
    /// Create a new service
    pub fn new(config: &TenkiConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.http)?;
        Ok(Self {
            boundaries: BoundaryLoader::new(fetcher.clone(), &config.endpoints.boundary_url),
            forecasts: ForecastFetcher::new(fetcher, &config.endpoints.forecast_base_url),
        })
    }

    /// Region code for a city inside a prefecture
    ///
    /// The boundary document is fetched again on every call.
    pub async fn get_city_id(&self, pref: &str, city: &str) -> Result<RegionCode> {
        let index = self.boundaries.load().await?;
        let code = resolve_city_id(&index, pref, city).inspect_err(|e| {
            warn!("Region lookup for {} / {} failed: {}", pref, city, e);
        })?;

        info!("Resolved {} / {} to {}", pref, city, code);
        Ok(code)
    }

    /// Formatted multi-day report for a region code
    pub async fn get_alerts(&self, region_code: &str) -> Result<String> {
        let document = self.forecasts.fetch(region_code).await?;
        format_report(document.day_entries()).inspect_err(|e| {
            warn!("Forecast for {} could not be reported: {}", region_code, e);
        })
    }
}
