//! `tenki` - Japanese region code lookup and weather forecast reports
//!
//! This library resolves prefecture and city names into forecast region
//! codes using the primary subdivision boundary document, and turns the
//! multi-day forecast for a region code into a plain-text report.

pub mod alerts;
pub mod api;
pub mod config;
pub mod error;
pub mod forecast;
pub mod http;
pub mod region;
pub mod service;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use alerts::{AlertRecord, extract_alert, format_report};
pub use config::TenkiConfig;
pub use error::ForecastError;
pub use forecast::{DayDetail, DayEntry, ForecastDocument, ForecastFetcher};
pub use region::{BoundaryIndex, BoundaryLoader, RegionCode, resolve_city_id};
pub use service::ForecastService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ForecastError>;
