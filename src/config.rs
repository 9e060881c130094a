//! Configuration management for `tenki`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ForecastError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenkiConfig {
    /// Outgoing HTTP request settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Remote document locations
    #[serde(default)]
    pub endpoints: EndpointConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP client settings shared by every request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// `User-Agent` header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Remote endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Primary subdivision (一次細分区域) boundary document
    #[serde(default = "default_boundary_url")]
    pub boundary_url: String,
    /// Forecast endpoint; the region code is appended as a path segment
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_user_agent() -> String {
    format!("tenki/{}", crate::VERSION)
}

fn default_timeout() -> u32 {
    10
}

fn default_boundary_url() -> String {
    "https://weather.tsukumijima.net/primary_area.xml".to_string()
}

fn default_forecast_base_url() -> String {
    "https://weather.tsukumijima.net/api/forecast/city".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            boundary_url: default_boundary_url(),
            forecast_base_url: default_forecast_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }
}

impl TenkiConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> crate::Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> crate::Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TENKI_HTTP__TIMEOUT_SECONDS=5
        builder = builder.add_source(
            Environment::with_prefix("TENKI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ForecastError::config(format!("Failed to build configuration: {e}")))?;

        let mut config: TenkiConfig = settings.try_deserialize().map_err(|e| {
            ForecastError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tenki").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_timeout();
        }
        if self.endpoints.boundary_url.is_empty() {
            self.endpoints.boundary_url = default_boundary_url();
        }
        if self.endpoints.forecast_base_url.is_empty() {
            self.endpoints.forecast_base_url = default_forecast_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.http.timeout_seconds > 300 {
            return Err(ForecastError::config(
                "HTTP timeout cannot exceed 300 seconds",
            ));
        }
        Ok(())
    }

    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("boundary URL", &self.endpoints.boundary_url),
            ("forecast base URL", &self.endpoints.forecast_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ForecastError::config(format!(
                    "The {name} must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        if self.http.user_agent.trim().is_empty() {
            return Err(ForecastError::config("User agent cannot be blank"));
        }

        Ok(())
    }
}
