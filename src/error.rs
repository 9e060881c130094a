//! Error types and handling for the forecast pipeline

use thiserror::Error;

/// Prefix shared by every user-facing failure message.
const USER_MESSAGE_PREFIX: &str = "天気予報取得で例外発生: ";

/// Main error type for region lookup and forecast retrieval
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// Transport failure: connection, timeout or non-success status
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Boundary document is not well-formed XML
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Forecast body does not have the expected JSON shape
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Boundary document produced no prefecture entries
    #[error("Boundary index is missing or empty")]
    MissingIndex,

    #[error("Prefecture not found: {pref}")]
    PrefNotFound { pref: String },

    #[error("City not found: {city}")]
    CityNotFound { city: String },

    /// City resolved but the document assigns it no region code
    #[error("No region code assigned to {city} ({pref})")]
    EmptyCode { pref: String, city: String },

    #[error("Invalid region code: {code:?}")]
    InvalidRegionCode { code: String },

    /// Forecast document carried no day entries
    #[error("Forecast contains no day entries")]
    EmptyForecast,

    /// A day entry lacks its `detail` object
    #[error("Forecast entry for {date} has no detail")]
    MalformedEntry { date: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ForecastError {
    /// Create a new fetch error for the given URL
    pub fn fetch<U: Into<String>, S: Into<String>>(url: U, message: S) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new XML parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new JSON decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the failure came from the network or the remote payload rather
    /// than from the lookup itself
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ForecastError::Fetch { .. } | ForecastError::Parse { .. } | ForecastError::Decode { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        let detail = match self {
            ForecastError::Fetch { url, .. } => {
                format!("URL '{url}' へのアクセスに失敗しました。")
            }
            ForecastError::Parse { .. } => "地域情報の XML の解析に失敗しました。".to_string(),
            ForecastError::Decode { .. } => "予報データの形式が不正です。".to_string(),
            ForecastError::MissingIndex => "地域情報を得るのに失敗しました。".to_string(),
            ForecastError::PrefNotFound { pref } => format!("都道府県が見つかりません: {pref}"),
            ForecastError::CityNotFound { city } => format!("地域名が見つかりません: {city}"),
            ForecastError::EmptyCode { .. } => "地域 ID が見つかりません。".to_string(),
            ForecastError::InvalidRegionCode { code } => format!("地域 ID が不正です: {code}"),
            ForecastError::EmptyForecast => "予報が空です。".to_string(),
            ForecastError::MalformedEntry { date } => {
                format!("予報の詳細がありません: {date}")
            }
            ForecastError::Config { message } => format!("設定エラー: {message}"),
        };
        format!("{USER_MESSAGE_PREFIX}{detail}")
    }
}
