//! Alert extraction and report formatting

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::forecast::DayEntry;
use crate::{ForecastError, Result};

/// Placeholder for any field the forecast did not provide
pub const UNKNOWN: &str = "Unknown";

/// Line separating day blocks in a report
pub const BLOCK_SEPARATOR: &str = "---";

/// The fields reported for one forecast day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub weather: String,
    pub wind: String,
    pub wave: String,
    pub date: String,
}

impl fmt::Display for AlertRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "weather: {}", self.weather)?;
        writeln!(f, "wind: {}", self.wind)?;
        writeln!(f, "wave: {}", self.wave)?;
        write!(f, "date: {}", self.date)
    }
}

fn or_unknown(value: Option<&String>) -> String {
    value.map_or_else(|| UNKNOWN.to_string(), Clone::clone)
}

/// Extract the reported fields from one day entry
///
/// Every field falls back to [`UNKNOWN`]. An entry without a `detail`
/// object is rejected.
pub fn extract_alert(entry: &DayEntry) -> Result<AlertRecord> {
    let date = or_unknown(entry.date.as_ref());
    let Some(detail) = &entry.detail else {
        return Err(ForecastError::MalformedEntry { date });
    };

    Ok(AlertRecord {
        weather: or_unknown(detail.weather.as_ref()),
        wind: or_unknown(detail.wind.as_ref()),
        wave: or_unknown(detail.wave.as_ref()),
        date,
    })
}

/// Render day entries as one report, blocks separated by `---` lines
pub fn format_report(entries: &[DayEntry]) -> Result<String> {
    if entries.is_empty() {
        return Err(ForecastError::EmptyForecast);
    }

    let blocks = entries
        .iter()
        .map(|entry| extract_alert(entry).map(|record| record.to_string()))
        .collect::<Result<Vec<_>>>()?;

    Ok(blocks.join(&format!("\n{BLOCK_SEPARATOR}\n")))
}
