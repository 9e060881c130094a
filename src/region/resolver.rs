//! Region Resolution Module
//!
//! Looks up a (prefecture, city) pair in a [`BoundaryIndex`]. Names are
//! compared by exact string equality; callers supply them in the form the
//! boundary document uses (e.g. "福岡", not "福岡市").

use tracing::debug;

use super::{BoundaryIndex, RegionCode};
use crate::{ForecastError, Result};

/// Resolve a city inside the given prefecture scope to its region code
pub fn resolve_city_id(index: &BoundaryIndex, pref: &str, city: &str) -> Result<RegionCode> {
    debug!("Resolving region code for {} / {}", pref, city);

    let cities = index
        .prefecture(pref)
        .ok_or_else(|| ForecastError::PrefNotFound {
            pref: pref.to_string(),
        })?;

    let code = cities.get(city).ok_or_else(|| ForecastError::CityNotFound {
        city: city.to_string(),
    })?;

    match code.as_deref() {
        None | Some("") => Err(ForecastError::EmptyCode {
            pref: pref.to_string(),
            city: city.to_string(),
        }),
        Some(code) => RegionCode::new(code),
    }
}
