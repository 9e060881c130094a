use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{ForecastError, ForecastService};

#[derive(Debug, Deserialize)]
pub struct CityIdQuery {
    pub pref: String,
    pub city: String,
}

/// Error body returned to the tool host: status per kind, user-facing text
pub struct ApiError(ForecastError);

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        if self.0.is_upstream() {
            return StatusCode::BAD_GATEWAY;
        }
        match &self.0 {
            ForecastError::PrefNotFound { .. }
            | ForecastError::CityNotFound { .. }
            | ForecastError::EmptyCode { .. } => StatusCode::NOT_FOUND,
            ForecastError::EmptyForecast
            | ForecastError::MalformedEntry { .. }
            | ForecastError::InvalidRegionCode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ForecastError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ForecastError::MissingIndex
            | ForecastError::Fetch { .. }
            | ForecastError::Parse { .. }
            | ForecastError::Decode { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.0.user_message()).into_response()
    }
}

pub fn router(service: ForecastService) -> Router {
    Router::new()
        .route("/city-id", get(get_city_id))
        .route("/alerts/{code}", get(get_alerts))
        .with_state(service)
}

async fn get_city_id(
    State(service): State<ForecastService>,
    Query(query): Query<CityIdQuery>,
) -> Result<String, ApiError> {
    let code = service.get_city_id(&query.pref, &query.city).await?;
    Ok(code.into())
}

async fn get_alerts(
    State(service): State<ForecastService>,
    Path(code): Path<String>,
) -> Result<String, ApiError> {
    Ok(service.get_alerts(&code).await?)
}
