use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    error::RelayError,
    model::{Coordinates, WeatherPayload},
};

use super::{WeatherArchive, get_json};

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

pub const DAILY_METRICS: &[&str] = &[
    "temperature_2m_max",
    "temperature_2m_min",
    "temperature_2m_mean",
    "precipitation_sum",
    "windspeed_10m_max",
];

pub const HOURLY_METRICS: &[&str] = &["relativehumidity_2m", "temperature_2m", "windspeed_10m"];

const MODELS: &str = "best_match";
const TIMEZONE: &str = "GMT";

#[derive(Debug, Clone)]
pub struct OpenMeteoArchive {
    http: Client,
    url: String,
}

impl OpenMeteoArchive {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }

    fn query(coordinates: Coordinates, start_date: &str, end_date: &str) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", coordinates.latitude.to_string()),
            ("longitude", coordinates.longitude.to_string()),
            ("start_date", start_date.to_string()),
            ("end_date", end_date.to_string()),
            ("models", MODELS.to_string()),
            ("daily", DAILY_METRICS.join(",")),
            ("hourly", HOURLY_METRICS.join(",")),
            ("timezone", TIMEZONE.to_string()),
        ]
    }
}

#[async_trait]
impl WeatherArchive for OpenMeteoArchive {
    #[instrument(skip(self), fields(lat = %coordinates.latitude, lon = %coordinates.longitude))]
    async fn fetch(
        &self,
        coordinates: Coordinates,
        start_date: &str,
        end_date: &str,
    ) -> Result<WeatherPayload, RelayError> {
        debug!(url = %self.url, "Fetching archived weather");

        let query = Self::query(coordinates, start_date, end_date);
        let json = get_json(&self.http, &self.url, &query).await?;

        project(json)
    }
}

/// Keep `daily`, `daily_units`, `hourly` and `hourly_units`; drop everything else.
pub fn project(json: Value) -> Result<WeatherPayload, RelayError> {
    if !json.is_object() {
        return Err(RelayError::Unavailable(
            "Archive response is not a JSON object".to_string(),
        ));
    }

    serde_json::from_value(json)
        .map_err(|e| RelayError::Unavailable(format!("Unexpected archive response: {e}")))
}
