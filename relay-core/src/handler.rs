use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    error::RelayError,
    model::{RawWeatherRequest, WeatherReport},
    provider::{Geocoder, WeatherArchive, geocoding},
    validate::Validator,
};

/// Validate, geocode, fetch, assemble. Stages run strictly in order and the
/// first failure is returned as is.
#[derive(Debug, Clone)]
pub struct WeatherRelay {
    validator: Validator,
    geocoder: Arc<dyn Geocoder>,
    archive: Arc<dyn WeatherArchive>,
}

impl WeatherRelay {
    pub fn new(
        validator: Validator,
        geocoder: Arc<dyn Geocoder>,
        archive: Arc<dyn WeatherArchive>,
    ) -> Self {
        Self {
            validator,
            geocoder,
            archive,
        }
    }

    /// Entry point for raw request bodies.
    pub async fn handle_body(&self, body: &[u8]) -> Result<WeatherReport, RelayError> {
        let json: Value = serde_json::from_slice(body).map_err(|_| RelayError::MalformedBody)?;
        if !json.is_object() {
            return Err(RelayError::MalformedBody);
        }
        let raw: RawWeatherRequest =
            serde_json::from_value(json).map_err(|_| RelayError::MalformedBody)?;

        self.handle(raw).await
    }

    #[instrument(skip_all, fields(requester = raw.requester_name.as_deref().unwrap_or_default()))]
    pub async fn handle(&self, raw: RawWeatherRequest) -> Result<WeatherReport, RelayError> {
        let request = self.validator.validate(raw).inspect_err(|e| {
            info!(error = %e, "Rejected weather request");
        })?;

        let coordinates = geocoding::resolve(self.geocoder.as_ref(), &request.location).await?;

        let weather = self
            .archive
            .fetch(coordinates, &request.start_date, &request.end_date)
            .await?;

        info!(
            country = %request.location.country,
            city = %request.location.city,
            "Weather request served"
        );

        Ok(WeatherReport {
            requester_name: request.requester_name,
            start_date: request.start_date,
            end_date: request.end_date,
            weather,
        })
    }
}
