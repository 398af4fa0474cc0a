use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    error::RelayError,
    model::{Coordinates, GeocodeCandidate, Location},
};

use super::{Geocoder, get_json};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<GeocodeCandidate>>,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn search(&self, city: &str) -> Result<Option<Vec<GeocodeCandidate>>, RelayError> {
        debug!(url = %self.url, city, "Searching geocoding service");

        let json = get_json(&self.http, &self.url, &[("name", city.to_string())]).await?;

        let parsed: SearchResponse = serde_json::from_value(json)
            .map_err(|e| RelayError::Unavailable(format!("Unexpected geocoding response: {e}")))?;

        Ok(parsed.results)
    }
}

/// Resolve a location to coordinates.
///
/// Only the city goes upstream. The country filters the candidates locally,
/// and the first match in upstream order wins.
#[instrument(skip(geocoder), fields(country = %location.country, city = %location.city))]
pub async fn resolve(
    geocoder: &dyn Geocoder,
    location: &Location,
) -> Result<Coordinates, RelayError> {
    let candidates = geocoder
        .search(&location.city)
        .await?
        .ok_or(RelayError::LocationNotFound)?;

    let coordinates = select_candidate(&location.country, &candidates)?;
    debug!(
        latitude = coordinates.latitude,
        longitude = coordinates.longitude,
        candidates = candidates.len(),
        "Resolved location"
    );

    Ok(coordinates)
}

/// First candidate whose country equals `country`, ignoring case.
pub fn select_candidate(
    country: &str,
    candidates: &[GeocodeCandidate],
) -> Result<Coordinates, RelayError> {
    let wanted = country.to_lowercase();

    candidates
        .iter()
        .find(|c| {
            c.country
                .as_deref()
                .is_some_and(|name| name.to_lowercase() == wanted)
        })
        .map(GeocodeCandidate::coordinates)
        .ok_or(RelayError::LocationNotFound)
}
