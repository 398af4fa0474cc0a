use crate::{
    Config,
    error::RelayError,
    model::{Coordinates, GeocodeCandidate, WeatherPayload},
    provider::{archive::OpenMeteoArchive, geocoding::OpenMeteoGeocoder},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::{fmt::Debug, time::Duration};

pub mod archive;
pub mod geocoding;

/// Search-by-name geocoding service.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Candidates in upstream order, or `None` when the service returned no result list.
    async fn search(&self, city: &str) -> Result<Option<Vec<GeocodeCandidate>>, RelayError>;
}

/// Historical weather archive.
#[async_trait]
pub trait WeatherArchive: Send + Sync + Debug {
    async fn fetch(
        &self,
        coordinates: Coordinates,
        start_date: &str,
        end_date: &str,
    ) -> Result<WeatherPayload, RelayError>;
}

/// Build both Open-Meteo clients from config, sharing one HTTP client.
pub fn providers_from_config(
    config: &Config,
) -> anyhow::Result<(OpenMeteoGeocoder, OpenMeteoArchive)> {
    let http = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to build HTTP client for upstream services")?;

    Ok((
        OpenMeteoGeocoder::new(http.clone(), config.geocoding_url.clone()),
        OpenMeteoArchive::new(http, config.archive_url.clone()),
    ))
}

/// GET `url` and return the JSON body, failing on the upstream error shape
/// (`{"error": true, "reason": ...}`) or on a non-success status.
pub(crate) async fn get_json(
    http: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<Value, RelayError> {
    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| RelayError::Unavailable(e.to_string()))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| RelayError::Unavailable(e.to_string()))?;

    let json: Value = serde_json::from_str(&body).map_err(|_| {
        RelayError::Unavailable(format!(
            "{url} answered with status {status} and a non-JSON body: {}",
            truncate_body(&body)
        ))
    })?;

    if json.get("error").and_then(Value::as_bool) == Some(true) {
        let reason = json.get("reason").and_then(Value::as_str);
        tracing::warn!(%url, %status, reason, "Upstream reported an error");
        return Err(RelayError::upstream(reason));
    }

    if !status.is_success() {
        tracing::warn!(%url, %status, "Upstream request failed");
        return Err(RelayError::Upstream(format!(
            "Upstream request failed with status {status}"
        )));
    }

    Ok(json)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
