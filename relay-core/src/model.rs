use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Inbound body as sent by the client. Every field may be missing; the
/// validator decides what is required.
///
/// The token keeps whatever JSON the client sent so a non-string token is a
/// mismatch rather than a parse failure. Other fields that are not strings
/// read as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWeatherRequest {
    #[serde(default)]
    pub token: Option<Value>,
    #[serde(default, deserialize_with = "text")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub requester_name: Option<String>,
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// `Country:City`, split on the first separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub country: String,
    pub city: String,
}

/// A request that passed validation. Dates are kept verbatim; the archive
/// service is the one that judges their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub start_date: String,
    pub end_date: String,
    pub location: Location,
    pub requester_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One geocoding search hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeCandidate {
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeocodeCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// The four archive fields passed back to the client. Anything else in the
/// upstream response is dropped during deserialization; absent fields stay `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    #[serde(default)]
    pub daily: Option<Value>,
    #[serde(default)]
    pub daily_units: Option<Value>,
    #[serde(default)]
    pub hourly: Option<Value>,
    #[serde(default)]
    pub hourly_units: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub requester_name: String,
    pub start_date: String,
    pub end_date: String,
    pub weather: WeatherPayload,
}
