use std::fmt;

use crate::{
    error::RelayError,
    model::{Location, RawWeatherRequest, WeatherRequest},
};

const LOCATION_SEPARATOR: char = ':';

/// Checks inbound requests against the configured access token.
#[derive(Clone)]
pub struct Validator {
    token: String,
}

// Keeps the token out of debug output and logs.
impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

impl Validator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Fails on the first problem found: token presence, token value, then the
    /// required fields in a fixed order, then the location format.
    pub fn validate(&self, raw: RawWeatherRequest) -> Result<WeatherRequest, RelayError> {
        let token = raw.token.ok_or(RelayError::MissingToken)?;
        if token.as_str() != Some(self.token.as_str()) {
            return Err(RelayError::InvalidToken);
        }

        let start_date = required("start_date", raw.start_date)?;
        let end_date = required("end_date", raw.end_date)?;
        let location = required("location", raw.location)?;
        let requester_name = required("requester_name", raw.requester_name)?;

        let location: Location = location.parse()?;

        Ok(WeatherRequest {
            start_date,
            end_date,
            location,
            requester_name,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, RelayError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(RelayError::MissingField(field))
}

impl std::str::FromStr for Location {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (country, city) = s
            .split_once(LOCATION_SEPARATOR)
            .ok_or(RelayError::MalformedLocation)?;

        if country.is_empty() || city.is_empty() {
            return Err(RelayError::MalformedLocation);
        }

        Ok(Location {
            country: country.to_string(),
            city: city.to_string(),
        })
    }
}
