//! Core library for the historical weather relay.
//!
//! This crate defines:
//! - Configuration & access token handling
//! - Request validation
//! - Open-Meteo geocoding and archive clients behind traits
//! - The request handler and its error contract
//!
//! It is used by `relay-server`, which only adds routing and process setup.

pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod provider;
pub mod validate;

pub use config::Config;
pub use error::{ErrorBody, RelayError};
pub use handler::WeatherRelay;
pub use model::{
    Coordinates, GeocodeCandidate, Location, RawWeatherRequest, WeatherPayload, WeatherReport,
    WeatherRequest,
};
pub use provider::{
    Geocoder, WeatherArchive, archive::OpenMeteoArchive, geocoding::OpenMeteoGeocoder,
    providers_from_config,
};
pub use validate::Validator;
