use serde_json::{Map, Value};
use thiserror::Error;

/// Fallback reason when an upstream service flags an error without explaining it.
pub const UNKNOWN_UPSTREAM_REASON: &str = "Unknown weather api error";

/// Every way a single relay request can fail.
///
/// Each stage returns this type and nothing inspects it until the HTTP boundary,
/// where [`ErrorBody`] turns it into the client-facing JSON.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelayError {
    #[error("Request body must be a JSON object")]
    MalformedBody,

    #[error("token is required")]
    MissingToken,

    #[error("wrong API token")]
    InvalidToken,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please provide location in format: 'Country:City'")]
    MalformedLocation,

    #[error("{0}")]
    Upstream(String),

    #[error("Location not found")]
    LocationNotFound,

    /// The upstream could not be reached or answered with something that is not JSON.
    #[error("Upstream service unavailable: {0}")]
    Unavailable(String),
}

impl RelayError {
    /// Upstream error using the service's reason when it gave one.
    pub fn upstream(reason: Option<&str>) -> Self {
        let reason = reason
            .filter(|r| !r.is_empty())
            .unwrap_or(UNKNOWN_UPSTREAM_REASON);
        RelayError::Upstream(reason.to_string())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::InvalidToken => 403,
            RelayError::LocationNotFound => 404,
            RelayError::Unavailable(_) => 502,
            RelayError::MalformedBody
            | RelayError::MissingToken
            | RelayError::MissingField(_)
            | RelayError::MalformedLocation
            | RelayError::Upstream(_) => 400,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Extra fields merged into the error body next to `message`.
    pub fn payload(&self) -> Option<Map<String, Value>> {
        match self {
            RelayError::MissingField(field) => Some(Map::from_iter([(
                "field".to_string(),
                Value::from(*field),
            )])),
            _ => None,
        }
    }
}

/// Client-facing error body: the payload fields plus `message`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub status_code: u16,
    pub body: Value,
}

impl From<&RelayError> for ErrorBody {
    fn from(err: &RelayError) -> Self {
        let mut body = err.payload().unwrap_or_default();
        body.insert("message".to_string(), Value::String(err.message()));

        Self {
            status_code: err.status_code(),
            body: Value::Object(body),
        }
    }
}
