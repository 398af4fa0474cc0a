use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_core::{ErrorBody, RelayError};

/// Response wrapper for [`RelayError`]; the only place a domain error becomes HTTP.
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ErrorBody { status_code, body } = ErrorBody::from(&self.0);
        let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::BAD_REQUEST);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Upstream failure");
        }

        (status, Json(body)).into_response()
    }
}
