use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::Html,
    routing::{get, post},
};
use relay_core::{WeatherRelay, WeatherReport};

use crate::error::ApiError;

pub const WEATHER_PATH: &str = "/content/api/v1/integration/weather";

const HOME_PAGE: &str = "<p><h2>Weather relay: historical weather by location.</h2></p>";

pub fn create_router(relay: WeatherRelay) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route(WEATHER_PATH, post(weather))
        .with_state(relay)
}

async fn home_page() -> Html<&'static str> {
    Html(HOME_PAGE)
}

async fn weather(
    State(relay): State<WeatherRelay>,
    body: Bytes,
) -> Result<Json<WeatherReport>, ApiError> {
    let report = relay.handle_body(&body).await?;
    Ok(Json(report))
}
