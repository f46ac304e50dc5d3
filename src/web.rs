use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::service::WeatherService;

const STATIC_DIR: &str = "static";

#[derive(Debug, Default, Deserialize)]
pub struct WeatherRequest {
    #[serde(default)]
    pub location: Option<String>,
}

pub fn router(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/weather", post(weather))
        .with_state(service)
}

pub async fn run(service: Arc<WeatherService>, addr: &str) -> anyhow::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(service)
        .fallback_service(ServeDir::new(STATIC_DIR))
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// Malformed or missing bodies are treated like an empty location
async fn weather(State(service): State<Arc<WeatherService>>, body: String) -> Response {
    let request: WeatherRequest = serde_json::from_str(&body).unwrap_or_default();
    let location = request.location.unwrap_or_default();
    let location = location.trim();

    if location.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Please enter a location." })),
        )
            .into_response();
    }

    match service.get_current_weather_summary(location).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            if e.is_upstream() {
                tracing::warn!("Upstream failure for '{}': {}", location, e);
            } else {
                tracing::info!("Lookup for '{}' failed: {}", location, e);
            }
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
