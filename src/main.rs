use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use weather_summary::{WeatherConfig, WeatherService, web};

/// With arguments, prints the JSON summary for the joined location and exits.
/// Without arguments, serves the HTTP API on the configured address.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = WeatherConfig::load().context("Failed to load configuration")?;
    let service = WeatherService::new(&config).context("Failed to create weather service")?;

    let location = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if !location.is_empty() {
        println!("{}", service.get_current_weather_json(&location).await);
        return Ok(());
    }

    web::run(Arc::new(service), &config.bind_address()).await
}
