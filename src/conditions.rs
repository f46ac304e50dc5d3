//! Current conditions lookup against the Open-Meteo forecast endpoint

use crate::cache::TtlCache;
use crate::http::HttpFetcher;
use crate::{Result, WeatherError};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Fields requested from the forecast endpoint's `current` block
pub const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,weather_code,wind_speed_10m,wind_direction_10m,precipitation";

/// Present-moment readings. Every reading may be missing from the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentReadings {
    /// Air temperature at 2 m in °C
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    /// Apparent ("feels like") temperature in °C
    #[serde(default)]
    pub apparent_temperature: Option<f64>,
    /// Relative humidity at 2 m in %
    #[serde(default)]
    pub relative_humidity_2m: Option<f64>,
    /// WMO weather code, kept raw so odd values degrade instead of failing
    #[serde(default)]
    pub weather_code: Value,
    /// Wind speed at 10 m in km/h
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
    /// Wind direction at 10 m in degrees
    #[serde(default)]
    pub wind_direction_10m: Option<f64>,
    /// Precipitation in mm
    #[serde(default)]
    pub precipitation: Option<f64>,
}

/// Current readings plus the timezone the upstream resolved for the coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionsResult {
    pub readings: CurrentReadings,
    pub timezone: Option<String>,
}

/// Cache key for a coordinate pair, rounded to 4 decimals (~11 m).
#[must_use]
pub fn coordinate_cache_key(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.4},{longitude:.4}")
}

/// Fetches current conditions for coordinates, with caching.
pub struct ConditionsFetcher {
    fetcher: Arc<dyn HttpFetcher>,
    cache: TtlCache<ConditionsResult>,
    base_url: String,
    ttl: TimeDelta,
}

impl ConditionsFetcher {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        cache: TtlCache<ConditionsResult>,
        base_url: impl Into<String>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            fetcher,
            cache,
            base_url: base_url.into(),
            ttl,
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ConditionsResult> {
        let cache_key = coordinate_cache_key(latitude, longitude);
        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("Conditions cache hit for {}", cache_key);
            return Ok(cached);
        }

        info!(
            "Getting current weather for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );

        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        let payload = self.fetcher.fetch(&self.base_url, &params).await?;

        let current = match payload.get("current") {
            Some(Value::Object(fields)) if !fields.is_empty() => Value::Object(fields.clone()),
            _ => {
                warn!("No current weather data for {}", cache_key);
                return Err(WeatherError::MissingConditions);
            }
        };

        let result = ConditionsResult {
            readings: serde_json::from_value(current)?,
            timezone: payload
                .get("timezone")
                .and_then(Value::as_str)
                .map(str::to_string),
        };

        self.cache.set(&cache_key, result.clone(), self.ttl);
        Ok(result)
    }

    /// Number of cached coordinate entries
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}
