//! The human-readable summary returned to callers

use crate::condition::describe;
use crate::conditions::CurrentReadings;
use crate::format::format_measurement;
use serde::{Deserialize, Serialize};

/// Provenance tag stamped on every summary
pub const PROVENANCE: &str = "open-meteo.com";

/// Formatted current conditions for one location.
///
/// Serializes as a flat JSON object of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// Resolved display name, e.g. "Seattle, Washington, US"
    pub location: String,
    /// Query as the caller sent it (trimmed)
    pub query: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub condition: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub precipitation: String,
    pub timezone: String,
    pub source: String,
}

/// Assemble a summary from already-fetched data. No I/O.
#[must_use]
pub fn build_summary(
    query: &str,
    resolved_name: &str,
    readings: &CurrentReadings,
    timezone: Option<&str>,
) -> WeatherSummary {
    let location = if resolved_name.is_empty() {
        query
    } else {
        resolved_name
    };

    WeatherSummary {
        location: location.to_string(),
        query: query.to_string(),
        temperature: format_measurement(readings.temperature_2m, "°C", 1),
        feels_like: format_measurement(readings.apparent_temperature, "°C", 1),
        humidity: format_measurement(readings.relative_humidity_2m, "%", 0),
        condition: describe(&readings.weather_code),
        wind_speed: format_measurement(readings.wind_speed_10m, " km/h", 1),
        wind_direction: format_measurement(readings.wind_direction_10m, "°", 0),
        precipitation: format_measurement(readings.precipitation, " mm", 1),
        timezone: timezone.filter(|tz| !tz.is_empty()).unwrap_or("auto").to_string(),
        source: PROVENANCE.to_string(),
    }
}
