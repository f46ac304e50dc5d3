//! WMO weather interpretation codes as reported by Open-Meteo

use serde_json::Value;

/// Known weather codes and their descriptions.
pub const WEATHER_CODES: [(i64, &str); 28] = [
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (56, "Light freezing drizzle"),
    (57, "Dense freezing drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (66, "Light freezing rain"),
    (67, "Heavy freezing rain"),
    (71, "Slight snowfall"),
    (73, "Moderate snowfall"),
    (75, "Heavy snowfall"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

const UNKNOWN_CONDITIONS: &str = "Unknown conditions";

/// Describe a numeric weather code; codes outside the table degrade to `"Weather code N"`.
#[must_use]
pub fn describe_code(code: i64) -> String {
    WEATHER_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or_else(|| format!("Weather code {code}"), |(_, text)| (*text).to_string())
}

/// Describe a weather code taken straight from a JSON payload.
///
/// Integers, floats (truncated) and numeric strings are accepted. Anything
/// else yields `"Unknown conditions"`.
#[must_use]
pub fn describe(code: &Value) -> String {
    match code {
        // Beyond i64 nothing is in the table; keep the number's exact text
        Value::Number(n) if n.is_u64() && !n.is_i64() => format!("Weather code {n}"),
        Value::Number(n) => match n.as_i64() {
            Some(code) => describe_code(code),
            None => match n.as_f64().filter(|f| f.is_finite()).map(f64::trunc) {
                Some(whole) if fits_i64(whole) => describe_code(whole as i64),
                Some(whole) => format!("Weather code {whole:.0}"),
                None => UNKNOWN_CONDITIONS.to_string(),
            },
        },
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_or_else(|_| UNKNOWN_CONDITIONS.to_string(), describe_code),
        Value::Bool(b) => describe_code(i64::from(*b)),
        _ => UNKNOWN_CONDITIONS.to_string(),
    }
}

fn fits_i64(whole: f64) -> bool {
    whole >= i64::MIN as f64 && whole < i64::MAX as f64
}
