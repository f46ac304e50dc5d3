//! Configuration for the weather summary service
//!
//! Settings are read from an optional TOML file and then overridden by
//! `WEATHER_*` environment variables, e.g. `WEATHER_API_TIMEOUT=5`.

use crate::{Result, WeatherError};
use chrono::TimeDelta;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

const ENV_PREFIX: &str = "WEATHER";
const DEFAULT_CONFIG_FILE: &str = "weather.toml";

/// Root configuration consumed by the pipeline and the binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Forecast endpoint (`WEATHER_API_BASE_URL`)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Geocoding endpoint (`WEATHER_GEOCODE_BASE_URL`)
    #[serde(default = "default_geocode_base_url")]
    pub geocode_base_url: String,
    /// Per-request timeout in seconds (`WEATHER_API_TIMEOUT`)
    #[serde(default = "default_api_timeout")]
    pub api_timeout: f64,
    /// Retries for transient upstream failures (`WEATHER_API_MAX_RETRIES`)
    #[serde(default)]
    pub api_max_retries: u32,
    /// Geocode cache TTL in seconds; zero or negative disables caching
    #[serde(default = "default_geocode_cache_ttl")]
    pub geocode_cache_ttl: f64,
    /// Current conditions cache TTL in seconds; zero or negative disables caching
    #[serde(default = "default_current_cache_ttl")]
    pub current_cache_ttl: f64,
    /// Bind address of the HTTP front end (`WEATHER_APP_HOST`)
    #[serde(default = "default_app_host")]
    pub app_host: String,
    /// Bind port of the HTTP front end (`WEATHER_APP_PORT`)
    #[serde(default = "default_app_port")]
    pub app_port: u16,
}

fn default_api_base_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_geocode_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_api_timeout() -> f64 {
    10.0
}

fn default_geocode_cache_ttl() -> f64 {
    86_400.0
}

fn default_current_cache_ttl() -> f64 {
    300.0
}

fn default_app_host() -> String {
    "127.0.0.1".to_string()
}

fn default_app_port() -> u16 {
    5000
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            geocode_base_url: default_geocode_base_url(),
            api_timeout: default_api_timeout(),
            api_max_retries: 0,
            geocode_cache_ttl: default_geocode_cache_ttl(),
            current_cache_ttl: default_current_cache_ttl(),
            app_host: default_app_host(),
            app_port: default_app_port(),
        }
    }
}

impl WeatherConfig {
    /// Load configuration from `weather.toml` (if present) and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(None, None)
    }

    /// Load configuration from an explicit file and/or environment map.
    ///
    /// `env` replaces the process environment when given, which keeps tests
    /// independent of each other.
    pub fn load_from(
        config_path: Option<PathBuf>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        );

        let config: WeatherConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("forecast", &self.api_base_url),
            ("geocoding", &self.geocode_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherError::config(format!(
                    "The {name} base URL must be a valid HTTP or HTTPS URL, got '{url}'"
                )));
            }
        }

        if !(self.api_timeout > 0.0) {
            return Err(WeatherError::config("API timeout must be positive"));
        }

        if self.api_timeout > 300.0 {
            return Err(WeatherError::config(
                "API timeout cannot exceed 300 seconds",
            ));
        }

        if self.api_max_retries > 10 {
            return Err(WeatherError::config("API max retries cannot exceed 10"));
        }

        Ok(())
    }

    /// Request timeout applied to every upstream call
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.api_timeout)
    }

    #[must_use]
    pub fn geocode_ttl(&self) -> TimeDelta {
        seconds_to_delta(self.geocode_cache_ttl)
    }

    #[must_use]
    pub fn conditions_ttl(&self) -> TimeDelta {
        seconds_to_delta(self.current_cache_ttl)
    }

    /// `host:port` the HTTP front end binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app_host, self.app_port)
    }
}

fn seconds_to_delta(seconds: f64) -> TimeDelta {
    if !seconds.is_finite() {
        return TimeDelta::zero();
    }
    let millis = (seconds * 1000.0) as i64;
    TimeDelta::try_milliseconds(millis).unwrap_or(if millis < 0 {
        TimeDelta::MIN
    } else {
        TimeDelta::MAX
    })
}
