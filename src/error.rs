//! Error types for the weather summary pipeline

use thiserror::Error;

/// Every way a weather lookup can fail.
///
/// None of these are retried inside the pipeline. A failure at any stage
/// aborts the whole call and is surfaced to the caller as text.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Connection, DNS or timeout failure while reaching an upstream
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Upstream answered with a non-success HTTP status
    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// Geocoding search returned no candidates
    #[error("Unable to resolve location '{location}'.")]
    UnresolvableLocation { location: String },

    /// Forecast payload had no `current` section
    #[error("Open-Meteo response did not include 'current' data.")]
    MissingConditions,

    /// Upstream body could not be decoded into the expected shape
    #[error("Invalid upstream response: {message}")]
    InvalidResponse { message: String },

    /// Configuration was rejected at load time
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl WeatherError {
    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new upstream status error
    pub fn upstream_status<S: Into<String>>(status: u16, url: S) -> Self {
        Self::UpstreamStatus {
            status,
            url: url.into(),
        }
    }

    /// Create a new unresolvable location error
    pub fn unresolvable<S: Into<String>>(location: S) -> Self {
        Self::UnresolvableLocation {
            location: location.into(),
        }
    }

    /// Create a new invalid response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the failure happened while talking to an upstream service
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            WeatherError::Transport { .. }
                | WeatherError::UpstreamStatus { .. }
                | WeatherError::InvalidResponse { .. }
        )
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WeatherError::invalid_response(err.to_string())
        } else if let Some(status) = err.status() {
            let url = err.url().map(ToString::to_string).unwrap_or_default();
            WeatherError::upstream_status(status.as_u16(), url)
        } else {
            WeatherError::transport(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for WeatherError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => WeatherError::transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::invalid_response(err.to_string())
    }
}

impl From<config::ConfigError> for WeatherError {
    fn from(err: config::ConfigError) -> Self {
        WeatherError::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let transport = WeatherError::transport("connection refused");
        assert!(matches!(transport, WeatherError::Transport { .. }));

        let status = WeatherError::upstream_status(503, "https://example.com");
        assert!(matches!(
            status,
            WeatherError::UpstreamStatus { status: 503, .. }
        ));

        let unresolvable = WeatherError::unresolvable("Atlantis");
        assert!(matches!(
            unresolvable,
            WeatherError::UnresolvableLocation { .. }
        ));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            WeatherError::unresolvable("Atlantis").to_string(),
            "Unable to resolve location 'Atlantis'."
        );
        assert_eq!(
            WeatherError::MissingConditions.to_string(),
            "Open-Meteo response did not include 'current' data."
        );
        assert!(
            WeatherError::upstream_status(500, "https://example.com/search")
                .to_string()
                .contains("500")
        );
    }

    #[test]
    fn test_upstream_classification() {
        assert!(WeatherError::transport("timeout").is_upstream());
        assert!(WeatherError::upstream_status(502, "u").is_upstream());
        assert!(!WeatherError::unresolvable("x").is_upstream());
        assert!(!WeatherError::MissingConditions.is_upstream());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: WeatherError = json_err.into();
        assert!(matches!(err, WeatherError::InvalidResponse { .. }));
    }
}
