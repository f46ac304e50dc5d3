//! Weather lookup pipeline: geocode, fetch current conditions, summarize
//!
//! [`WeatherService`] owns one cache per stage. Build a fresh service for an
//! isolated cache state; there is no global cache and no clear hook.

use crate::Result;
use crate::cache::{Clock, SystemClock, TtlCache};
use crate::conditions::ConditionsFetcher;
use crate::config::WeatherConfig;
use crate::geocode::GeocodeResolver;
use crate::http::{HttpFetcher, ReqwestFetcher};
use crate::summary::{WeatherSummary, build_summary};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// A trimmed location query.
///
/// Empty or whitespace-only input becomes [`LocationQuery::AUTO`], which asks
/// the upstream to pick the caller's default location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    pub const AUTO: &'static str = "auto:ip";

    #[must_use]
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self(Self::AUTO.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.0 == Self::AUTO
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entry counts of the two stage caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheSizes {
    pub geocode: usize,
    pub conditions: usize,
}

/// The pipeline orchestrator and sole entry point for callers.
pub struct WeatherService {
    resolver: GeocodeResolver,
    conditions: ConditionsFetcher,
}

impl WeatherService {
    /// Create a service talking to the configured Open-Meteo endpoints
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let fetcher = Arc::new(ReqwestFetcher::new(config)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: &WeatherConfig, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self::with_fetcher_and_clock(config, fetcher, Arc::new(SystemClock))
    }

    pub fn with_fetcher_and_clock(
        config: &WeatherConfig,
        fetcher: Arc<dyn HttpFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let resolver = GeocodeResolver::new(
            Arc::clone(&fetcher),
            TtlCache::with_clock(Arc::clone(&clock)),
            config.geocode_base_url.clone(),
            config.geocode_ttl(),
        );
        let conditions = ConditionsFetcher::new(
            fetcher,
            TtlCache::with_clock(clock),
            config.api_base_url.clone(),
            config.conditions_ttl(),
        );
        Self::from_parts(resolver, conditions)
    }

    #[must_use]
    pub fn from_parts(resolver: GeocodeResolver, conditions: ConditionsFetcher) -> Self {
        Self {
            resolver,
            conditions,
        }
    }

    /// Resolve `location` and summarize its current weather.
    ///
    /// Any stage failure is returned unchanged; there is no partial result.
    #[instrument(skip(self))]
    pub async fn get_current_weather_summary(&self, location: &str) -> Result<WeatherSummary> {
        let query = LocationQuery::new(location);
        if query.is_auto() {
            debug!("No location given, letting the geocoder pick a default");
        }

        let geocode = self.resolver.resolve(query.as_str()).await?;
        let conditions = self
            .conditions
            .fetch(geocode.latitude, geocode.longitude)
            .await?;

        let summary = build_summary(
            query.as_str(),
            &geocode.display_name(),
            &conditions.readings,
            conditions.timezone.as_deref(),
        );
        info!(
            "Summarized weather for '{}' as {}",
            query, summary.location
        );

        Ok(summary)
    }

    /// Same as [`Self::get_current_weather_summary`] but always returns JSON text.
    ///
    /// Failures become `{"error": "<message>"}`; this never returns an error.
    pub async fn get_current_weather_json(&self, location: &str) -> String {
        let outcome = self
            .get_current_weather_summary(location)
            .await
            .and_then(|summary| serde_json::to_string(&summary).map_err(Into::into));

        match outcome {
            Ok(json) => json,
            Err(e) => {
                if e.is_upstream() {
                    error!("Weather lookup for '{}' failed upstream: {}", location, e);
                } else {
                    warn!("Weather lookup for '{}' failed: {}", location, e);
                }
                json!({ "error": e.to_string() }).to_string()
            }
        }
    }

    #[must_use]
    pub fn cache_sizes(&self) -> CacheSizes {
        CacheSizes {
            geocode: self.resolver.cached_entries(),
            conditions: self.conditions.cached_entries(),
        }
    }
}
