//! Geocoding: turn a free-text place name into coordinates
//!
//! Uses the Open-Meteo geocoding search. Results are cached per normalized
//! query string, so `"Seattle"` and `" SEATTLE "` share one entry.

use crate::cache::TtlCache;
use crate::http::HttpFetcher;
use crate::{Result, WeatherError};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Best match returned by the geocoding search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Place name
    #[serde(default)]
    pub name: String,
    /// First-level administrative area (state, province, ...)
    #[serde(rename = "admin1", default)]
    pub region: Option<String>,
    /// Country name
    #[serde(default)]
    pub country: Option<String>,
    /// Country code (ISO 3166-1 alpha-2)
    #[serde(default)]
    pub country_code: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeocodeResult {
    /// Display name such as `"Seattle, Washington, US"`.
    ///
    /// The country code is preferred over the country name; empty parts are skipped.
    #[must_use]
    pub fn display_name(&self) -> String {
        let country = self
            .country_code
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.country.as_deref());

        [Some(self.name.as_str()), self.region.as_deref(), country]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Cache key for a geocoding query: trimmed and lower-cased.
#[must_use]
pub fn geocode_cache_key(location: &str) -> String {
    location.trim().to_lowercase()
}

/// Resolves location names through the geocoding endpoint, with caching.
pub struct GeocodeResolver {
    fetcher: Arc<dyn HttpFetcher>,
    cache: TtlCache<GeocodeResult>,
    base_url: String,
    ttl: TimeDelta,
}

impl GeocodeResolver {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        cache: TtlCache<GeocodeResult>,
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

    /// Resolve a location to its best geocoding match.
    ///
    /// The upstream ranking is trusted: the first result wins even when
    /// several places share the name. Exactly one upstream call is made per
    /// cache miss.
    #[instrument(skip(self))]
    pub async fn resolve(&self, location: &str) -> Result<GeocodeResult> {
        let cache_key = geocode_cache_key(location);
        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("Geocode cache hit for '{}'", cache_key);
            return Ok(cached);
        }

        let location = location.trim();
        info!("Geocoding location: '{}'", location);

        let params = [
            ("name", location.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        let payload = self.fetcher.fetch(&self.base_url, &params).await?;

        let Some(first) = payload
            .get("results")
            .and_then(|results| results.as_array())
            .and_then(|results| results.first())
        else {
            warn!("No results found for location '{}'", location);
            return Err(WeatherError::unresolvable(location));
        };

        let result: GeocodeResult = serde_json::from_value(first.clone())?;
        debug!(
            "Found location: {} ({:.4}, {:.4})",
            result.name, result.latitude, result.longitude
        );

        self.cache.set(&cache_key, result.clone(), self.ttl);
        Ok(result)
    }

    /// Number of cached geocoding entries
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}
