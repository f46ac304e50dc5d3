//! `weather-summary` - current weather for a free-text location
//!
//! Resolves a place name through the Open-Meteo geocoding API, fetches the
//! current conditions for its coordinates, and renders a flat, human-readable
//! summary. Both lookups are cached in memory with their own TTL.

pub mod cache;
pub mod condition;
pub mod conditions;
pub mod config;
pub mod error;
pub mod format;
pub mod geocode;
pub mod http;
pub mod service;
pub mod summary;
pub mod web;

#[cfg(test)]
mod testing;

// Re-export core types for public API
pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use conditions::{ConditionsFetcher, ConditionsResult, CurrentReadings};
pub use config::WeatherConfig;
pub use error::WeatherError;
pub use geocode::{GeocodeResolver, GeocodeResult};
pub use http::{HttpFetcher, ReqwestFetcher};
pub use service::{CacheSizes, LocationQuery, WeatherService};
pub use summary::{PROVENANCE, WeatherSummary};

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;
