//! HTTP access to the upstream JSON endpoints
//!
//! [`HttpFetcher`] is the seam the resolver and conditions fetcher talk to,
//! so tests can swap the network for canned payloads.

use crate::config::WeatherConfig;
use crate::{Result, WeatherError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const USER_AGENT: &str = concat!("weather-summary/", env!("CARGO_PKG_VERSION"));
const MIN_RETRY_INTERVAL: Duration = Duration::from_millis(200);

/// Issues a GET against a JSON endpoint and returns the decoded body.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Fails with [`WeatherError::Transport`] when the upstream cannot be
    /// reached in time and [`WeatherError::UpstreamStatus`] on a non-success
    /// status. Error bodies are not inspected.
    async fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<Value>;
}

/// [`HttpFetcher`] backed by a shared reqwest client with a fixed timeout.
///
/// Makes a single attempt per call unless the configuration asks for
/// retries, in which case transient failures are retried with exponential
/// backoff by the middleware stack.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: ClientWithMiddleware,
    timeout: Duration,
}

impl ReqwestFetcher {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let timeout = config.timeout();

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherError::config(format!("Failed to create HTTP client: {e}")))?;

        let mut builder = ClientBuilder::new(client);
        if config.api_max_retries > 0 {
            let policy = ExponentialBackoff::builder()
                .retry_bounds(MIN_RETRY_INTERVAL.min(timeout), timeout)
                .build_with_max_retries(config.api_max_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
        }

        Ok(Self {
            client: builder.build(),
            timeout,
        })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    #[instrument(skip(self, params))]
    async fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = Url::parse_with_params(url, params.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|e| WeatherError::config(format!("Invalid upstream URL '{url}': {e}")))?;

        debug!("Upstream request URL: {}", url);
        let start_time = Instant::now();

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!("Upstream request to {} failed: {}", url, e);
            WeatherError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream {} returned status {}", url, status);
            return Err(WeatherError::upstream_status(status.as_u16(), url.as_str()));
        }

        let body: Value = response.json().await?;

        let elapsed = start_time.elapsed();
        info!(
            "Upstream {} answered in {:.3}s",
            url.path(),
            elapsed.as_secs_f64()
        );
        if elapsed > self.timeout / 2 {
            warn!("Slow upstream response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(body)
    }
}
