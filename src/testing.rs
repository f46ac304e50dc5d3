//! Test doubles shared by the unit tests

use crate::http::HttpFetcher;
use crate::{Result, WeatherError};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub params: Vec<(String, String)>,
}

/// Replays queued responses in order and records every call it receives.
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<Result<Value>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl HttpFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        self.calls.lock().push(RecordedCall {
            url: url.to_string(),
            params: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        });

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(WeatherError::transport("no scripted response left")))
    }
}

/// Answers every request to a URL with the same payload, counting calls.
#[derive(Default)]
pub struct RoutedFetcher {
    routes: Vec<(String, Value)>,
    calls: Mutex<usize>,
}

impl RoutedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, url: &str, payload: Value) -> Self {
        self.routes.push((url.to_string(), payload));
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl HttpFetcher for RoutedFetcher {
    async fn fetch(&self, url: &str, _params: &[(&str, String)]) -> Result<Value> {
        *self.calls.lock() += 1;
        tokio::task::yield_now().await;

        self.routes
            .iter()
            .find(|(route, _)| route == url)
            .map(|(_, payload)| payload.clone())
            .ok_or_else(|| WeatherError::upstream_status(404, url))
    }
}
