//! End-to-end tests against mocked Open-Meteo endpoints

use serde_json::{Value, json};
use weather_summary::{WeatherConfig, WeatherError, WeatherService};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> WeatherConfig {
    WeatherConfig {
        geocode_base_url: format!("{}/v1/search", server.uri()),
        api_base_url: format!("{}/v1/forecast", server.uri()),
        api_timeout: 5.0,
        ..WeatherConfig::default()
    }
}

async fn mount_seattle(server: &MockServer, geocode_calls: u64, forecast_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("count", "1"))
        .and(query_param("language", "en"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "name": "Seattle",
                "admin1": "Washington",
                "country": "United States",
                "country_code": "US",
                "latitude": 47.6062,
                "longitude": -122.3321
            }]
        })))
        .expect(geocode_calls)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "47.6062"))
        .and(query_param("longitude", "-122.3321"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timezone": "America/Los_Angeles",
            "current": {
                "temperature_2m": 18.3,
                "relative_humidity_2m": 42,
                "weather_code": 3,
                "apparent_temperature": 16.8,
                "wind_speed_10m": 5.6,
                "wind_direction_10m": 172,
                "precipitation": 0.0
            }
        })))
        .expect(forecast_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_summary_against_mock_upstreams() {
    let server = MockServer::start().await;
    mount_seattle(&server, 1, 1).await;

    let service = WeatherService::new(&config_for(&server)).unwrap();
    let summary = service.get_current_weather_summary("Seattle").await.unwrap();

    assert_eq!(summary.location, "Seattle, Washington, US");
    assert_eq!(summary.temperature, "18.3°C");
    assert_eq!(summary.feels_like, "16.8°C");
    assert_eq!(summary.condition, "Overcast");
    assert_eq!(summary.humidity, "42%");
    assert_eq!(summary.wind_speed, "5.6 km/h");
    assert_eq!(summary.wind_direction, "172°");
    assert_eq!(summary.precipitation, "0.0 mm");
    assert_eq!(summary.timezone, "America/Los_Angeles");
    assert_eq!(summary.source, "open-meteo.com");
}

#[tokio::test]
async fn test_second_lookup_within_ttl_makes_no_upstream_calls() {
    let server = MockServer::start().await;
    mount_seattle(&server, 1, 1).await;

    let service = WeatherService::new(&config_for(&server)).unwrap();
    let first = service.get_current_weather_summary("Seattle").await.unwrap();
    let second = service.get_current_weather_summary("  seattle").await.unwrap();

    assert_eq!(first.location, second.location);
    assert_eq!(first.temperature, second.temperature);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_disabled_caches_refetch_every_time() {
    let server = MockServer::start().await;
    mount_seattle(&server, 2, 2).await;

    let config = WeatherConfig {
        geocode_cache_ttl: 0.0,
        current_cache_ttl: -1.0,
        ..config_for(&server)
    };
    let service = WeatherService::new(&config).unwrap();
    service.get_current_weather_summary("Seattle").await.unwrap();
    service.get_current_weather_summary("Seattle").await.unwrap();

    assert_eq!(service.cache_sizes().geocode, 0);
    assert_eq!(service.cache_sizes().conditions, 0);
}

#[tokio::test]
async fn test_unresolvable_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let service = WeatherService::new(&config_for(&server)).unwrap();
    let err = service
        .get_current_weather_summary("Atlantis")
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::UnresolvableLocation { .. }));

    let raw = service.get_current_weather_json("Atlantis").await;
    let data: Value = serde_json::from_str(&raw).unwrap();
    assert!(
        data["error"]
            .as_str()
            .unwrap()
            .contains("Unable to resolve location 'Atlantis'")
    );
}

#[tokio::test]
async fn test_upstream_status_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"reason": "slow down"})))
        .expect(1)
        .mount(&server)
        .await;

    let service = WeatherService::new(&config_for(&server)).unwrap();
    let err = service
        .get_current_weather_summary("Seattle")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WeatherError::UpstreamStatus { status: 429, .. }
    ));
    assert!(err.is_upstream());
}
