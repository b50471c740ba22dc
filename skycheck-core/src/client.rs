use std::fmt::Debug;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    config::Config,
    error::FetchError,
    model::{WeatherQuery, WeatherReading},
};

/// Production endpoint; overridable for tests and self-hosted proxies.
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Seam between the presenter and the network.
///
/// The real implementation is [`WeatherApiClient`]; tests drive the presenter
/// with stub fetchers instead.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReading, FetchError>;
}

/// Client for the WeatherAPI.com `current.json` endpoint.
///
/// Explicitly constructed with its base URL and credential and handed to
/// whoever needs it; there is no process-global instance.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http: Client::new(),
        }
    }

    /// Construct a client from on-disk configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `skycheck configure` and enter your WeatherAPI.com key."
            )
        })?;

        Ok(match config.base_url.as_deref() {
            Some(base) => Self::with_base_url(api_key, base),
            None => Self::new(api_key),
        })
    }

    fn request_url(&self, query: &WeatherQuery) -> Result<Url, FetchError> {
        let raw = format!(
            "{}/current.json?key={}&q={}&aqi=no",
            self.base_url,
            self.api_key,
            query.as_query_value(),
        );

        Url::parse(&raw).map_err(|_| FetchError::InvalidRequest)
    }
}

#[async_trait]
impl WeatherFetcher for WeatherApiClient {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReading, FetchError> {
        let url = self.request_url(query)?;

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Unknown(format!(
                "request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        if body.is_empty() {
            return Err(FetchError::NoResponseBody);
        }

        let parsed: ApiResponse =
            serde_json::from_str(&body).map_err(|_| FetchError::DecodingFailed)?;

        Ok(parsed.into())
    }
}

// Wire schema of `current.json`. Kept private; callers only see WeatherReading.

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
    region: String,
    country: String,
    lat: f64,
    lon: f64,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    temp_f: f64,
    condition: ApiCondition,
    wind_kph: f64,
    wind_mph: f64,
    humidity: u8,
    feelslike_c: f64,
    feelslike_f: f64,
    uv: f64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

impl From<ApiResponse> for WeatherReading {
    fn from(r: ApiResponse) -> Self {
        WeatherReading {
            location: r.location.name,
            region: r.location.region,
            country: r.location.country,
            latitude: r.location.lat,
            longitude: r.location.lon,
            localtime: r.location.localtime,
            temp_c: r.current.temp_c,
            temp_f: r.current.temp_f,
            condition: r.current.condition.text,
            condition_icon: r.current.condition.icon,
            wind_kph: r.current.wind_kph,
            wind_mph: r.current.wind_mph,
            humidity: r.current.humidity,
            feelslike_c: r.current.feelslike_c,
            feelslike_f: r.current.feelslike_f,
            uv: r.current.uv,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &body[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::sample_reading;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "location": {
                "name": "Beijing",
                "region": "Beijing",
                "country": "China",
                "lat": 39.93,
                "lon": 116.4,
                "localtime": "2025-11-17 12:00"
            },
            "current": {
                "temp_c": 15.0,
                "temp_f": 59.0,
                "condition": {
                    "text": "Clear",
                    "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png"
                },
                "wind_kph": 10.0,
                "wind_mph": 6.2,
                "humidity": 45,
                "feelslike_c": 14.0,
                "feelslike_f": 57.2,
                "uv": 3.0
            }
        })
    }

    #[test]
    fn city_url_carries_key_query_and_aqi() {
        let client = WeatherApiClient::new("K");
        let url = client
            .request_url(&WeatherQuery::City("Beijing".to_string()))
            .expect("url must build");

        assert_eq!(url.path(), "/v1/current.json");
        assert_eq!(url.query(), Some("key=K&q=Beijing&aqi=no"));
    }

    #[test]
    fn city_url_keeps_percent_encoding() {
        let client = WeatherApiClient::new("K");
        let url = client
            .request_url(&WeatherQuery::City("New York".to_string()))
            .expect("url must build");

        assert_eq!(url.query(), Some("key=K&q=New%20York&aqi=no"));
    }

    #[test]
    fn coordinate_url_uses_literal_pair() {
        let client = WeatherApiClient::new("K");
        let url = client
            .request_url(&WeatherQuery::Coordinates { lat: 39.93, lon: 116.4 })
            .expect("url must build");

        assert_eq!(url.query(), Some("key=K&q=39.93,116.4&aqi=no"));
    }

    #[test]
    fn unparseable_base_url_is_invalid_request() {
        let client = WeatherApiClient::with_base_url("K", "not a url");
        let err = client
            .request_url(&WeatherQuery::City("Beijing".to_string()))
            .unwrap_err();

        assert_eq!(err, FetchError::InvalidRequest);
    }

    #[tokio::test]
    async fn successful_fetch_maps_every_field() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .and(query_param("key", "K"))
            .and(query_param("q", "Beijing"))
            .and(query_param("aqi", "no"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&server)
            .await;

        let client = WeatherApiClient::with_base_url("K", server.uri());
        let reading = client
            .fetch(&WeatherQuery::City("Beijing".to_string()))
            .await
            .expect("fetch must succeed");

        assert_eq!(reading, sample_reading());
    }

    #[tokio::test]
    async fn empty_body_is_no_response_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = WeatherApiClient::with_base_url("K", server.uri());
        let err = client
            .fetch(&WeatherQuery::City("Beijing".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::NoResponseBody);
    }

    #[tokio::test]
    async fn missing_required_field_is_decoding_failure() {
        let server = MockServer::start().await;

        let mut body = sample_body();
        body["current"]
            .as_object_mut()
            .expect("current is an object")
            .remove("temp_c");

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = WeatherApiClient::with_base_url("K", server.uri());
        let err = client
            .fetch(&WeatherQuery::City("Beijing".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::DecodingFailed);
    }

    #[tokio::test]
    async fn non_success_status_is_unknown_with_detail() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": 1003, "message": "Parameter q is missing." }
            })))
            .mount(&server)
            .await;

        let client = WeatherApiClient::with_base_url("K", server.uri());
        let err = client
            .fetch(&WeatherQuery::City(String::new()))
            .await
            .unwrap_err();

        match err {
            FetchError::Unknown(detail) => {
                assert!(detail.contains("400"), "detail should name the status: {detail}");
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn repeated_query_yields_equal_readings() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&server)
            .await;

        let client = WeatherApiClient::with_base_url("K", server.uri());
        let query = WeatherQuery::City("Beijing".to_string());

        let first = client.fetch(&query).await.expect("first fetch");
        let second = client.fetch(&query).await.expect("second fetch");

        assert_eq!(first, second);
    }

    #[test]
    fn from_config_errors_without_api_key() {
        let cfg = Config::default();
        let err = WeatherApiClient::from_config(&cfg).unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("Hint: run `skycheck configure`"));
    }

    #[test]
    fn from_config_honors_base_url_override() {
        let mut cfg = Config::default();
        cfg.set_api_key("K".to_string());
        cfg.base_url = Some("http://localhost:9000/".to_string());

        let client = WeatherApiClient::from_config(&cfg).expect("client must build");
        let url = client
            .request_url(&WeatherQuery::City("Beijing".to_string()))
            .expect("url must build");

        assert_eq!(url.as_str(), "http://localhost:9000/current.json?key=K&q=Beijing&aqi=no");
    }
}
