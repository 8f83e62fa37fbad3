use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{FetchError, WeatherQuery, WeatherRecord};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

#[derive(Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at a different host, e.g. a proxy or a local stub.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherRecord, FetchError> {
        let url = format!("{}/current.json", self.base_url);
        debug!(%url, query = %query, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query.as_str()), ("aqi", "no")])
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the API key.
                let e = e.without_url();
                warn!(error = %e, "weather request failed before a response arrived");
                FetchError::Network(e)
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| FetchError::Network(e.without_url()))?;
        debug!(%status, body = %truncate_body(&body), "weather response received");

        if !status.is_success() {
            let message = provider_error_message(&body);
            warn!(%status, message = ?message, "weather provider rejected the request");
            return Err(FetchError::Provider { status: status.as_u16(), message });
        }

        parse_current(&body)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherRecord, FetchError> {
        self.fetch_current(query).await
    }
}

#[derive(Debug, Default, Deserialize)]
struct WaLocation {
    name: Option<String>,
    country: Option<String>,
    localtime: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WaCondition {
    text: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WaCurrent {
    temp_c: Option<f64>,
    condition: Option<WaCondition>,
    humidity: Option<u8>,
    wind_kph: Option<f64>,
    uv: Option<f64>,
    precip_mm: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: Option<WaLocation>,
    current: Option<WaCurrent>,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: Option<WaErrorDetail>,
}

fn parse_current(body: &str) -> Result<WeatherRecord, FetchError> {
    let parsed: WaResponse = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "failed to parse current weather JSON");
        FetchError::Decode(e)
    })?;

    let location = parsed.location.unwrap_or_default();
    let current = parsed.current.unwrap_or_default();
    let condition = current.condition.unwrap_or_default();

    Ok(WeatherRecord {
        location_name: location.name,
        country: location.country,
        localtime: location.localtime,
        temperature_c: current.temp_c,
        condition_text: condition.text,
        condition_icon: condition.icon,
        humidity_pct: current.humidity,
        wind_kph: current.wind_kph,
        uv: current.uv,
        precip_mm: current.precip_mm,
    })
}

/// `error.message` from a provider error body, if the body has one.
fn provider_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<WaErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "location": {
            "name": "Paris",
            "region": "Ile-de-France",
            "country": "France",
            "localtime": "2024-05-01 14:05"
        },
        "current": {
            "temp_c": 17.3,
            "condition": {
                "text": "Partly cloudy",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                "code": 1003
            },
            "humidity": 63,
            "wind_kph": 13.7,
            "uv": 4.0,
            "precip_mm": 0.1
        }
    }"#;

    #[test]
    fn parses_full_payload() {
        let record = parse_current(FULL).expect("full payload should parse");

        assert_eq!(record.location_name.as_deref(), Some("Paris"));
        assert_eq!(record.country.as_deref(), Some("France"));
        assert_eq!(record.temperature_c, Some(17.3));
        assert_eq!(record.condition_text.as_deref(), Some("Partly cloudy"));
        assert_eq!(record.humidity_pct, Some(63));
        assert_eq!(record.wind_kph, Some(13.7));
        assert_eq!(record.uv, Some(4.0));
        assert_eq!(record.precip_mm, Some(0.1));
        assert_eq!(record.local_date(), Some("2024-05-01"));
        assert_eq!(record.local_time(), Some("14:05"));
    }

    #[test]
    fn missing_humidity_is_not_an_error() {
        let body = r#"{"location":{"name":"Oslo"},"current":{"temp_c":3.5}}"#;
        let record = parse_current(body).expect("partial payload should parse");

        assert_eq!(record.humidity_pct, None);
        assert_eq!(record.temperature_c, Some(3.5));
        assert_eq!(record.condition_text, None);
    }

    #[test]
    fn missing_sections_yield_empty_record() {
        let record = parse_current("{}").expect("empty object should parse");
        assert_eq!(record, WeatherRecord::default());
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = parse_current("<html>oops</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn extracts_provider_error_message() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        assert_eq!(provider_error_message(body).as_deref(), Some("No matching location found."));
        assert_eq!(provider_error_message("Bad Gateway"), None);
        assert_eq!(provider_error_message(r#"{"error":{}}"#), None);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let provider = WeatherApiProvider::with_base_url("KEY".into(), "http://localhost:8080/v1/");
        assert_eq!(provider.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let provider = WeatherApiProvider::new("SECRET".into());
        let debug = format!("{provider:?}");
        assert!(!debug.contains("SECRET"));
        assert!(debug.contains(DEFAULT_BASE_URL));
    }

    #[test]
    fn truncates_long_bodies() {
        let long = "é".repeat(300);
        let short = truncate_body(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 203);
    }
}
