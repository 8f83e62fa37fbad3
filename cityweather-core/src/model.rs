use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// A location query as typed by the user, trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery(String);

impl WeatherQuery {
    pub fn new(raw: &str) -> Result<Self, FetchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FetchError::EmptyQuery);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of the current weather for one location.
///
/// Every attribute is optional because the provider may omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location_name: Option<String>,
    pub country: Option<String>,
    /// Local date-time at the location, "YYYY-MM-DD HH:MM".
    pub localtime: Option<String>,
    pub temperature_c: Option<f64>,
    pub condition_text: Option<String>,
    /// Provider-relative icon URL, e.g. "//cdn.weatherapi.com/weather/64x64/day/113.png".
    pub condition_icon: Option<String>,
    pub humidity_pct: Option<u8>,
    pub wind_kph: Option<f64>,
    pub uv: Option<f64>,
    pub precip_mm: Option<f64>,
}

impl WeatherRecord {
    pub fn local_date(&self) -> Option<&str> {
        self.localtime
            .as_deref()
            .and_then(|lt| lt.split_once(' ').map(|(date, _)| date).or(Some(lt)))
            .filter(|d| !d.is_empty())
    }

    pub fn local_time(&self) -> Option<&str> {
        self.localtime
            .as_deref()
            .and_then(|lt| lt.split_once(' '))
            .map(|(_, time)| time.trim())
            .filter(|t| !t.is_empty())
    }

    /// Absolute URL of the larger (128x128) condition icon.
    pub fn icon_url(&self) -> Option<String> {
        self.condition_icon
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .map(|icon| format!("https:{icon}").replace("64x64", "128x128"))
    }
}

/// Lifecycle of the most recent request, as seen by the UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(WeatherRecord),
    Error(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// True once a request has resolved one way or the other.
    pub fn is_settled(&self) -> bool {
        matches!(self, FetchState::Success(_) | FetchState::Error(_))
    }
}
