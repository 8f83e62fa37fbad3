//! Display strings for a [`WeatherRecord`].
//!
//! Each attribute falls back to [`PLACEHOLDER`] on its own, so a response
//! missing one field still renders everything else.

use std::fmt::Display;

use crate::WeatherRecord;

pub const PLACEHOLDER: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSummary {
    pub location: String,
    pub country: String,
    pub temperature: String,
    pub condition: String,
    pub icon_url: String,
    pub humidity: String,
    pub wind_speed: String,
    pub uv: String,
    pub precipitation: String,
    pub local_time: String,
    pub local_date: String,
}

impl WeatherSummary {
    /// Label/value pairs in the order the details card shows them.
    pub fn details(&self) -> [(&'static str, &str); 6] {
        [
            ("Humidity", self.humidity.as_str()),
            ("Wind Speed", self.wind_speed.as_str()),
            ("UV", self.uv.as_str()),
            ("Precipitation", self.precipitation.as_str()),
            ("Local Time", self.local_time.as_str()),
            ("Local Date", self.local_date.as_str()),
        ]
    }
}

impl From<&WeatherRecord> for WeatherSummary {
    fn from(record: &WeatherRecord) -> Self {
        Self {
            location: text(record.location_name.as_deref()),
            country: text(record.country.as_deref()),
            temperature: with_unit(record.temperature_c, "°C"),
            condition: text(record.condition_text.as_deref()),
            icon_url: text(record.icon_url().as_deref()),
            humidity: with_unit(record.humidity_pct, ""),
            wind_speed: with_unit(record.wind_kph, "km/h"),
            uv: with_unit(record.uv, ""),
            precipitation: with_unit(record.precip_mm, "mm"),
            local_time: text(record.local_time()),
            local_date: text(record.local_date()),
        }
    }
}

fn text(value: Option<&str>) -> String {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(PLACEHOLDER).to_string()
}

fn with_unit<T: Display>(value: Option<T>, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => v.to_string(),
        Some(v) => format!("{v} {unit}"),
        None => PLACEHOLDER.to_string(),
    }
}
