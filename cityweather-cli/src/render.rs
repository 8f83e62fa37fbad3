use std::fmt::Write;

use cityweather_core::{FetchState, WeatherRecord, WeatherSummary};

pub fn print_state(state: &FetchState) {
    if let Some(text) = format_state(state) {
        println!("{text}");
    }
}

/// What the screen shows for `state`; nothing while idle.
pub fn format_state(state: &FetchState) -> Option<String> {
    match state {
        FetchState::Idle => None,
        FetchState::Loading => Some("Loading...".to_string()),
        FetchState::Error(message) => Some(message.clone()),
        FetchState::Success(record) => Some(format_record(record)),
    }
}

pub fn format_record(record: &WeatherRecord) -> String {
    let summary = WeatherSummary::from(record);
    let mut out = String::new();

    let _ = writeln!(out, "{}  {}", summary.location, summary.country);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", summary.temperature);
    let _ = writeln!(out, "  {}", summary.condition);
    let _ = writeln!(out, "  {}", summary.icon_url);
    let _ = writeln!(out);

    let details = summary.details();
    let width = details.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in details {
        let value = match label {
            "Humidity" if value != cityweather_core::summary::PLACEHOLDER => format!("{value}%"),
            _ => value.to_string(),
        };
        let _ = writeln!(out, "  {label:<width$}  {value}");
    }

    out.trim_end().to_string()
}
