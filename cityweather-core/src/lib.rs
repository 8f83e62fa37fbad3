//! Core library for the `cityweather` front end.
//!
//! This crate defines:
//! - The weatherapi.com client behind the `WeatherProvider` trait
//! - The fetch-state controller a UI observes and submits queries to
//! - Shared domain models (queries, records, fetch state) and display summaries
//! - Configuration & credentials handling

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod summary;

pub use config::{Config, ProviderConfig};
pub use controller::WeatherController;
pub use error::FetchError;
pub use model::{FetchState, WeatherQuery, WeatherRecord};
pub use provider::{WeatherProvider, provider_from_config, weatherapi::WeatherApiProvider};
pub use summary::WeatherSummary;
