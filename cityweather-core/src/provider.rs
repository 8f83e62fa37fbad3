use crate::{
    Config, FetchError, WeatherQuery, WeatherRecord, provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// A source of current weather. One call, one outbound request, no retries.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherRecord, FetchError>;
}

/// Construct the weatherapi.com provider from config.
///
/// The API key comes from `WEATHERAPI_KEY` when set, otherwise from the config file.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for weatherapi.com.\n\
                 Hint: run `cityweather configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = match config.base_url() {
        Some(base_url) => WeatherApiProvider::with_base_url(api_key, base_url),
        None => WeatherApiProvider::new(api_key),
    };

    Ok(Box::new(provider))
}
