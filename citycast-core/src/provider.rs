use crate::{Config, WeatherError, WeatherReading, provider::openweather::OpenWeatherClient};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current weather readings for a named city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch the current reading for `city`. One call, one request; no caching.
    async fn current_weather(&self, city: &str) -> Result<WeatherReading, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let client = match config.endpoint.as_deref() {
        Some(endpoint) => OpenWeatherClient::with_endpoint(api_key, endpoint),
        None => OpenWeatherClient::new(api_key),
    };

    Ok(Box::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        // Only meaningful when the override variable is absent from the test environment.
        if std::env::var(crate::config::API_KEY_ENV).is_ok() {
            return;
        }
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_key_configured() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
