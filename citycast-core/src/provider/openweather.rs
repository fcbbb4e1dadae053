use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{WeatherError, WeatherReading};

use super::WeatherProvider;

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Client for the OpenWeather current-weather endpoint.
///
/// Always requests metric units; conversion to other systems happens at
/// display time.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: String, endpoint: &str) -> Self {
        Self {
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Full request URL for `city`, with the city and key percent-encoded.
    pub fn request_url(&self, city: &str) -> String {
        format!(
            "{}?q={}&appid={}&units=metric",
            self.endpoint,
            urlencoding::encode(city),
            urlencoding::encode(&self.api_key),
        )
    }

    fn redacted_url(&self, city: &str) -> String {
        format!("{}?q={}&appid=***&units=metric", self.endpoint, urlencoding::encode(city))
    }

    async fn fetch(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::invalid_argument("city name must not be empty"));
        }

        debug!(url = %self.redacted_url(city), "requesting current weather");

        let res = self.http.get(self.request_url(city)).send().await?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = match res.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(error = %e, "failed to read error response body");
                    String::new()
                }
            };
            warn!(city, status = status.as_u16(), "OpenWeather request failed");
            return Err(WeatherError::Remote {
                status_code: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let body = res.text().await?;
        let reading = parse_reading(&body)?;

        info!(
            city,
            temperature_c = reading.temperature_celsius,
            condition = %reading.condition_description,
            "received current weather"
        );

        Ok(reading)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        self.fetch(city).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Parse a current-weather body into a reading.
pub fn parse_reading(body: &str) -> Result<WeatherReading, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::malformed(format!("failed to parse OpenWeather JSON: {e}")))?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::malformed("response contained no weather conditions"))?;

    Ok(WeatherReading {
        temperature_celsius: parsed.main.temp,
        humidity_percent: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        condition_description: condition.description,
        icon_code: condition.icon,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
