//! Turning readings into display text, and remembering what was searched.
//!
//! Formatting is pure. The only state lives in [`WeatherPresenter`], which
//! owns the provider and the session's [`SearchHistory`].

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::{
    Clock, DisplayText, HistoryEntry, UnitSystem, WeatherError, WeatherProvider, WeatherReading,
};

/// Shown where a multi-day forecast would go; the free API tier needs a separate call for it.
pub const FORECAST_PLACEHOLDER: &str =
    "Forecast data requires a separate API call in the free tier.";

const MPS_TO_KPH: f64 = 3.6;
const MPS_TO_MPH: f64 = 2.237;

/// Round to one decimal, halves away from zero. `{:.1}` alone rounds ties to even.
fn one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn format_temperature(celsius: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => format!("{:.1}°C", one_decimal(celsius)),
        UnitSystem::Imperial => format!("{:.1}°F", one_decimal(celsius * 9.0 / 5.0 + 32.0)),
    }
}

pub fn format_wind_speed(mps: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => format!("{:.1} kph", one_decimal(mps * MPS_TO_KPH)),
        UnitSystem::Imperial => format!("{:.1} mph", one_decimal(mps * MPS_TO_MPH)),
    }
}

/// Whole percent, halves rounded away from zero.
pub fn format_humidity(percent: f64) -> String {
    format!("{:.0}%", percent.round())
}

pub fn icon_url(icon_code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon_code}@2x.png")
}

pub fn format(reading: &WeatherReading, units: UnitSystem) -> DisplayText {
    DisplayText {
        temperature: format_temperature(reading.temperature_celsius, units),
        humidity: format_humidity(reading.humidity_percent),
        wind_speed: format_wind_speed(reading.wind_speed_mps, units),
        condition: reading.condition_description.clone(),
        icon_url: icon_url(&reading.icon_code),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    /// Day runs from 06:00 up to, not including, 18:00.
    pub fn from_hour(hour: u32) -> Self {
        if (6..18).contains(&hour) { TimeOfDay::Day } else { TimeOfDay::Night }
    }

    pub fn background_color(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "#87CEEB",
            TimeOfDay::Night => "#2c3e50",
        }
    }
}

pub fn background_for_hour(hour: u32) -> &'static str {
    TimeOfDay::from_hour(hour).background_color()
}

/// Past searches, newest first. Lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    entries: VecDeque<HistoryEntry>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the head, regardless of the entry's timestamp.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug)]
pub struct WeatherPresenter {
    provider: Box<dyn WeatherProvider>,
    history: SearchHistory,
}

impl WeatherPresenter {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider, history: SearchHistory::new() }
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// Stamp `city` with the clock's current time and put it at the head of the history.
    pub fn record_search(&mut self, city: &str, clock: &dyn Clock) -> HistoryEntry {
        let entry = HistoryEntry { city: city.to_string(), timestamp_local: clock.timestamp() };
        debug!(city, timestamp = %entry.timestamp_local, "recorded search");
        self.history.push(entry.clone());
        entry
    }

    /// Fetch, format, and on success record the search.
    ///
    /// A blank city fails with [`WeatherError::InvalidArgument`] before the
    /// provider is consulted. Failures leave the history untouched.
    pub async fn fetch_and_format(
        &mut self,
        city: &str,
        units: UnitSystem,
        clock: &dyn Clock,
    ) -> Result<DisplayText, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::invalid_argument("city name must not be empty"));
        }

        let reading = self.provider.current_weather(city).await.inspect_err(|e| {
            warn!(city, error = %e, "weather search failed");
        })?;

        let display = format(&reading, units);
        self.record_search(city, clock);
        Ok(display)
    }
}
