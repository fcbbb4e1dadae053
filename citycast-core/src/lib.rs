//! Core library for the `citycast` weather lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherProvider`] seam
//! - Unit conversion, display formatting and the in-memory search history
//!
//! It is used by `citycast-cli`, but any front end can drive it through
//! [`WeatherPresenter::fetch_and_format`] and [`WeatherPresenter::history`].

pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod presenter;
pub mod provider;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::WeatherError;
pub use model::{DisplayText, HistoryEntry, UnitSystem, WeatherReading};
pub use presenter::{SearchHistory, WeatherPresenter};
pub use provider::{WeatherProvider, openweather::OpenWeatherClient};
