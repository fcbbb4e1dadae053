use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One parsed weather observation, always in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub wind_speed_mps: f64,
    pub condition_description: String,
    pub icon_code: String,
}

/// Display convention for temperatures and wind speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// °C and km/h.
    #[default]
    Metric,
    /// °F and mph.
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }

    /// Human label, e.g. for a unit picker.
    pub fn label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "Celsius/kph",
            UnitSystem::Imperial => "Fahrenheit/mph",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(UnitSystem::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Record of one successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub city: String,
    /// Local time formatted as `yyyy-MM-dd HH:mm:ss`.
    pub timestamp_local: String,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.city, self.timestamp_local)
    }
}

/// Display-ready strings for one reading under one unit system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayText {
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
    pub condition: String,
    pub icon_url: String,
}

impl fmt::Display for DisplayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Temperature: {}", self.temperature)?;
        writeln!(f, "Humidity: {}", self.humidity)?;
        writeln!(f, "Wind Speed: {}", self.wind_speed)?;
        write!(f, "Conditions: {}", self.condition)
    }
}
