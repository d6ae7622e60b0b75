use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, TransportError};

/// One forecast sample as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub description: String,
}

/// Forecast samples for one location, in provider order (ascending time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub location_name: String,
    pub country_code: String,
    pub entries: Vec<ForecastEntry>,
}

impl ForecastSeries {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What the caller asks the provider for.
#[derive(Debug, Clone)]
pub struct ForecastQuery {
    pub location_name: String,
    pub country_code: String,
    pub units: UnitSystem,
}

impl ForecastQuery {
    pub fn new(location_name: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            location_name: location_name.into(),
            country_code: country_code.into(),
            units: UnitSystem::default(),
        }
    }

    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    /// The provider's `q` parameter: `"<name>,<countryCode>"`.
    pub fn location_query(&self) -> String {
        format!("{},{}", self.location_name, self.country_code)
    }
}

/// Result of a fetch that got past the configuration check.
#[derive(Debug)]
pub enum FetchOutcome {
    Available(ForecastSeries),
    Unavailable(TransportError),
}

impl FetchOutcome {
    pub fn into_series(self) -> Option<ForecastSeries> {
        match self {
            FetchOutcome::Available(series) => Some(series),
            FetchOutcome::Unavailable(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
            UnitSystem::Standard => "standard",
        }
    }

    /// Suffix printed after a temperature value.
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
            UnitSystem::Standard => "K",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial, UnitSystem::Standard]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = ForecastError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            "standard" => Ok(UnitSystem::Standard),
            _ => Err(ForecastError::UnknownUnits(value.to_string())),
        }
    }
}
