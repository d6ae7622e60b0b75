use crate::{
    Config, FetchOutcome, ForecastError, ForecastQuery, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of raw forecast series.
///
/// Implementations must return `Err(ForecastError::MissingApiKey)` before any
/// network activity when no credential is configured, and must report every
/// transport failure as `Ok(FetchOutcome::Unavailable(..))`.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &ForecastQuery) -> Result<FetchOutcome, ForecastError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn ForecastProvider>, ForecastError> {
    Ok(Box::new(OpenWeatherProvider::new(config.clone())?))
}
