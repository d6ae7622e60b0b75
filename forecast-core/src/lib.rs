//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration built once from the settings file and environment
//! - The forecast fetcher abstraction and its OpenWeather implementation
//! - Grouping, filtering and text rendering of forecast series
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;
pub mod selection;

pub use config::Config;
pub use error::{ForecastError, TransportError};
pub use format::{NO_DATA_MESSAGE, RenderOptions, Rendering, present, render};
pub use model::{FetchOutcome, ForecastEntry, ForecastQuery, ForecastSeries, UnitSystem};
pub use provider::{ForecastProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use selection::{
    DailyBucket, Granularity, ResolvedScope, Scope, ScopeKind, SelectionMode, Slot, bucket_by_day,
    select,
};
