use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    Config,
    error::{ForecastError, TransportError},
    model::{FetchOutcome, ForecastEntry, ForecastQuery, ForecastSeries},
};

use super::ForecastProvider;

/// Client for the OpenWeather 5-day / 3-hour forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    config: Config,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: Config) -> Result<Self, ForecastError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TransportError::Client)?;

        Ok(Self { config, http })
    }

    async fn fetch_series(
        &self,
        api_key: &str,
        query: &ForecastQuery,
    ) -> Result<ForecastSeries, TransportError> {
        let location = query.location_query();
        debug!(url = %self.config.base_url, q = %location, units = %query.units, "Fetching forecast");

        let res = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("q", location.as_str()),
                ("appid", api_key),
                ("units", query.units.as_str()),
            ])
            .send()
            .await
            .map_err(TransportError::Send)?;

        let status = res.status();
        let body = res.text().await.map_err(TransportError::Body)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwForecastResponse = serde_json::from_str(&body)?;
        debug!(entries = parsed.list.len(), "Forecast received");

        Ok(parsed.into())
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn fetch(&self, query: &ForecastQuery) -> Result<FetchOutcome, ForecastError> {
        let api_key = self.config.require_api_key()?;

        match self.fetch_series(api_key, query).await {
            Ok(series) => Ok(FetchOutcome::Available(series)),
            Err(err) => {
                warn!(error = %err, q = %query.location_query(), "Forecast unavailable");
                Ok(FetchOutcome::Unavailable(err))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

impl From<OwForecastResponse> for ForecastSeries {
    fn from(res: OwForecastResponse) -> Self {
        let entries = res
            .list
            .into_iter()
            .filter_map(|entry| {
                let Some(timestamp) = DateTime::from_timestamp(entry.dt, 0) else {
                    warn!(dt = entry.dt, "Skipping forecast entry with out-of-range timestamp");
                    return None;
                };

                let description = entry
                    .weather
                    .into_iter()
                    .next()
                    .map(|w| w.description)
                    .unwrap_or_else(|| "Unknown".to_string());

                Some(ForecastEntry { timestamp, temperature: entry.main.temp, description })
            })
            .collect();

        ForecastSeries { location_name: res.city.name, country_code: res.city.country, entries }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
