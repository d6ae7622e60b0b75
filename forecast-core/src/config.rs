use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{error::ForecastError, model::UnitSystem};

/// Environment variable holding the OpenWeather credential.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Optional override for the forecast endpoint.
pub const BASE_URL_ENV: &str = "OPENWEATHER_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Settings built once at startup and handed to the fetcher.
///
/// The API key only ever comes from the environment; it is skipped when the
/// settings are written to disk.
///
/// Example TOML:
/// ```toml
/// base_url = "https://api.openweathermap.org/data/2.5/forecast"
/// units = "metric"
/// # optional; leave out (or 0) to keep the HTTP client's default
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub units: UnitSystem,

    /// Overall request timeout. `None` keeps the HTTP client's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            units: UnitSystem::default(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Settings file (if any) layered under the process environment.
    pub fn load() -> Result<Self> {
        let cfg = Self::load_file()?;
        Ok(cfg.with_env(|key| std::env::var(key).ok()))
    }

    /// Load the settings file, or return defaults if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save the file-backed settings, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key = lookup(API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if let Some(url) = lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }

        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Timeout to put on the HTTP client, if one was configured. Zero counts
    /// as unset.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs)
    }

    /// The credential, or the configuration error that must stop the run.
    pub fn require_api_key(&self) -> Result<&str, ForecastError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ForecastError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_openweather_metric() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.units, UnitSystem::Metric);
        assert_eq!(cfg.timeout_secs, None);
        assert_eq!(cfg.request_timeout(), None);
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn require_api_key_errors_when_missing() {
        let cfg = Config::default().with_env(env(&[]));
        assert!(matches!(cfg.require_api_key(), Err(ForecastError::MissingApiKey)));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = Config::default().with_env(env(&[(API_KEY_ENV, "   ")]));
        assert!(cfg.api_key.is_none());
        assert!(cfg.require_api_key().is_err());
    }

    #[test]
    fn env_overrides_key_and_base_url() {
        let cfg = Config::default()
            .with_env(env(&[(API_KEY_ENV, "KEY"), (BASE_URL_ENV, "http://localhost:9/f")]));

        assert_eq!(cfg.require_api_key().unwrap(), "KEY");
        assert_eq!(cfg.base_url, "http://localhost:9/f");
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let cfg = Config::from_toml("units = \"imperial\"\n").unwrap();
        assert_eq!(cfg.units, UnitSystem::Imperial);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout_secs, None);
    }

    #[test]
    fn timeout_is_only_set_when_configured() {
        let cfg = Config::from_toml("timeout_secs = 5\n").unwrap();
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(5)));

        let cfg = Config::from_toml("timeout_secs = 0\n").unwrap();
        assert_eq!(cfg.timeout_secs, Some(0));
        assert_eq!(cfg.request_timeout(), None);
    }

    #[test]
    fn unset_timeout_is_left_out_of_the_file() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!toml.contains("timeout_secs"));
    }

    #[test]
    fn api_key_is_never_serialized() {
        let cfg = Config::default().with_api_key("SECRET");
        let toml = toml::to_string_pretty(&cfg).unwrap();
        assert!(!toml.contains("SECRET"));
        assert!(toml.contains("units = \"metric\""));
    }
}
