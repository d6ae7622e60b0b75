//! Interactive prompts for values not supplied as flags.

use anyhow::Result;
use forecast_core::{Config, Granularity, ScopeKind, UnitSystem};
use inquire::{CustomType, Select, Text, required};

pub fn city() -> Result<String> {
    Ok(Text::new("Enter city name:").with_validator(required!("City name is required")).prompt()?)
}

pub fn country() -> Result<String> {
    Ok(Text::new("Enter country code (e.g., US, GB, DE):")
        .with_validator(required!("Country code is required"))
        .prompt()?)
}

pub fn granularity() -> Result<Granularity> {
    Ok(Select::new("Granularity:", Granularity::all().to_vec()).prompt()?)
}

pub fn scope_kind() -> Result<ScopeKind> {
    Ok(Select::new("Which dates?", ScopeKind::all().to_vec()).prompt()?)
}

/// Raw date text; an unparsable answer is handled by scope resolution.
pub fn date() -> Result<String> {
    Ok(Text::new("Enter date:").with_placeholder("YYYY-MM-DD").prompt()?)
}

/// Walk through the file-backed settings, starting from `current`.
pub fn settings(current: Config) -> Result<Config> {
    let units = UnitSystem::all();
    let cursor = units.iter().position(|u| *u == current.units).unwrap_or(0);
    let units = Select::new("Unit system:", units.to_vec()).with_starting_cursor(cursor).prompt()?;

    let base_url = Text::new("Forecast endpoint:")
        .with_default(&current.base_url)
        .with_validator(required!("Endpoint is required"))
        .prompt()?;

    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(current.timeout_secs.unwrap_or(0))
        .with_help_message("0 keeps the HTTP client's default")
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;
    let timeout_secs = (timeout_secs > 0).then_some(timeout_secs);

    Ok(Config { units, base_url: base_url.trim().to_string(), timeout_secs, ..current })
}
