use std::io::{self, Write};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use forecast_core::{
    Config, FetchOutcome, ForecastQuery, Granularity, NO_DATA_MESSAGE, RenderOptions, Scope,
    ScopeKind, SelectionMode, UnitSystem, present, provider_from_config,
};
use tracing::{info, warn};

use crate::prompt;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecast lookup")]
pub struct Cli {
    /// Log debug diagnostics to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the forecast for a city. Missing values are asked for interactively.
    Show(ShowArgs),

    /// Edit the stored settings (units, endpoint, timeout).
    Configure,

    /// Print where the settings file lives.
    ConfigPath,
}

#[derive(Debug, Default, Args)]
pub struct ShowArgs {
    /// City name, e.g. "Paris".
    #[arg(long)]
    pub city: Option<String>,

    /// Country code, e.g. "FR" (ISO 3166-1 alpha-2).
    #[arg(long)]
    pub country: Option<String>,

    /// daily or hourly.
    #[arg(long)]
    pub granularity: Option<Granularity>,

    /// today, all or specific.
    #[arg(long)]
    pub scope: Option<ScopeKind>,

    /// Date for the `specific` scope, as YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<String>,

    /// metric, imperial or standard; defaults to the configured units.
    #[arg(long)]
    pub units: Option<UnitSystem>,

    /// Print at most this many forecast blocks.
    #[arg(long)]
    pub limit: Option<usize>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Show(ShowArgs::default())) {
            Command::Show(args) => show(args).await,
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let config = Config::load()?;

    let city = match args.city {
        Some(city) => city,
        None => prompt::city()?,
    };
    let country = match args.country {
        Some(country) => country,
        None => prompt::country()?,
    };
    let granularity = match args.granularity {
        Some(granularity) => granularity,
        None => prompt::granularity()?,
    };
    let kind = match args.scope {
        Some(kind) => kind,
        None => prompt::scope_kind()?,
    };

    let raw_date = match (kind, args.date) {
        (ScopeKind::Specific, Some(date)) => Some(date),
        (ScopeKind::Specific, None) => Some(prompt::date()?),
        _ => None,
    };

    let resolved = Scope::resolve(kind, raw_date.as_deref());
    if let Some(warning) = &resolved.warning {
        warn!(error = %warning, "Falling back to scope 'all'");
        println!("Warning: {warning}. Showing all dates instead.");
    }

    let mode = SelectionMode::new(granularity, resolved.scope);
    let units = args.units.unwrap_or(config.units);
    let query = ForecastQuery::new(city.trim(), country.trim()).with_units(units);

    let provider = provider_from_config(&config)?;
    let series = match provider.fetch(&query).await? {
        FetchOutcome::Available(series) => series,
        FetchOutcome::Unavailable(err) => {
            println!("Error fetching weather data: {err}");
            println!("{NO_DATA_MESSAGE}");
            return Ok(());
        }
    };
    info!(entries = series.entries.len(), location = %series.location_name, "Forecast fetched");

    let options = RenderOptions { units, limit: args.limit };
    let mut out = io::stdout().lock();
    present(&series, &mode, &options, &mut out).context("Failed to write forecast to stdout")?;
    out.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let current = Config::load_file()?;
    let updated = prompt::settings(current)?;
    let path = updated.save()?;

    println!("Settings saved to {}", path.display());
    println!(
        "The API key is read from the {} environment variable and is not stored.",
        forecast_core::config::API_KEY_ENV
    );
    Ok(())
}
