use std::{
    fmt,
    io::{self, Write},
};

use chrono::{Local, NaiveDate, TimeZone};
use tracing::info;

use crate::{
    model::{ForecastEntry, ForecastSeries, UnitSystem},
    selection::{DATE_FORMAT, Granularity, SelectionMode, Slot, select},
};

const HOURLY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR_WIDTH: usize = 30;

pub const NO_DATA_MESSAGE: &str = "No weather data available.";

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub units: UnitSystem,
    /// Print at most this many blocks.
    pub limit: Option<usize>,
}

/// Text ready to print for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    NoData,
    Forecast { heading: String, blocks: Vec<String> },
}

impl fmt::Display for Rendering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendering::NoData => writeln!(f, "{NO_DATA_MESSAGE}"),
            Rendering::Forecast { heading, blocks } => {
                writeln!(f, "\n{heading}\n")?;
                for block in blocks {
                    writeln!(f, "{block}")?;
                }
                Ok(())
            }
        }
    }
}

/// Render `series` for `mode`, deriving calendar dates in `tz`.
///
/// In daily mode a `today`/specific-date scope that matches nothing yields a
/// single "No forecast available for ..." line; hourly mode yields no blocks.
pub fn render<Tz: TimeZone>(
    series: &ForecastSeries,
    mode: &SelectionMode,
    options: &RenderOptions,
    tz: &Tz,
    today: NaiveDate,
) -> Rendering {
    if series.is_empty() {
        return Rendering::NoData;
    }

    let heading = format!("Weather Forecast for {}, {}:", series.location_name, series.country_code);
    let selected = select(series, mode, tz, today);
    info!(
        granularity = %mode.granularity,
        scope = ?mode.scope,
        selected = selected.len(),
        total = series.entries.len(),
        "Forecast selected"
    );

    if selected.is_empty() && mode.granularity == Granularity::Daily {
        if let Some(date) = mode.scope.target_date(today) {
            let message = format!("No forecast available for {}", date.format(DATE_FORMAT));
            return Rendering::Forecast { heading, blocks: vec![message] };
        }
    }

    let limit = options.limit.unwrap_or(usize::MAX);
    let blocks = selected
        .iter()
        .take(limit)
        .map(|slot| render_block(slot, mode.granularity, options.units, tz))
        .collect();

    Rendering::Forecast { heading, blocks }
}

/// Render in local time, with "today" taken from the clock at call time, and
/// write the result to `out`.
pub fn present<W: Write>(
    series: &ForecastSeries,
    mode: &SelectionMode,
    options: &RenderOptions,
    out: &mut W,
) -> io::Result<()> {
    let today = Local::now().date_naive();
    let rendering = render(series, mode, options, &Local, today);
    write!(out, "{rendering}")
}

fn render_block<Tz: TimeZone>(
    slot: &Slot<'_>,
    granularity: Granularity,
    units: UnitSystem,
    tz: &Tz,
) -> String {
    let header = match granularity {
        Granularity::Hourly => {
            slot.entry.timestamp.with_timezone(tz).naive_local().format(HOURLY_FORMAT).to_string()
        }
        Granularity::Daily => slot.date.format(DATE_FORMAT).to_string(),
    };

    format_block(&header, slot.entry, units)
}

fn format_block(header: &str, entry: &ForecastEntry, units: UnitSystem) -> String {
    format!(
        "Date: {header}\nTemperature: {}{}\nDescription: {}\n{}",
        whole_degrees(entry.temperature),
        units.temperature_suffix(),
        entry.description,
        "-".repeat(SEPARATOR_WIDTH),
    )
}

fn whole_degrees(temperature: f64) -> String {
    let rounded = temperature.round();
    // avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.0}")
}
