//! Grouping and filtering of a forecast series.
//!
//! Selection runs in two orthogonal steps: grouping by [`Granularity`]
//! (identity for hourly, first-seen-per-date reduction for daily) followed by
//! one shared [`Scope`] filter.

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, TimeZone};

use crate::{
    error::ForecastError,
    model::{ForecastEntry, ForecastSeries},
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Daily,
    Hourly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Hourly => "hourly",
        }
    }

    pub const fn all() -> &'static [Granularity] {
        &[Granularity::Daily, Granularity::Hourly]
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ForecastError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "daily" => Ok(Granularity::Daily),
            "hourly" => Ok(Granularity::Hourly),
            _ => Err(ForecastError::UnknownGranularity(value.to_string())),
        }
    }
}

/// The scope keyword as typed by the user, before any date is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Today,
    All,
    Specific,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Today => "today",
            ScopeKind::All => "all",
            ScopeKind::Specific => "specific",
        }
    }

    pub const fn all() -> &'static [ScopeKind] {
        &[ScopeKind::Today, ScopeKind::All, ScopeKind::Specific]
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeKind {
    type Err = ForecastError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "today" => Ok(ScopeKind::Today),
            "all" => Ok(ScopeKind::All),
            "specific" => Ok(ScopeKind::Specific),
            _ => Err(ForecastError::UnknownScope(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    All,
    Today,
    Specific(NaiveDate),
}

/// A scope after input resolution, with the warning to show if the user's
/// date had to be discarded.
#[derive(Debug)]
pub struct ResolvedScope {
    pub scope: Scope,
    pub warning: Option<ForecastError>,
}

impl Scope {
    /// Turn the user's scope keyword and optional date into a [`Scope`].
    ///
    /// An unparsable or missing date for `specific` never fails: the scope
    /// falls back to [`Scope::All`] and the parse error is returned as a warning.
    pub fn resolve(kind: ScopeKind, raw_date: Option<&str>) -> ResolvedScope {
        match kind {
            ScopeKind::All => ResolvedScope { scope: Scope::All, warning: None },
            ScopeKind::Today => ResolvedScope { scope: Scope::Today, warning: None },
            ScopeKind::Specific => match parse_date(raw_date.unwrap_or_default()) {
                Ok(date) => ResolvedScope { scope: Scope::Specific(date), warning: None },
                Err(err) => ResolvedScope { scope: Scope::All, warning: Some(err) },
            },
        }
    }

    /// The date a non-`all` scope is pinned to, given the evaluation date.
    pub fn target_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Scope::All => None,
            Scope::Today => Some(today),
            Scope::Specific(date) => Some(*date),
        }
    }

    fn includes(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.target_date(today).is_none_or(|target| target == date)
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ForecastError::InvalidDate { input: raw.to_string() })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionMode {
    pub granularity: Granularity,
    pub scope: Scope,
}

impl SelectionMode {
    pub fn new(granularity: Granularity, scope: Scope) -> Self {
        Self { granularity, scope }
    }
}

/// A forecast entry picked for display, tagged with its calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot<'a> {
    pub date: NaiveDate,
    pub entry: &'a ForecastEntry,
}

/// The single entry standing in for a whole calendar date.
pub type DailyBucket<'a> = Slot<'a>;

/// Reduce entries to one bucket per calendar date in `tz`. First seen wins;
/// later entries for a date already bucketed are dropped, not aggregated.
pub fn bucket_by_day<'a, Tz: TimeZone>(
    entries: &'a [ForecastEntry],
    tz: &Tz,
) -> Vec<DailyBucket<'a>> {
    let mut buckets: Vec<DailyBucket<'a>> = Vec::new();

    for entry in entries {
        let date = local_date(entry, tz);
        if !buckets.iter().any(|b| b.date == date) {
            buckets.push(Slot { date, entry });
        }
    }

    buckets
}

/// Group `series` by the mode's granularity, then keep what the scope admits.
///
/// Output follows series order. `today` is the evaluation date for
/// [`Scope::Today`].
pub fn select<'a, Tz: TimeZone>(
    series: &'a ForecastSeries,
    mode: &SelectionMode,
    tz: &Tz,
    today: NaiveDate,
) -> Vec<Slot<'a>> {
    let grouped = match mode.granularity {
        Granularity::Hourly => series
            .entries
            .iter()
            .map(|entry| Slot { date: local_date(entry, tz), entry })
            .collect(),
        Granularity::Daily => bucket_by_day(&series.entries, tz),
    };

    grouped.into_iter().filter(|slot| mode.scope.includes(slot.date, today)).collect()
}

pub(crate) fn local_date<Tz: TimeZone>(entry: &ForecastEntry, tz: &Tz) -> NaiveDate {
    entry.timestamp.with_timezone(tz).date_naive()
}
