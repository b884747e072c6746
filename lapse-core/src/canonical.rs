//! Canonical (shortest) form of a duration
//!
//! Seconds and minutes always carry upward. What happens above the hour
//! depends on the `DayMode`:
//! - `Hours` folds years, months and days into the hours field
//! - `Calendar` carries hours into days, then days into years and months
//!
//! Calendar carry order is fixed: hours→days (24), days→years (365),
//! days→months (30), months→years (12). Changing it changes results.

use crate::units::{self, narrow};
use crate::{DurationError, DurationValue};
use serde::{Deserialize, Serialize};

/// How day-sized quantities are represented after shortening
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayMode {
    /// Days, months and years become hours (H:M:S only)
    #[default]
    Hours,
    /// Days kept separate, carried into months and years
    Calendar,
}

impl From<bool> for DayMode {
    /// `true` keeps days as a separate calendar unit
    fn from(include_days: bool) -> Self {
        if include_days {
            DayMode::Calendar
        } else {
            DayMode::Hours
        }
    }
}

/// Shorten a duration into its canonical record
///
/// The result has no `total_days` and keeps the input's `inverted` flag.
pub fn shorten(d: &DurationValue, mode: DayMode) -> Result<DurationValue, DurationError> {
    let mut years = d.years as u128;
    let mut months = d.months as u128;
    let mut days = d.days as u128;
    let mut hours = d.hours as u128;
    let mut minutes = d.minutes as u128;
    let mut seconds = d.seconds as u128;

    let per_minute = units::SECONDS_PER_MINUTE as u128;
    let per_hour = units::MINUTES_PER_HOUR as u128;
    let per_day = units::HOURS_PER_DAY as u128;

    minutes += seconds / per_minute;
    seconds %= per_minute;

    hours += minutes / per_hour;
    minutes %= per_hour;

    match mode {
        DayMode::Calendar => {
            let per_year = units::DAYS_PER_YEAR as u128;
            let per_month = units::DAYS_PER_MONTH as u128;
            let months_per_year = units::MONTHS_PER_YEAR as u128;

            days += hours / per_day;
            hours %= per_day;

            years += days / per_year;
            days %= per_year;

            months += days / per_month;
            days %= per_month;

            years += months / months_per_year;
            months %= months_per_year;
        }
        DayMode::Hours => {
            let folded_days = match d.total_days {
                Some(total) if total > 0 => total as u128,
                _ => units::calendar_days(d),
            };
            hours += folded_days * per_day;
            years = 0;
            months = 0;
            days = 0;
        }
    }

    Ok(DurationValue {
        years: narrow(years)?,
        months: narrow(months)?,
        days: narrow(days)?,
        hours: narrow(hours)?,
        minutes: narrow(minutes)?,
        seconds: narrow(seconds)?,
        total_days: None,
        inverted: d.inverted,
    })
}

/// Shorten and render as `P[nY][nM][nD][T[nH][nM][nS]]` (`PT0M` when zero)
///
/// The rendering carries no sign; use `Display` on the shortened value for
/// a signed string.
pub fn format(d: &DurationValue, mode: DayMode) -> Result<String, DurationError> {
    Ok(shorten(d, mode)?.iso_string())
}
