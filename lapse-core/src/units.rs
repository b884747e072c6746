//! Fixed-ratio unit conversion
//!
//! Not calendar-aware: a year is always 365 days and a month 30 days.
//! Callers needing exact calendar arithmetic must not rely on these ratios.

use crate::{DurationError, DurationValue};

// ============================================================================
// Constants
// ============================================================================

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const MINUTES_PER_HOUR: u64 = 60;
pub const HOURS_PER_DAY: u64 = 24;
pub const DAYS_PER_MONTH: u64 = 30;
pub const DAYS_PER_YEAR: u64 = 365;
pub const MONTHS_PER_YEAR: u64 = 12;

pub const SECONDS_PER_HOUR: u64 = MINUTES_PER_HOUR * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: u64 = HOURS_PER_DAY * SECONDS_PER_HOUR;

// ============================================================================
// Conversions
// ============================================================================

/// Flatten a duration into seconds, ignoring its sign
pub fn to_total_seconds(d: &DurationValue) -> u128 {
    calendar_days(d) * SECONDS_PER_DAY as u128
        + d.hours as u128 * SECONDS_PER_HOUR as u128
        + d.minutes as u128 * SECONDS_PER_MINUTE as u128
        + d.seconds as u128
}

/// Flatten a duration into seconds, negative when inverted
pub fn to_signed_seconds(d: &DurationValue) -> i128 {
    // At most ~2^92 for u64 fields, well inside i128
    let total = to_total_seconds(d) as i128;
    if d.inverted {
        -total
    } else {
        total
    }
}

/// Days represented by the year, month and day fields
pub fn calendar_days(d: &DurationValue) -> u128 {
    d.years as u128 * DAYS_PER_YEAR as u128
        + d.months as u128 * DAYS_PER_MONTH as u128
        + d.days as u128
}

/// Narrow a widened intermediate back into a duration field
pub(crate) fn narrow(value: u128) -> Result<u64, DurationError> {
    u64::try_from(value).map_err(|_| DurationError::Overflow)
}
