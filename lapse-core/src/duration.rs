//! Calendar-style duration record
//!
//! A `DurationValue` stores years, months, days, hours, minutes and seconds
//! exactly as constructed, without carrying between units. `PT75M` stays
//! seventy-five minutes until it is shortened (see `canonical`).
//!
//! Design principles:
//! - Plain record, every operation returns a fresh value
//! - Unsigned fields, the sign lives in `inverted`
//! - Never panics - construction from text returns Results

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for duration operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid duration format: {0}")]
    Parse(String),

    #[error("Overflow: duration too large")]
    Overflow,
}

/// Designators allowed in the date part, in the order they must appear
const DATE_DESIGNATORS: [char; 4] = ['Y', 'M', 'W', 'D'];

/// Designators allowed in the time part, in the order they must appear
const TIME_DESIGNATORS: [char; 3] = ['H', 'M', 'S'];

// ============================================================================
// DurationValue
// ============================================================================

/// A signed span of time in six calendar-like units
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationValue {
    pub years: u64,
    pub months: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// Whole days between two date points, independent of `days`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_days: Option<u64>,
    /// Backward (negative) offset
    #[serde(default)]
    pub inverted: bool,
}

impl DurationValue {
    // ========== Construction ==========

    /// Create from the six unit fields (forward, no day count)
    pub fn new(years: u64, months: u64, days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
            total_days: None,
            inverted: false,
        }
    }

    /// Create a raw all-seconds duration
    pub fn from_seconds(seconds: u64) -> Self {
        Self::new(0, 0, 0, 0, 0, seconds)
    }

    /// Zero duration
    pub fn zero() -> Self {
        Self::default()
    }

    /// Builder: attach a pre-computed whole-day count
    pub fn with_total_days(mut self, total_days: u64) -> Self {
        self.total_days = Some(total_days);
        self
    }

    /// Builder: set the sign flag
    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Same magnitude, opposite direction
    pub fn negate(&self) -> Self {
        Self {
            inverted: !self.inverted,
            ..self.clone()
        }
    }

    // ========== Accessors ==========

    /// True when all six unit fields are zero (`total_days` is ignored)
    pub fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
    }

    // ========== Rendering ==========

    /// Render the fields as stored, without sign: `P[nY][nM][nD][T[nH][nM][nS]]`
    ///
    /// Zero units are omitted, and so is the time part when all of its
    /// units are zero. A duration with every unit zero renders as `PT0M`.
    pub fn iso_string(&self) -> String {
        let mut out = String::from("P");

        for (value, designator) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if value != 0 {
                out.push_str(&format!("{}{}", value, designator));
            }
        }

        if self.hours != 0 || self.minutes != 0 || self.seconds != 0 {
            out.push('T');
        }

        for (value, designator) in [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')] {
            if value != 0 {
                out.push_str(&format!("{}{}", value, designator));
            }
        }

        if out.len() == 1 {
            return "PT0M".to_string();
        }
        out
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted && !self.is_zero() {
            write!(f, "-")?;
        }
        write!(f, "{}", self.iso_string())
    }
}

// ============================================================================
// Parsing
// ============================================================================

impl DurationValue {
    /// Parse an ISO 8601 duration
    ///
    /// Supported forms:
    /// - P1Y2M3D
    /// - PT4H5M6S
    /// - P1Y2M3DT4H5M6S
    /// - P2W (weeks become days)
    /// - -PT1S (inverted)
    pub fn parse(s: &str) -> Result<Self, DurationError> {
        let input = s.trim();

        let (inverted, rest) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };

        let body = rest
            .strip_prefix('P')
            .ok_or_else(|| DurationError::Parse(format!("'{}' must start with 'P'", input)))?;

        let (date_part, time_part) = match body.find('T') {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };

        let date = split_components(date_part, &DATE_DESIGNATORS, input)?;
        let time = match time_part {
            Some(part) => {
                let time = split_components(part, &TIME_DESIGNATORS, input)?;
                if time.is_empty() {
                    return Err(DurationError::Parse(format!(
                        "'{}' has a 'T' without time components",
                        input
                    )));
                }
                time
            }
            None => Vec::new(),
        };

        if date.is_empty() && time.is_empty() {
            return Err(DurationError::Parse(format!("'{}' has no components", input)));
        }

        let mut duration = Self::zero().with_inverted(inverted);

        for (value, designator) in date {
            match designator {
                'Y' => duration.years = value,
                'M' => duration.months = value,
                'W' => {
                    let week_days = value.checked_mul(7).ok_or(DurationError::Overflow)?;
                    duration.days = duration.days.checked_add(week_days).ok_or(DurationError::Overflow)?;
                }
                _ => duration.days = duration.days.checked_add(value).ok_or(DurationError::Overflow)?,
            }
        }

        for (value, designator) in time {
            match designator {
                'H' => duration.hours = value,
                'M' => duration.minutes = value,
                _ => duration.seconds = value,
            }
        }

        Ok(duration)
    }
}

impl FromStr for DurationValue {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split `12H30M` into `[(12, 'H'), (30, 'M')]`, enforcing designator order
fn split_components(
    part: &str,
    designators: &[char],
    input: &str,
) -> Result<Vec<(u64, char)>, DurationError> {
    let mut components = Vec::new();
    let mut start = 0;
    let mut next = 0;

    for (i, c) in part.char_indices() {
        if c.is_ascii_digit() {
            continue;
        }

        let number = &part[start..i];
        if number.is_empty() {
            return Err(DurationError::Parse(format!(
                "'{}': missing number before '{}'",
                input, c
            )));
        }

        let offset = designators[next..]
            .iter()
            .position(|d| *d == c)
            .ok_or_else(|| DurationError::Parse(format!("'{}': unexpected '{}'", input, c)))?;
        next += offset + 1;

        // Only ASCII digits reach here, so the parse can only fail on overflow
        let value: u64 = number.parse().map_err(|_| DurationError::Overflow)?;
        components.push((value, c));
        start = i + c.len_utf8();
    }

    if start != part.len() {
        return Err(DurationError::Parse(format!(
            "'{}': number '{}' has no unit designator",
            input,
            &part[start..]
        )));
    }

    Ok(components)
}
