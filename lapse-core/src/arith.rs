//! Interval arithmetic: summation and division
//!
//! Summation works in a flattened seconds base and re-expands the total into
//! hours, minutes and seconds. Division works unit by unit, largest first,
//! pushing each remainder into the next smaller unit before it is divided.

use crate::canonical::{self, DayMode};
use crate::units::{self, narrow};
use crate::{DurationError, DurationValue};

/// Months credited per leftover year when dividing.
/// Uses the day count of a year, not 12.
const YEAR_REMAINDER_MONTHS: u64 = units::DAYS_PER_YEAR;

/// Sum a base duration with one or more additions
///
/// Inverted values subtract. The result is expressed in hours, minutes and
/// seconds only and is inverted when the net total is negative.
pub fn sum(base: &DurationValue, additions: &[DurationValue]) -> Result<DurationValue, DurationError> {
    if additions.is_empty() {
        return Err(DurationError::InvalidArgument(
            "sum requires at least one duration to add".to_string(),
        ));
    }

    let total = additions
        .iter()
        .try_fold(units::to_signed_seconds(base), |acc, d| {
            acc.checked_add(units::to_signed_seconds(d))
        })
        .ok_or(DurationError::Overflow)?;

    // Split in the wide type; only the hours can exceed a field
    let magnitude = total.unsigned_abs();
    let per_hour = units::SECONDS_PER_HOUR as u128;
    let per_minute = units::SECONDS_PER_MINUTE as u128;

    let result = DurationValue::new(
        0,
        0,
        0,
        narrow(magnitude / per_hour)?,
        narrow(magnitude % per_hour / per_minute)?,
        narrow(magnitude % per_minute)?,
    );
    Ok(result.with_inverted(total < 0))
}

/// Divide a duration by a non-zero integer
///
/// Each unit is divided in turn from years down to seconds; a unit's
/// remainder is converted into the next smaller unit before that unit is
/// divided. The result is shortened into hours, minutes and seconds and
/// keeps the input's sign.
pub fn divide(d: &DurationValue, divisor: u64) -> Result<DurationValue, DurationError> {
    if divisor == 0 {
        return Err(DurationError::InvalidArgument("division by zero".to_string()));
    }

    let k = divisor as u128;
    let mut years = d.years as u128;
    let mut months = d.months as u128;
    let mut days = d.days as u128;
    let mut hours = d.hours as u128;
    let mut minutes = d.minutes as u128;
    let mut seconds = d.seconds as u128;

    months += divide_unit(&mut years, k, YEAR_REMAINDER_MONTHS);
    days += divide_unit(&mut months, k, units::DAYS_PER_MONTH);
    hours += divide_unit(&mut days, k, units::HOURS_PER_DAY);
    minutes += divide_unit(&mut hours, k, units::MINUTES_PER_HOUR);
    seconds += divide_unit(&mut minutes, k, units::SECONDS_PER_MINUTE);

    let per_hour = units::MINUTES_PER_HOUR as u128;
    if minutes >= per_hour {
        hours += minutes / per_hour;
        minutes %= per_hour;
    }

    seconds /= k;

    let per_minute = units::SECONDS_PER_MINUTE as u128;
    if seconds >= per_minute {
        minutes += seconds / per_minute;
        seconds %= per_minute;
    }

    let divided = DurationValue {
        years: narrow(years)?,
        months: narrow(months)?,
        days: narrow(days)?,
        hours: narrow(hours)?,
        minutes: narrow(minutes)?,
        seconds: narrow(seconds)?,
        total_days: None,
        inverted: d.inverted,
    };

    canonical::shorten(&divided, DayMode::Hours)
}

/// Divide `unit` in place and return its remainder scaled by `factor`
fn divide_unit(unit: &mut u128, divisor: u128, factor: u64) -> u128 {
    let rest = *unit % divisor;
    *unit /= divisor;
    rest * factor as u128
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dur(s: &str) -> DurationValue {
        DurationValue::parse(s).unwrap()
    }

    // ========== sum ==========

    #[test]
    fn test_sum_forward() {
        let result = sum(&dur("PT0H"), &[dur("PT1S"), dur("PT1M")]).unwrap();
        assert_eq!(result, dur("PT1M1S"));
        assert!(!result.inverted);
    }

    #[test]
    fn test_sum_with_inverted_addition() {
        let result = sum(&dur("PT1S"), &[dur("-PT1S"), dur("PT1M"), dur("PT1H")]).unwrap();
        assert_eq!(result, dur("PT1H1M"));
        assert_eq!(result.seconds, 0);
    }

    #[test]
    fn test_sum_cancels_to_zero() {
        let result = sum(&dur("PT1H1M1S"), &[dur("-PT1S"), dur("-PT1M"), dur("-PT1H")]).unwrap();
        assert_eq!(result, dur("PT0S"));
        assert!(!result.inverted);
        assert_eq!(result.iso_string(), "PT0M");
    }

    #[test]
    fn test_sum_negative_total() {
        let result = sum(&dur("PT1M"), &[dur("-PT1H")]).unwrap();
        assert_eq!(result, dur("-PT59M"));
        assert_eq!(result.to_string(), "-PT59M");
    }

    #[test]
    fn test_sum_inverted_base() {
        let result = sum(&dur("-PT2H"), &[dur("PT30M")]).unwrap();
        assert_eq!(result, dur("-PT1H30M"));
    }

    #[test]
    fn test_sum_flattens_calendar_units() {
        // 1 year + 1 month + 1 day = 396 days
        let result = sum(&dur("P1Y"), &[dur("P1M"), dur("P1D")]).unwrap();
        assert_eq!(result, dur("PT9504H"));
    }

    #[test]
    fn test_sum_matches_total_seconds() {
        let base = dur("P2DT3H");
        let additions = [dur("PT4000S"), dur("P1M"), dur("PT59M59S")];
        let result = sum(&base, &additions).unwrap();

        let expected: u128 = units::to_total_seconds(&base)
            + additions.iter().map(units::to_total_seconds).sum::<u128>();
        assert_eq!(units::to_total_seconds(&result), expected);
        assert!(result.minutes < 60 && result.seconds < 60);
    }

    #[test]
    fn test_sum_ignores_total_days() {
        let diff = DurationValue::new(0, 0, 2, 12, 0, 0).with_total_days(2);
        let result = sum(&diff, &[dur("PT0S")]).unwrap();
        assert_eq!(result, dur("PT60H"));
    }

    #[test]
    fn test_sum_requires_additions() {
        let result = sum(&dur("PT1H"), &[]);
        assert!(matches!(result, Err(DurationError::InvalidArgument(_))));
    }

    #[test]
    fn test_sum_total_beyond_u64_seconds() {
        // More seconds than fit a field, but the hours still fit
        let big = DurationValue::new(0, 0, 0, 1 << 60, 0, 0);
        let result = sum(&big, &[DurationValue::zero()]).unwrap();
        assert_eq!(result.hours, 1 << 60);
        assert_eq!(result, canonical::shorten(&big, DayMode::Hours).unwrap());

        let result = sum(&big, &[dur("PT1H1M1S"), big.negate()]).unwrap();
        assert_eq!(result, dur("PT1H1M1S"));
    }

    #[test]
    fn test_sum_hours_overflow() {
        let max = DurationValue::new(0, 0, 0, u64::MAX, 0, 0);
        let result = sum(&max, &[dur("PT1H")]);
        assert_eq!(result, Err(DurationError::Overflow));
    }

    // ========== divide ==========

    #[test]
    fn test_divide_hour() {
        assert_eq!(divide(&dur("PT1H"), 2).unwrap(), dur("PT30M"));
    }

    #[test]
    fn test_divide_day() {
        assert_eq!(divide(&dur("P1D"), 2).unwrap(), dur("PT12H"));
        assert_eq!(divide(&dur("P1D"), 4).unwrap(), dur("PT6H"));
    }

    #[test]
    fn test_divide_by_one_normalizes() {
        assert_eq!(divide(&dur("PT75M"), 1).unwrap(), dur("PT1H15M"));
        assert_eq!(divide(&dur("PT75S"), 1).unwrap(), dur("PT1M15S"));
    }

    #[test]
    fn test_divide_by_one_folds_days() {
        assert_eq!(divide(&dur("P2D"), 1).unwrap(), dur("PT48H"));
    }

    #[test]
    fn test_divide_truncates_seconds() {
        // 75s / 2 = 37.5s
        assert_eq!(divide(&dur("PT75S"), 2).unwrap(), dur("PT37S"));
        // 1m / 7: 60s / 7 = 8.57s
        assert_eq!(divide(&dur("PT1M"), 7).unwrap(), dur("PT8S"));
    }

    #[test]
    fn test_divide_month_remainder_into_days() {
        // 1 month / 2 = 15 days
        assert_eq!(divide(&dur("P1M"), 2).unwrap(), dur("PT360H"));
    }

    #[test]
    fn test_divide_year_remainder_into_months() {
        // 1 year / 2: 365 months / 2 = 182 months, 1 month left = 30 days / 2 = 15 days
        let expected_hours = 182 * 30 * 24 + 15 * 24;
        assert_eq!(divide(&dur("P1Y"), 2).unwrap(), DurationValue::new(0, 0, 0, expected_hours, 0, 0));
    }

    #[test]
    fn test_divide_mixed_units() {
        // 3h 5m / 2 = 1h 32m 30s
        assert_eq!(divide(&dur("PT3H5M"), 2).unwrap(), dur("PT1H32M30S"));
    }

    #[test]
    fn test_divide_keeps_sign() {
        let result = divide(&dur("-PT1H"), 2).unwrap();
        assert_eq!(result, dur("-PT30M"));
    }

    #[test]
    fn test_divide_by_zero() {
        assert!(matches!(divide(&dur("PT0M"), 0), Err(DurationError::InvalidArgument(_))));
        assert!(matches!(divide(&dur("P1Y"), 0), Err(DurationError::InvalidArgument(_))));
    }

    #[test]
    fn test_divide_zero_duration() {
        assert_eq!(divide(&dur("PT0S"), 3).unwrap().iso_string(), "PT0M");
    }
}
