//! Argument extraction shared by the interval functions

use lapse_core::{DayMode, DurationValue, LapseError, Value};
use lapse_plugin::EvalContext;

/// Extract a duration, accepting ISO 8601 text as well
pub fn extract_duration(value: &Value, func: &str, arg: &str) -> Result<DurationValue, LapseError> {
    match value.to_duration() {
        Value::Duration(d) => Ok(d),
        Value::Error(e) if value.is_error() => Err(e),
        Value::Error(e) => Err(e.in_function(func).with_note(format!("argument '{}'", arg))),
        other => Err(LapseError::arg_type(func, arg, "Duration", other.type_name())),
    }
}

/// Extract a duration value as-is; anything else is an invalid argument
pub fn extract_strict_duration(value: &Value, func: &str, index: usize) -> Result<DurationValue, LapseError> {
    match value {
        Value::Duration(d) => Ok(d.clone()),
        Value::Error(e) => Err(e.clone()),
        other => Err(LapseError::invalid_argument(format!(
            "{}() only accepts Duration values, got {}",
            func,
            other.type_name()
        ))
        .in_function(func)
        .at_argument(index)),
    }
}

/// Extract a Number from a Value
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<i64, LapseError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Error(e) => Err(e.clone()),
        other => Err(LapseError::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a non-negative Number as a duration field
pub fn extract_unsigned(value: &Value, func: &str, arg: &str) -> Result<u64, LapseError> {
    let n = extract_number(value, func, arg)?;
    u64::try_from(n).map_err(|_| {
        LapseError::invalid_argument(format!("{}() argument '{}' must be non-negative, got {}", func, arg, n))
            .in_function(func)
    })
}

/// Extract the optional `include_days` flag, falling back to the context default
pub fn extract_day_mode(args: &[Value], index: usize, func: &str, ctx: &EvalContext) -> Result<DayMode, LapseError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(ctx.day_mode),
        Some(Value::Bool(b)) => Ok(DayMode::from(*b)),
        Some(Value::Error(e)) => Err(e.clone()),
        Some(other) => Err(LapseError::arg_type(func, "include_days", "Bool", other.type_name())),
    }
}
