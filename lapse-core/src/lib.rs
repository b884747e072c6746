//! Lapse Core - Interval arithmetic
//!
//! This crate provides the core types and operations used throughout Lapse:
//! - `DurationValue`: calendar-style duration record (Y/M/D/H/M/S + sign)
//! - `units`: fixed-ratio conversion into total seconds
//! - `sum` / `divide`: signed summation and unit-borrowing division
//! - `shorten` / `format`: canonical form in hours-only or calendar mode
//! - `Value` and `LapseError`: runtime values and structured errors

mod duration;
mod canonical;
mod arith;
mod value;
mod error;
pub mod units;

pub use duration::{DurationValue, DurationError};
pub use canonical::{DayMode, shorten, format};
pub use arith::{sum, divide};
pub use value::Value;
pub use error::{LapseError, ErrorContext, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{DurationValue, DurationError, DayMode, Value, LapseError, Severity};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod value_tests {
        use super::*;

        #[test]
        fn test_from_i64() {
            let v: Value = 42i64.into();
            assert!(matches!(v, Value::Number(42)));
            assert_eq!(v.as_number(), Some(42));
        }

        #[test]
        fn test_from_str() {
            let v: Value = "hello".into();
            assert_eq!(v.as_text(), Some("hello"));
        }

        #[test]
        fn test_from_duration() {
            let v: Value = DurationValue::from_seconds(90).into();
            assert!(v.is_duration());
            assert_eq!(v.as_duration().map(|d| d.seconds), Some(90));
        }

        #[test]
        fn test_type_name() {
            assert_eq!(Value::Number(0).type_name(), "Number");
            assert_eq!(Value::Text(String::new()).type_name(), "Text");
            assert_eq!(Value::Duration(DurationValue::zero()).type_name(), "Duration");
            assert_eq!(Value::Null.type_name(), "Null");
        }

        #[test]
        fn test_to_duration_from_text() {
            let v = Value::Text("PT90M".to_string()).to_duration();
            assert_eq!(v.as_duration().map(|d| d.minutes), Some(90));
        }

        #[test]
        fn test_to_duration_bad_text() {
            let v = Value::Text("ninety minutes".to_string()).to_duration();
            match v {
                Value::Error(e) => assert_eq!(e.code, codes::PARSE_ERROR),
                other => panic!("Expected Error, got {:?}", other),
            }
        }

        #[test]
        fn test_to_duration_rejects_number() {
            let v = Value::Number(60).to_duration();
            match v {
                Value::Error(e) => assert_eq!(e.code, codes::TYPE_ERROR),
                other => panic!("Expected Error, got {:?}", other),
            }
        }

        #[test]
        fn test_display_duration() {
            let v = Value::Duration(DurationValue::parse("-PT1H").unwrap());
            assert_eq!(v.to_string(), "-PT1H");
        }

        #[test]
        fn test_get_field() {
            let mut map = std::collections::HashMap::new();
            map.insert("name".to_string(), Value::Text("interval_sum".to_string()));
            let obj = Value::Object(map);
            assert_eq!(obj.get("name").as_text(), Some("interval_sum"));
            assert!(obj.get("missing").is_error());
            assert!(Value::Null.get("name").is_error());
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_from_duration_error() {
            let err: LapseError = DurationError::InvalidArgument("division by zero".to_string()).into();
            assert_eq!(err.code, codes::INVALID_ARGUMENT);
            assert!(err.message.contains("division by zero"));

            let err: LapseError = DurationError::Overflow.into();
            assert_eq!(err.code, codes::OVERFLOW);
        }

        #[test]
        fn test_error_with_context() {
            let err = LapseError::invalid_argument("not a duration")
                .in_function("interval_sum")
                .at_argument(2);
            let ctx = err.context.unwrap();
            assert_eq!(ctx.function, Some("interval_sum".to_string()));
            assert_eq!(ctx.argument, Some(2));
        }

        #[test]
        fn test_error_with_note() {
            let err = LapseError::type_error("Duration", "Number")
                .with_note("from additions");
            let ctx = err.context.unwrap();
            assert_eq!(ctx.notes, vec!["from additions".to_string()]);
        }

        #[test]
        fn test_error_display() {
            let err = LapseError::parse_error("'PX' must start with 'P'");
            let display = format!("{}", err);
            assert!(display.contains("PARSE_ERROR"));
        }

        #[test]
        fn test_duration_error_display() {
            let err = DurationError::InvalidArgument("division by zero".to_string());
            assert_eq!(err.to_string(), "Invalid argument: division by zero");
        }
    }
}
