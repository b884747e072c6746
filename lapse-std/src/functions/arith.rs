//! Interval summation and division functions

use lapse_plugin::prelude::*;

use crate::helpers::{extract_duration, extract_number, extract_strict_duration};

pub struct IntervalSum;
pub struct IntervalDivide;

static SUM_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("base", "Duration", "Starting duration (inverted subtracts)"),
    ArgMeta::required("additions", "List", "Durations to add; inverted ones subtract"),
];
static SUM_EXAMPLES: [&str; 3] = [
    "interval_sum(interval(\"PT0H\"), [interval(\"PT1S\"), interval(\"PT1M\")]) -> PT1M1S",
    "interval_sum(interval(\"PT1S\"), interval(\"-PT1S\"), interval(\"PT1H\")) -> PT1H",
    "interval_sum(interval(\"PT1M\"), interval(\"-PT1H\")) -> -PT59M",
];
static SUM_RELATED: [&str; 2] = ["interval_divide", "interval_seconds"];

static DIVIDE_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("d", "Duration", "Duration to divide"),
    ArgMeta::required("divisor", "Number", "Positive integer divisor"),
];
static DIVIDE_EXAMPLES: [&str; 3] = [
    "interval_divide(\"PT1H\", 2) -> PT30M",
    "interval_divide(\"P1D\", 4) -> PT6H",
    "interval_divide(\"PT75S\", 1) -> PT1M15S",
];
static DIVIDE_RELATED: [&str; 2] = ["interval_sum", "interval_shorten"];

impl FunctionPlugin for IntervalSum {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "interval_sum",
            description: "Sum signed durations into hours, minutes and seconds",
            usage: "interval_sum(base, additions) or interval_sum(base, d1, d2, ...)",
            args: &SUM_ARGS,
            returns: "Duration",
            examples: &SUM_EXAMPLES,
            category: "interval",
            related: &SUM_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let Some((first, rest)) = args.split_first() else {
            return Value::Error(
                LapseError::invalid_argument("interval_sum() needs a base duration").in_function("interval_sum"),
            );
        };

        // Additions come either as one list or as the remaining arguments
        let (additions, from_list) = match rest {
            [Value::List(items)] => (items.as_slice(), true),
            _ => (rest, false),
        };

        if additions.is_empty() {
            return Value::Error(LapseError::invalid_argument(
                "interval_sum() needs at least one duration to add",
            ).in_function("interval_sum"));
        }

        // Validate everything before computing anything
        let base = match extract_strict_duration(first, "interval_sum", 0) {
            Ok(d) => d,
            Err(e) => return Value::Error(e),
        };

        let mut durations = Vec::with_capacity(additions.len());
        for (i, value) in additions.iter().enumerate() {
            let index = if from_list { 1 } else { 1 + i };
            match extract_strict_duration(value, "interval_sum", index) {
                Ok(d) => durations.push(d),
                Err(e) if from_list && !value.is_error() => {
                    return Value::Error(e.with_note(format!("additions[{}]", i)))
                }
                Err(e) => return Value::Error(e),
            }
        }

        match lapse_core::sum(&base, &durations) {
            Ok(d) => Value::Duration(d),
            Err(e) => Value::Error(LapseError::from(e).in_function("interval_sum")),
        }
    }
}

impl FunctionPlugin for IntervalDivide {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "interval_divide",
            description: "Divide a duration by an integer, borrowing remainders into smaller units",
            usage: "interval_divide(d, divisor)",
            args: &DIVIDE_ARGS,
            returns: "Duration",
            examples: &DIVIDE_EXAMPLES,
            category: "interval",
            related: &DIVIDE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 2 {
            return Value::Error(LapseError::arg_count("interval_divide", 2, args.len()));
        }

        let d = match extract_duration(&args[0], "interval_divide", "d") {
            Ok(d) => d,
            Err(e) => return Value::Error(e),
        };
        let divisor = match extract_number(&args[1], "interval_divide", "divisor") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };

        let divisor = match u64::try_from(divisor) {
            Ok(k) => k,
            Err(_) => {
                return Value::Error(LapseError::invalid_argument(format!(
                    "divisor must be a positive integer, got {}",
                    divisor
                ))
                .in_function("interval_divide"))
            }
        };

        match lapse_core::divide(&d, divisor) {
            Ok(d) => Value::Duration(d),
            Err(e) => Value::Error(LapseError::from(e).in_function("interval_divide")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> EvalContext {
        EvalContext::new()
    }

    fn dur(s: &str) -> Value {
        Value::Duration(DurationValue::parse(s).unwrap())
    }

    fn expect_duration(v: Value) -> DurationValue {
        match v {
            Value::Duration(d) => d,
            other => panic!("Expected Duration, got {:?}", other),
        }
    }

    fn expect_error(v: Value) -> LapseError {
        match v {
            Value::Error(e) => e,
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_sum_with_list() {
        let result = IntervalSum.call(&[dur("PT0H"), Value::List(vec![dur("PT1S"), dur("PT1M")])], &ctx());
        assert_eq!(expect_duration(result).to_string(), "PT1M1S");
    }

    #[test]
    fn test_sum_variadic() {
        let result = IntervalSum.call(&[dur("PT1S"), dur("-PT1S"), dur("PT1M"), dur("PT1H")], &ctx());
        assert_eq!(expect_duration(result).to_string(), "PT1H1M");
    }

    #[test]
    fn test_sum_negative_result() {
        let result = IntervalSum.call(&[dur("PT1M"), dur("-PT1H")], &ctx());
        let d = expect_duration(result);
        assert!(d.inverted);
        assert_eq!(d.to_string(), "-PT59M");
    }

    #[test]
    fn test_sum_base_only() {
        let err = expect_error(IntervalSum.call(&[dur("PT1H")], &ctx()));
        assert_eq!(err.code, codes::INVALID_ARGUMENT);

        let err = expect_error(IntervalSum.call(&[dur("PT1H"), Value::List(vec![])], &ctx()));
        assert_eq!(err.code, codes::INVALID_ARGUMENT);

        let err = expect_error(IntervalSum.call(&[], &ctx()));
        assert_eq!(err.code, codes::INVALID_ARGUMENT);
    }

    #[test]
    fn test_sum_rejects_non_duration() {
        let err = expect_error(IntervalSum.call(&[dur("PT1H"), dur("PT1M"), Value::Number(60)], &ctx()));
        assert_eq!(err.code, codes::INVALID_ARGUMENT);
        assert_eq!(err.context.unwrap().argument, Some(2));

        let err = expect_error(IntervalSum.call(&[Value::Text("PT1H".to_string()), dur("PT1M")], &ctx()));
        assert_eq!(err.code, codes::INVALID_ARGUMENT);
    }

    #[test]
    fn test_sum_list_reports_element() {
        let additions = Value::List(vec![dur("PT1M"), dur("PT2M"), Value::Number(60)]);
        let err = expect_error(IntervalSum.call(&[dur("PT1H"), additions], &ctx()));
        assert_eq!(err.code, codes::INVALID_ARGUMENT);
        let context = err.context.unwrap();
        assert_eq!(context.argument, Some(1));
        assert_eq!(context.notes, vec!["additions[2]".to_string()]);
    }

    #[test]
    fn test_sum_propagates_error_element() {
        let upstream = LapseError::overflow();
        let additions = Value::List(vec![dur("PT1M"), Value::Error(upstream)]);
        let err = expect_error(IntervalSum.call(&[dur("PT1H"), additions], &ctx()));
        assert_eq!(err.code, codes::OVERFLOW);
        assert!(err.context.is_none());
    }

    #[test]
    fn test_divide() {
        let result = IntervalDivide.call(&[dur("P1D"), Value::Number(2)], &ctx());
        assert_eq!(expect_duration(result).to_string(), "PT12H");
    }

    #[test]
    fn test_divide_accepts_text() {
        let result = IntervalDivide.call(&[Value::Text("PT75M".to_string()), Value::Number(1)], &ctx());
        assert_eq!(expect_duration(result).to_string(), "PT1H15M");
    }

    #[test]
    fn test_divide_by_zero() {
        let err = expect_error(IntervalDivide.call(&[dur("PT1H"), Value::Number(0)], &ctx()));
        assert_eq!(err.code, codes::INVALID_ARGUMENT);
    }

    #[test]
    fn test_divide_negative_divisor() {
        let err = expect_error(IntervalDivide.call(&[dur("PT1H"), Value::Number(-2)], &ctx()));
        assert_eq!(err.code, codes::INVALID_ARGUMENT);
    }
}
