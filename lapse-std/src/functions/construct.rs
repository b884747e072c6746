//! Duration construction and inspection functions

use lapse_plugin::prelude::*;
use lapse_core::units;

use crate::helpers::{extract_duration, extract_unsigned};

pub struct IntervalFn;
pub struct IntervalFromFn;
pub struct IntervalSecondsFn;

static INTERVAL_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("text", "Text", "ISO 8601 duration, optionally signed (e.g. P1DT2H, -PT30M)"),
];
static INTERVAL_EXAMPLES: [&str; 3] = ["interval(\"PT90M\")", "interval(\"P1Y2M\")", "interval(\"-PT1S\")"];
static INTERVAL_RELATED: [&str; 2] = ["interval_from", "interval_format"];

static INTERVAL_FROM_ARGS: [ArgMeta; 7] = [
    ArgMeta::required("years", "Number", "Years"),
    ArgMeta::required("months", "Number", "Months"),
    ArgMeta::required("days", "Number", "Days"),
    ArgMeta::required("hours", "Number", "Hours"),
    ArgMeta::required("minutes", "Number", "Minutes"),
    ArgMeta::required("seconds", "Number", "Seconds"),
    ArgMeta::optional("total_days", "Number", "Whole days from a date difference", "none"),
];
static INTERVAL_FROM_EXAMPLES: [&str; 2] = ["interval_from(0, 0, 2, 12, 0, 0, 2)", "interval_from(1, 0, 0, 0, 0, 0)"];
static INTERVAL_FROM_RELATED: [&str; 2] = ["interval", "interval_shorten"];

static INTERVAL_SECONDS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("d", "Duration", "Interval to flatten"),
];
static INTERVAL_SECONDS_EXAMPLES: [&str; 2] = ["interval_seconds(\"P1D\") -> 86400", "interval_seconds(\"-PT1M\") -> -60"];
static INTERVAL_SECONDS_RELATED: [&str; 1] = ["interval_sum"];

impl FunctionPlugin for IntervalFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "interval",
            description: "Create a duration from ISO 8601 text (fields kept as written)",
            usage: "interval(text)",
            args: &INTERVAL_ARGS,
            returns: "Duration",
            examples: &INTERVAL_EXAMPLES,
            category: "interval",
            related: &INTERVAL_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 1 {
            return Value::Error(LapseError::arg_count("interval", 1, args.len()));
        }

        match &args[0] {
            Value::Text(s) => match DurationValue::parse(s) {
                Ok(d) => Value::Duration(d),
                Err(e) => Value::Error(LapseError::from(e).in_function("interval")),
            },
            Value::Duration(d) => Value::Duration(d.clone()),
            Value::Error(e) => Value::Error(e.clone()),
            other => Value::Error(LapseError::arg_type("interval", "text", "Text", other.type_name())),
        }
    }
}

impl FunctionPlugin for IntervalFromFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "interval_from",
            description: "Create a duration from unit fields and an optional whole-day count",
            usage: "interval_from(years, months, days, hours, minutes, seconds, total_days?)",
            args: &INTERVAL_FROM_ARGS,
            returns: "Duration",
            examples: &INTERVAL_FROM_EXAMPLES,
            category: "interval",
            related: &INTERVAL_FROM_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() < 6 || args.len() > 7 {
            return Value::Error(LapseError::arg_count("interval_from", 6, args.len())
                .with_note("interval_from(years, months, days, hours, minutes, seconds, total_days?)"));
        }

        let mut fields = [0u64; 6];
        for (i, field) in fields.iter_mut().enumerate() {
            *field = match extract_unsigned(&args[i], "interval_from", INTERVAL_FROM_ARGS[i].name) {
                Ok(v) => v,
                Err(e) => return Value::Error(e),
            };
        }

        let [years, months, days, hours, minutes, seconds] = fields;
        let mut duration = DurationValue::new(years, months, days, hours, minutes, seconds);

        match args.get(6) {
            None | Some(Value::Null) => {}
            Some(v) => match extract_unsigned(v, "interval_from", "total_days") {
                Ok(total) => duration = duration.with_total_days(total),
                Err(e) => return Value::Error(e),
            },
        }

        Value::Duration(duration)
    }
}

impl FunctionPlugin for IntervalSecondsFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "interval_seconds",
            description: "Flatten a duration into signed seconds (365-day years, 30-day months)",
            usage: "interval_seconds(d)",
            args: &INTERVAL_SECONDS_ARGS,
            returns: "Number",
            examples: &INTERVAL_SECONDS_EXAMPLES,
            category: "interval",
            related: &INTERVAL_SECONDS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 1 {
            return Value::Error(LapseError::arg_count("interval_seconds", 1, args.len()));
        }

        let d = match extract_duration(&args[0], "interval_seconds", "d") {
            Ok(d) => d,
            Err(e) => return Value::Error(e),
        };

        match i64::try_from(units::to_signed_seconds(&d)) {
            Ok(secs) => Value::Number(secs),
            Err(_) => Value::Error(LapseError::overflow().in_function("interval_seconds")),
        }
    }
}
