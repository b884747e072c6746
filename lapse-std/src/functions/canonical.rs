//! Canonical form: shorten and format

use lapse_plugin::prelude::*;

use crate::helpers::{extract_day_mode, extract_duration};

pub struct IntervalShorten;
pub struct IntervalFormat;

static SHORTEN_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("d", "Duration", "Duration to shorten"),
    ArgMeta::optional("include_days", "Bool", "Keep days and carry them into months and years", "false"),
];
static SHORTEN_EXAMPLES: [&str; 3] = [
    "interval_shorten(\"PT75M\") -> PT1H15M",
    "interval_shorten(\"P1D\") -> PT24H",
    "interval_shorten(\"PT48H\", true) -> P2D",
];
static SHORTEN_RELATED: [&str; 2] = ["interval_format", "interval_divide"];

static FORMAT_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("d", "Duration", "Duration to render"),
    ArgMeta::optional("include_days", "Bool", "Keep days and carry them into months and years", "false"),
];
static FORMAT_EXAMPLES: [&str; 3] = [
    "interval_format(\"PT0S\") -> PT0M",
    "interval_format(\"PT3600S\") -> PT1H",
    "interval_format(\"PT25H\", true) -> P1DT1H",
];
static FORMAT_RELATED: [&str; 1] = ["interval_shorten"];

impl FunctionPlugin for IntervalShorten {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "interval_shorten",
            description: "Carry overflowing units upward into the shortest equivalent duration",
            usage: "interval_shorten(d, include_days?)",
            args: &SHORTEN_ARGS,
            returns: "Duration",
            examples: &SHORTEN_EXAMPLES,
            category: "interval",
            related: &SHORTEN_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if args.is_empty() || args.len() > 2 {
            return Value::Error(LapseError::arg_count("interval_shorten", 1, args.len()));
        }

        let d = match extract_duration(&args[0], "interval_shorten", "d") {
            Ok(d) => d,
            Err(e) => return Value::Error(e),
        };
        let mode = match extract_day_mode(args, 1, "interval_shorten", ctx) {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        match lapse_core::shorten(&d, mode) {
            Ok(d) => Value::Duration(d),
            Err(e) => Value::Error(LapseError::from(e).in_function("interval_shorten")),
        }
    }
}

impl FunctionPlugin for IntervalFormat {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "interval_format",
            description: "Shorten a duration and render it as ISO 8601 text (unsigned)",
            usage: "interval_format(d, include_days?)",
            args: &FORMAT_ARGS,
            returns: "Text",
            examples: &FORMAT_EXAMPLES,
            category: "interval",
            related: &FORMAT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if args.is_empty() || args.len() > 2 {
            return Value::Error(LapseError::arg_count("interval_format", 1, args.len()));
        }

        let d = match extract_duration(&args[0], "interval_format", "d") {
            Ok(d) => d,
            Err(e) => return Value::Error(e),
        };
        let mode = match extract_day_mode(args, 1, "interval_format", ctx) {
            Ok(m) => m,
            Err(e) => return Value::Error(e),
        };

        match lapse_core::format(&d, mode) {
            Ok(s) => Value::Text(s),
            Err(e) => Value::Error(LapseError::from(e).in_function("interval_format")),
        }
    }
}
