//! Lapse Standard Library
//!
//! Interval functions over calendar-style durations:
//! - Construction from ISO 8601 text or unit fields
//! - Signed summation and unit-borrowing division
//! - Canonical shortening and ISO rendering in hours-only or calendar mode

pub mod functions;
mod helpers;

use lapse_plugin::PluginRegistry;

/// Load interval functions into registry
pub fn load_standard_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Construction (3 functions)
        .with_function(functions::IntervalFn)
        .with_function(functions::IntervalFromFn)
        .with_function(functions::IntervalSecondsFn)

        // Arithmetic (2 functions)
        .with_function(functions::IntervalSum)
        .with_function(functions::IntervalDivide)

        // Canonical form (2 functions)
        .with_function(functions::IntervalShorten)
        .with_function(functions::IntervalFormat)
}

/// Create registry with standard library
pub fn standard_registry() -> PluginRegistry {
    load_standard_library(PluginRegistry::new())
}
