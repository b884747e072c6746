//! Evaluation Context

use lapse_core::DayMode;

/// Evaluation context passed to plugins
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    /// Day mode used when a caller does not pass `include_days`
    pub day_mode: DayMode,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day_mode(mut self, day_mode: DayMode) -> Self {
        self.day_mode = day_mode;
        self
    }
}
