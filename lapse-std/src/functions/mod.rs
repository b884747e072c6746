//! Interval functions

mod construct;
mod arith;
mod canonical;

pub use construct::{IntervalFn, IntervalFromFn, IntervalSecondsFn};
pub use arith::{IntervalSum, IntervalDivide};
pub use canonical::{IntervalShorten, IntervalFormat};
