//! Lapse Plugin System
//!
//! Provides the `FunctionPlugin` trait for exposing interval operations
//! as named, documented functions, and the registry that dispatches them.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::EvalContext;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext};
    pub use lapse_core::prelude::*;
}
