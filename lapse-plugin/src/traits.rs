//! Plugin traits

use lapse_core::Value;
use crate::EvalContext;
use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};

/// Metadata about a function argument
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl ArgMeta {
    pub const fn required(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: false, default: None }
    }

    pub const fn optional(name: &'static str, typ: &'static str, description: &'static str, default: &'static str) -> Self {
        Self { name, typ, description, optional: true, default: Some(default) }
    }

    /// JSON Schema type for this argument
    fn json_type(&self) -> &'static str {
        match self.typ {
            "Number" => "integer",
            "Bool" => "boolean",
            "List" => "array",
            _ => "string",
        }
    }
}

/// Metadata for a function plugin
#[derive(Debug, Clone, Serialize)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub args: &'static [ArgMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    pub category: &'static str,
    pub related: &'static [&'static str],
}

impl FunctionMeta {
    /// JSON Schema describing the arguments as a named object
    pub fn input_schema(&self) -> JsonValue {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for arg in self.args {
            let mut prop = json!({
                "type": arg.json_type(),
                "description": arg.description,
            });
            if let Some(default) = arg.default {
                prop["default"] = JsonValue::String(default.to_string());
            }
            properties.insert(arg.name.to_string(), prop);
            if !arg.optional {
                required.push(arg.name);
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Pure function plugin
pub trait FunctionPlugin: Send + Sync {
    fn meta(&self) -> FunctionMeta;
    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;

    static ARGS: [ArgMeta; 3] = [
        ArgMeta::required("d", "Duration", "Interval"),
        ArgMeta::required("divisor", "Number", "Divisor"),
        ArgMeta::optional("include_days", "Bool", "Keep days", "false"),
    ];

    fn meta() -> FunctionMeta {
        FunctionMeta {
            name: "demo",
            description: "Demo",
            usage: "demo(d, divisor, include_days?)",
            args: &ARGS,
            returns: "Duration",
            examples: &[],
            category: "interval",
            related: &[],
        }
    }

    #[test]
    fn test_input_schema_types() {
        let schema = meta().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["d"]["type"], "string");
        assert_eq!(schema["properties"]["divisor"]["type"], "integer");
        assert_eq!(schema["properties"]["include_days"]["type"], "boolean");
        assert_eq!(schema["properties"]["include_days"]["default"], "false");
    }

    #[test]
    fn test_input_schema_required() {
        let schema = meta().input_schema();
        assert_eq!(schema["required"], json!(["d", "divisor"]));
    }
}
