//! JSON-RPC request handling
//!
//! Every registered function becomes a tool. Tool arguments arrive either
//! as an object keyed by argument name or as a positional array; both are
//! mapped onto the function's declared argument order.

use lapse_core::{DurationValue, Value};
use lapse_plugin::{EvalContext, FunctionMeta, PluginRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "lapse";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TOOL: &str = "help";

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// MCP Protocol types
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        Self { code: INVALID_PARAMS, message: message.into(), data: None }
    }
}

impl McpResponse {
    fn new(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        match result {
            Ok(r) => Self { jsonrpc: "2.0".to_string(), id, result: Some(r), error: None },
            Err(e) => Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(e) },
        }
    }
}

/// Dispatches requests against a function registry
pub struct Server {
    registry: PluginRegistry,
    ctx: EvalContext,
}

impl Server {
    pub fn new(registry: PluginRegistry, ctx: EvalContext) -> Self {
        Self { registry, ctx }
    }

    /// Handle one protocol line; `None` when no response is due
    pub fn handle_line(&self, line: &str) -> Option<McpResponse> {
        let request: McpRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "error parsing request");
                return Some(McpResponse::new(None, Err(McpError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                })));
            }
        };

        debug!(method = %request.method, "processing");
        let response = self.handle_request(&request);

        // Notifications (no id) should NOT receive a response
        if request.id.is_none() {
            debug!(method = %request.method, "notification processed (no response)");
            return None;
        }

        Some(response)
    }

    pub fn handle_request(&self, request: &McpRequest) -> McpResponse {
        if request.jsonrpc != "2.0" {
            warn!(jsonrpc = %request.jsonrpc, "unexpected jsonrpc version");
        }

        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => handle_initialize(&request.params),
            "initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tool_call(&request.params),

            _ => Err(McpError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        };

        McpResponse::new(request.id.clone(), result)
    }

    fn handle_tools_list(&self) -> JsonValue {
        let mut tools: Vec<JsonValue> = self.registry.function_metas().iter()
            .map(|meta| json!({
                "name": meta.name,
                "description": format!("{} Usage: {}", meta.description, meta.usage),
                "inputSchema": meta.input_schema(),
            }))
            .collect();

        tools.push(json!({
            "name": HELP_TOOL,
            "description": "Get documentation for an interval function, or list all functions.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Function name. Omit for general help."
                    }
                }
            }
        }));

        json!({ "tools": tools })
    }

    fn handle_tool_call(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

        let name = params.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

        let args = params.get("arguments").cloned().unwrap_or(JsonValue::Null);

        if name == HELP_TOOL {
            return Ok(self.tool_help(&args));
        }

        let meta = self.registry.get_function(name)
            .map(|f| f.meta())
            .ok_or_else(|| McpError {
                code: INVALID_PARAMS,
                message: format!("Unknown tool: {}", name),
                data: Some(json!({
                    "available": self.registry.function_metas().iter().map(|m| m.name).collect::<Vec<_>>()
                })),
            })?;

        let positional = positional_args(&meta, &args)?;
        let result = self.registry.call_function(name, &positional, &self.ctx);

        let text = match &result {
            Value::Error(e) => e.to_string(),
            other => other.to_string(),
        };

        // The text form drops `total_days`; the record keeps every field
        let record = result.as_duration().and_then(|d| serde_json::to_value(d).ok());

        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "value": value_to_json(&result),
            "record": record,
            "isError": result.is_error()
        }))
    }

    fn tool_help(&self, args: &JsonValue) -> JsonValue {
        let name = args.get("name").and_then(|v| v.as_str());
        let help = self.registry.help(name);

        json!({
            "content": [{ "type": "text", "text": format_help(&help) }],
            "data": value_to_json(&help),
            "isError": help.is_error()
        })
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Calendar-style interval arithmetic"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Lapse sums, divides and shortens ISO 8601 durations (1 year = 365 days, 1 month = 30 days). Pass durations as ISO strings such as PT1H30M or -P1D. Use 'help' to explore available functions."
    }))
}

/// Map tool arguments onto the function's argument order
fn positional_args(meta: &FunctionMeta, args: &JsonValue) -> Result<Vec<Value>, McpError> {
    let mut values = match args {
        JsonValue::Null => Vec::new(),
        JsonValue::Array(items) => items.iter().map(json_to_value).collect(),
        JsonValue::Object(obj) => {
            for key in obj.keys() {
                if !meta.args.iter().any(|a| a.name == key.as_str()) {
                    debug!(tool = meta.name, argument = %key, "ignoring unknown argument");
                }
            }

            let mut values = Vec::with_capacity(meta.args.len());
            for arg in meta.args {
                match obj.get(arg.name) {
                    Some(v) => values.push(json_to_value(v)),
                    None if arg.optional => values.push(Value::Null),
                    None => {
                        return Err(McpError::invalid_params(format!(
                            "Missing argument '{}' for tool '{}'",
                            arg.name, meta.name
                        )))
                    }
                }
            }
            values
        }
        _ => return Err(McpError::invalid_params("Tool arguments must be an object or an array")),
    };

    while matches!(values.last(), Some(Value::Null)) {
        values.pop();
    }

    Ok(values)
}

fn format_help(help: &Value) -> String {
    match help {
        Value::Object(map) => {
            let mut out = String::new();
            if let Some(Value::Text(n)) = map.get("name") { out.push_str(&format!("# {}\n\n", n)); }
            if let Some(Value::Text(d)) = map.get("description") { out.push_str(&format!("{}\n\n", d)); }
            if let Some(Value::Text(u)) = map.get("usage") { out.push_str(&format!("**Usage:** `{}`\n\n", u)); }
            if let Some(Value::List(examples)) = map.get("examples") {
                for ex in examples {
                    out.push_str(&format!("- `{}`\n", ex));
                }
            }
            if let Some(Value::Object(cats)) = map.get("functions") {
                let mut cats: Vec<_> = cats.iter().collect();
                cats.sort_by(|a, b| a.0.cmp(b.0));
                for (cat, names) in cats {
                    let names: Vec<&str> = names.as_list()
                        .map(|l| l.iter().filter_map(|n| n.as_text()).collect())
                        .unwrap_or_default();
                    out.push_str(&format!("**{}:** {}\n", cat, names.join(", ")));
                }
            }
            out
        }
        Value::Error(e) => format!("Error: {}", e.message),
        _ => format!("{:?}", help),
    }
}

/// Strings that parse as ISO 8601 durations become Duration values, and so
/// do objects shaped like a duration record
fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Number(i),
            None => Value::Text(n.to_string()),
        },
        JsonValue::String(s) => match s.parse() {
            Ok(d) => Value::Duration(d),
            Err(_) => Value::Text(s.clone()),
        },
        JsonValue::Array(arr) => Value::List(arr.iter().map(json_to_value).collect()),
        JsonValue::Object(obj) => match serde_json::from_value::<DurationValue>(json.clone()) {
            Ok(d) => Value::Duration(d),
            Err(_) => Value::Object(obj.iter().map(|(k, v)| (k.clone(), json_to_value(v))).collect()),
        },
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => json!(n),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Duration(d) => JsonValue::String(d.to_string()),
        Value::List(l) => JsonValue::Array(l.iter().map(value_to_json).collect()),
        Value::Object(o) => JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect()),
        Value::Error(e) => json!({"_error": {"code": e.code, "message": e.message}}),
    }
}
