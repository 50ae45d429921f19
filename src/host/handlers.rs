//! Method handlers — initialize, ping, tool listing and tool calls.

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::tools::binder::{value_type_name, RawArguments};
use crate::tools::{CallResult, ToolRegistry};
use crate::types::{Error, HostConfig, Result};

/// Protocol revision reported when the client does not name one.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const METHOD_CALL_TOOL: &str = "tools/call";
pub const NOTIFICATION_CANCELLED: &str = "notifications/cancelled";

/// Handle every request method except `tools/call`, which the server
/// runs on its own task.
pub fn handle(
    registry: &ToolRegistry,
    config: &HostConfig,
    method: &str,
    params: &Value,
) -> Result<Value> {
    match method {
        "initialize" => Ok(initialize(config, params)),
        "ping" => Ok(json!({})),
        "tools/list" => list_tools(registry),
        _ => Err(Error::method_not_found(method)),
    }
}

fn initialize(config: &HostConfig, params: &Value) -> Value {
    let version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);
    json!({
        "protocolVersion": version,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": config.server_name,
            "version": env!("CARGO_PKG_VERSION"),
        }
    })
}

fn list_tools(registry: &ToolRegistry) -> Result<Value> {
    let tools = serde_json::to_value(registry.manifest())?;
    Ok(json!({ "tools": tools }))
}

/// Run `tools/call`. Protocol-level problems (no tool name, non-object
/// arguments) are errors; everything the registry reports is a result
/// with `isError` set.
pub async fn call_tool(
    registry: &ToolRegistry,
    params: &Value,
    cancel: &CancellationToken,
) -> Result<Value> {
    let name = str_field(params, "name")?;
    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => RawArguments::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            return Err(Error::invalid_params(format!(
                "arguments must be an object, got {}",
                value_type_name(other)
            )))
        }
    };

    let result = registry.dispatch_with_cancel(name, &arguments, cancel).await;
    Ok(call_result_value(&result))
}

/// Protocol shape of a call result.
pub fn call_result_value(result: &CallResult) -> Value {
    json!({
        "content": [{ "type": "text", "text": result.text() }],
        "isError": !result.ok,
    })
}

pub fn str_field<'a>(body: &'a Value, key: &str) -> Result<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::invalid_params(format!("missing required field: {}", key)))
}
