//! Ruler MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdio.
//!
//! Tools:
//! - convert: Convert a value between two length units
//! - list_units: List the supported units and their factors

use std::io::{self, BufRead, Write};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};
use ruler_core::{InputPolicy, RulerError};
use ruler_units::{convert_units_with, list_units};

use crate::config::Config;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "ruler";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// MCP Protocol types
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub jsonrpc: String,
    /// `None` when the member is absent (a notification); an explicit
    /// `"id": null` is kept as `Some(Null)`
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

fn present_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<JsonValue>, D::Error> {
    JsonValue::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: JsonValue,
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
        McpError {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }
}

impl McpResponse {
    fn reply(id: JsonValue, result: Result<JsonValue, McpError>) -> Self {
        match result {
            Ok(r) => McpResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(r),
                error: None,
            },
            Err(e) => McpResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(e),
            },
        }
    }
}

/// Serve requests read line by line from `reader` until EOF
pub fn serve<R: BufRead, W: Write>(mut reader: R, mut writer: W, config: &Config) -> io::Result<()> {
    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "ruler MCP server ready");

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            info!("client disconnected (EOF)");
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "received");

        let request: McpRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "error parsing request");
                let response = McpResponse::reply(JsonValue::Null, Err(McpError {
                    code: -32700,
                    message: format!("Parse error: {}", e),
                    data: None,
                }));
                write_response(&mut writer, &response)?;
                continue;
            }
        };

        debug!(method = %request.method, "processing");
        let response = handle_request(&request, config);

        // Notifications (no id) should NOT receive a response
        if request.id.is_none() {
            debug!(method = %request.method, "notification processed");
            continue;
        }

        write_response(&mut writer, &response)?;
    }

    info!("server shutting down");
    Ok(())
}

fn write_response<W: Write>(writer: &mut W, response: &McpResponse) -> io::Result<()> {
    let response_json = serde_json::to_string(response)?;
    writeln!(writer, "{}", response_json)?;
    writer.flush()
}

pub fn handle_request(request: &McpRequest, config: &Config) -> McpResponse {
    let id = request.id.clone().unwrap_or(JsonValue::Null);

    if request.jsonrpc != "2.0" {
        return McpResponse::reply(id, Err(McpError {
            code: -32600,
            message: format!("Invalid Request: unsupported jsonrpc version {:?}", request.jsonrpc),
            data: None,
        }));
    }

    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(&request.params, config),

        _ => Err(McpError {
            code: -32601,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    McpResponse::reply(id, result)
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
            "description": "Length conversion between centimeters, meters, feet and millimeters"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Use 'convert' to convert a length between units and 'list_units' to see the supported units. Results are rounded to 2 decimal places."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    let names: Vec<&str> = list_units().iter().map(|u| u.name.as_str()).collect();

    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a length from one unit to another. Results are rounded to 2 decimal places.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": {
                            "type": ["string", "number"],
                            "description": "Value to convert. Text that is not a number converts as 0 unless strict is set."
                        },
                        "from": {
                            "type": "string",
                            "description": "Source unit",
                            "enum": names
                        },
                        "to": {
                            "type": "string",
                            "description": "Target unit",
                            "enum": names
                        },
                        "strict": {
                            "type": "boolean",
                            "description": "Reject values that are not numbers"
                        }
                    },
                    "required": ["value"]
                }
            },
            {
                "name": "list_units",
                "description": "List supported length units with their size in meters.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            }
        ]
    }))
}

fn handle_tool_call(params: &Option<JsonValue>, config: &Config) -> Result<JsonValue, McpError> {
    let params = params.as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "convert" => tool_convert(args, config),
        "list_units" => tool_list_units(),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn tool_convert(args: JsonValue, config: &Config) -> Result<JsonValue, McpError> {
    let raw = match args.get("value") {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Null) | None => {
            return Err(McpError {
                code: -32602,
                message: "Missing value argument".to_string(),
                data: Some(json!(RulerError::arg_missing("value"))),
            })
        }
        Some(other) => other.to_string(),
    };

    let from = args.get("from").and_then(|v| v.as_str()).unwrap_or(config.default_from.as_str());
    let to = args.get("to").and_then(|v| v.as_str()).unwrap_or(config.default_to.as_str());
    let strict = args.get("strict").and_then(|v| v.as_bool()).unwrap_or(config.strict);

    match convert_units_with(InputPolicy::from_strict(strict), &raw, from, to) {
        Ok(conversion) => Ok(json!({
            "content": [{ "type": "text", "text": conversion.label() }],
            "value": conversion.value,
            "from": conversion.from,
            "to": conversion.to,
            "result": conversion.result,
            "isError": false
        })),
        Err(e) => {
            let err = RulerError::from(e);
            debug!(error = %err, "conversion failed");
            Ok(json!({
                "content": [{ "type": "text", "text": err.to_string() }],
                "error": err,
                "isError": true
            }))
        }
    }
}

fn tool_list_units() -> Result<JsonValue, McpError> {
    let units = list_units();
    let text = units.iter()
        .map(|u| format!("{} ({}) = {} m", u.name, u.symbol, u.factor))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "units": units
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn request(id: Option<JsonValue>, method: &str, params: Option<JsonValue>) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.to_string(),
            params,
        }
    }

    fn call(tool: &str, arguments: JsonValue) -> JsonValue {
        let req = request(
            Some(json!(1)),
            "tools/call",
            Some(json!({ "name": tool, "arguments": arguments })),
        );
        let response = handle_request(&req, &Config::default());
        assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
        response.result.unwrap()
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let req = request(
            Some(json!(1)),
            "initialize",
            Some(json!({ "protocolVersion": "2024-11-05", "clientInfo": { "name": "test" } })),
        );
        let result = handle_request(&req, &Config::default()).result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "ruler");
    }

    #[test]
    fn test_tools_list() {
        let req = request(Some(json!(2)), "tools/list", None);
        let result = handle_request(&req, &Config::default()).result.unwrap();
        let tools: Vec<&str> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(tools, vec!["convert", "list_units"]);
    }

    #[test]
    fn test_convert_tool() {
        let result = call("convert", json!({ "value": "1", "from": "Meters", "to": "Feet" }));
        assert_eq!(result["result"], 3.28);
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["text"], "Result: 3.28 Feet");
    }

    #[test]
    fn test_convert_tool_numeric_value() {
        let result = call("convert", json!({ "value": 5, "from": "ft", "to": "mm" }));
        assert_eq!(result["result"], 1524.0);
    }

    #[test]
    fn test_convert_tool_defaults_to_meters() {
        let result = call("convert", json!({ "value": "2.346" }));
        assert_eq!(result["to"]["name"], "Meters");
        assert_eq!(result["result"], 2.35);
    }

    #[test]
    fn test_convert_tool_fallback_and_strict() {
        let result = call("convert", json!({ "value": "abc", "from": "cm", "to": "m" }));
        assert_eq!(result["result"], 0.0);

        let result = call("convert", json!({ "value": "abc", "from": "cm", "to": "m", "strict": true }));
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "PARSE_ERROR");
    }

    #[test]
    fn test_convert_tool_unknown_unit() {
        let result = call("convert", json!({ "value": "1", "from": "Meters", "to": "Yards" }));
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "UNKNOWN_UNIT");
    }

    #[test]
    fn test_convert_tool_missing_value() {
        let req = request(
            Some(json!(3)),
            "tools/call",
            Some(json!({ "name": "convert", "arguments": {} })),
        );
        let response = handle_request(&req, &Config::default());
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn test_list_units_tool() {
        let result = call("list_units", json!({}));
        let units = result["units"].as_array().unwrap();
        assert_eq!(units.len(), 4);
        assert_eq!(units[2]["name"], "Feet");
        assert_eq!(units[2]["factor"], 0.3048);
    }

    #[test]
    fn test_unknown_method() {
        let req = request(Some(json!(4)), "resources/list", None);
        let response = handle_request(&req, &Config::default());
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn test_serve_loop() {
        let input = concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n",
            "\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
            "not json\n",
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/call\",\"params\":{\"name\":\"convert\",\"arguments\":{\"value\":\"100\",\"from\":\"cm\",\"to\":\"m\"}}}\n",
        );
        let mut output = Vec::new();
        serve(Cursor::new(input), &mut output, &Config::default()).unwrap();

        let lines: Vec<JsonValue> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        // ping, parse error, convert; the notification gets no reply
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["error"]["code"], -32700);
        assert_eq!(lines[1].get("id"), Some(&JsonValue::Null));
        assert_eq!(lines[2]["result"]["result"], 1.0);
    }

    #[test]
    fn test_null_id_is_a_request() {
        let input = concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":null,\"method\":\"ping\"}\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"ping\"}\n",
        );
        let mut output = Vec::new();
        serve(Cursor::new(input), &mut output, &Config::default()).unwrap();

        let lines: Vec<JsonValue> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].get("id"), Some(&JsonValue::Null));
        assert_eq!(lines[0]["result"], json!({}));
    }

    #[test]
    fn test_id_absent_vs_null() {
        let absent: McpRequest = serde_json::from_str(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();
        assert_eq!(absent.id, None);

        let null: McpRequest = serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert_eq!(null.id, Some(JsonValue::Null));
    }

    #[test]
    fn test_wrong_jsonrpc_version() {
        let mut req = request(Some(json!(7)), "ping", None);
        req.jsonrpc = "1.0".to_string();
        let response = handle_request(&req, &Config::default());
        assert_eq!(response.id, json!(7));
        assert_eq!(response.error.unwrap().code, -32600);

        let missing: McpRequest = serde_json::from_str(r#"{"id":8,"method":"ping"}"#).unwrap();
        let response = handle_request(&missing, &Config::default());
        assert_eq!(response.error.unwrap().code, -32600);
    }
}
