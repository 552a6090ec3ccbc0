use qhistory_runtime::HistoryService;
use schemars::{JsonSchema, schema_for};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{BufRead, Write};

use super::tools::*;

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

fn schema_value<T: JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({"type": "object"}))
}

fn parse_args<T: DeserializeOwned>(tool_name: &str, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError {
        code: INVALID_PARAMS,
        message: format!("Invalid arguments for {}: {}", tool_name, e),
    })
}

pub struct QHistoryServer {
    service: HistoryService,
}

impl QHistoryServer {
    pub fn new(service: HistoryService) -> Self {
        Self { service }
    }

    /// `None` for notifications, which get no response
    fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "ignoring notification");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            _ => JsonRpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "qhistory",
                    "version": env!("CARGO_PKG_VERSION")
                },
                "instructions": "Read-only access to Amazon Q CLI conversation history. Use list_conversations or search_conversations to find conversation IDs, then get_conversation_details or export_conversation. Ordering is an estimate derived from storage position, not a timestamp."
            }),
        )
    }

    fn handle_list_tools(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "tools": [
                    {
                        "name": "list_conversations",
                        "description": "List recent Q CLI conversations with a preview of the first prompt and the turn count. Most recent first (estimated order).",
                        "inputSchema": schema_value::<ListConversationsArgs>(),
                    },
                    {
                        "name": "search_conversations",
                        "description": "Case-insensitive search over user and assistant text. Results are ranked by number of matching turns, then recency.",
                        "inputSchema": schema_value::<SearchConversationsArgs>(),
                    },
                    {
                        "name": "get_conversation_details",
                        "description": "Get the full turns of one conversation. Use turn_limit to fetch only the beginning of long conversations.",
                        "inputSchema": schema_value::<GetConversationDetailsArgs>(),
                    },
                    {
                        "name": "export_conversation",
                        "description": "Export a conversation as markdown, either to a file or returned inline.",
                        "inputSchema": schema_value::<ExportConversationArgs>(),
                    }
                ]
            }),
        )
    }

    fn handle_call_tool(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing params");
        };

        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing tool name");
        };

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
        tracing::debug!(tool = tool_name, "tool call");

        let result = match tool_name {
            "list_conversations" => parse_args(tool_name, arguments)
                .and_then(|args| handle_list_conversations(&self.service, args)),
            "search_conversations" => parse_args(tool_name, arguments)
                .and_then(|args| handle_search_conversations(&self.service, args)),
            "get_conversation_details" => parse_args(tool_name, arguments)
                .and_then(|args| handle_get_conversation_details(&self.service, args)),
            "export_conversation" => parse_args(tool_name, arguments)
                .and_then(|args| handle_export_conversation(&self.service, args)),
            _ => Err(ToolError {
                code: INVALID_PARAMS,
                message: format!("Unknown tool: {}", tool_name),
            }),
        };

        match result {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [
                        {
                            "type": "text",
                            "text": serde_json::to_string_pretty(&content).unwrap_or_else(|_| content.to_string())
                        }
                    ]
                }),
            ),
            Err(e) => {
                tracing::warn!(tool = tool_name, code = e.code, error = %e.message, "tool call failed");
                JsonRpcResponse::failure(id, e.code, e.message)
            }
        }
    }
}

/// Serve line-delimited JSON-RPC until `input` closes
pub fn serve<R: BufRead, W: Write>(
    server: &QHistoryServer,
    input: R,
    mut output: W,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
            Ok(request) => server.handle_request(request),
            Err(e) => Some(JsonRpcResponse::failure(
                Value::Null,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            )),
        };

        if let Some(response) = response {
            writeln!(output, "{}", serde_json::to_string(&response)?)?;
            output.flush()?;
        }
    }

    Ok(())
}

pub fn run_server(service: HistoryService) -> anyhow::Result<()> {
    tracing::info!(store = %service.location(), "starting MCP server on stdio");
    let server = QHistoryServer::new(service);
    let stdin = std::io::stdin();
    serve(&server, stdin.lock(), std::io::stdout())
}
