// MCP tool argument types and handlers
//
// Input schemas are generated from these structs with schemars, so the doc
// comments below are what MCP clients see as parameter descriptions.

use qhistory_runtime::{Error, HistoryService};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const NOT_FOUND: i32 = -32001;
pub const STORE_UNAVAILABLE: i32 = -32002;

/// List recent Q CLI conversations
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListConversationsArgs {
    /// Maximum number of conversations to return (default: 20)
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Search conversations by text content
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchConversationsArgs {
    /// Case-insensitive substring to look for in user and assistant text
    pub query: String,
    /// Maximum number of results to return (default: 10)
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Get the turns of one conversation
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetConversationDetailsArgs {
    /// Conversation ID from list_conversations or search_conversations
    pub conversation_id: String,
    /// Only return the first N turns (default: all)
    #[serde(default, alias = "message_limit")]
    pub turn_limit: Option<i64>,
}

/// Export a conversation as markdown
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExportConversationArgs {
    /// Conversation ID to export
    pub conversation_id: String,
    /// File to write (`~` expanded, `.md` appended when missing).
    /// Omit to get the markdown back in the response.
    #[serde(default)]
    pub output_path: Option<String>,
}

/// Failure reported to the client as a JSON-RPC error
#[derive(Debug)]
pub struct ToolError {
    pub code: i32,
    pub message: String,
}

impl From<Error> for ToolError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidArgument(_) => INVALID_PARAMS,
            Error::NotFound(_) => NOT_FOUND,
            Error::StoreUnavailable(_) => STORE_UNAVAILABLE,
            Error::Config(_) | Error::Io(_) => INTERNAL_ERROR,
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

pub fn handle_list_conversations(
    service: &HistoryService,
    args: ListConversationsArgs,
) -> Result<Value, ToolError> {
    let conversations = service.list(args.limit)?;
    Ok(json!({
        "conversations": conversations,
        "note": "Order is estimated from storage position; no timestamps are recorded"
    }))
}

pub fn handle_search_conversations(
    service: &HistoryService,
    args: SearchConversationsArgs,
) -> Result<Value, ToolError> {
    let hits = service.search(&args.query, args.limit)?;
    Ok(json!({
        "query": args.query,
        "total": hits.len(),
        "hits": hits,
    }))
}

pub fn handle_get_conversation_details(
    service: &HistoryService,
    args: GetConversationDetailsArgs,
) -> Result<Value, ToolError> {
    let detail = service.get_detail_limited(&args.conversation_id, args.turn_limit)?;
    serde_json::to_value(&detail).map_err(|e| ToolError {
        code: INTERNAL_ERROR,
        message: e.to_string(),
    })
}

pub fn handle_export_conversation(
    service: &HistoryService,
    args: ExportConversationArgs,
) -> Result<Value, ToolError> {
    match args.output_path {
        Some(output) => {
            let report = service.export_to_file(&args.conversation_id, &output)?;
            Ok(json!({
                "conversation_id": report.id,
                "path": report.path,
                "bytes": report.bytes,
            }))
        }
        None => {
            let markdown = service.export_markdown(&args.conversation_id)?;
            Ok(json!({
                "conversation_id": args.conversation_id,
                "markdown": markdown,
            }))
        }
    }
}
