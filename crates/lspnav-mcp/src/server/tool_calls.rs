use super::McpServer;
use crate::protocol::JsonRpcResponse;
use lspnav_core::constants;
use lspnav_core::error::{ProtocolErrorCode, QueryError};
use lspnav_query::provider::CodeIntelligenceProvider;
use serde_json::{Value, json};
use tracing::{debug, warn};

mod navigation;

pub(super) struct ToolCallParams<'a, P> {
    pub id: Option<Value>,
    pub tool_name: &'a str,
    pub arguments: &'a Value,
    pub server: &'a McpServer<P>,
}

pub(super) async fn handle_tool_call<P>(params: ToolCallParams<'_, P>) -> JsonRpcResponse
where
    P: CodeIntelligenceProvider,
{
    debug!(tool = params.tool_name, "Tool call");
    match params.tool_name {
        constants::TOOL_GO_TO_DEFINITION => navigation::handle_go_to_definition(params).await,
        constants::TOOL_GET_DOCUMENT_SYMBOLS => {
            navigation::handle_get_document_symbols(params).await
        }
        other => {
            let code = ProtocolErrorCode::UnknownTool;
            JsonRpcResponse::error_with_data(
                params.id,
                code.jsonrpc_code(),
                format!("Unknown tool: {}", other),
                Some(json!({ "code": code.as_str() })),
            )
        }
    }
}

/// Helper: wrap plain text as MCP tool text content response.
fn tool_text_response(id: Option<Value>, text: String) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{"type": "text", "text": text}]
        }),
    )
}

/// Helper: JSON-RPC error carrying the canonical protocol code in `data.code`.
fn tool_error_response(id: Option<Value>, tool_name: &str, err: &QueryError) -> JsonRpcResponse {
    let code = err.protocol_code();
    warn!(tool = tool_name, code = code.as_str(), error = %err, "Tool call failed");
    JsonRpcResponse::error_with_data(
        id,
        code.jsonrpc_code(),
        err.to_string(),
        Some(json!({ "code": code.as_str() })),
    )
}
