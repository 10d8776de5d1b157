use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR};
use crate::tools;
use lspnav_core::constants;
use lspnav_core::types::HoverStrategy;
use lspnav_query::provider::CodeIntelligenceProvider;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use self::tool_calls::{ToolCallParams, handle_tool_call};

mod tool_calls;

/// MCP server state shared by every transport.
pub struct McpServer<P> {
    provider: P,
    workspace: PathBuf,
    hover_strategy: HoverStrategy,
}

impl<P> McpServer<P>
where
    P: CodeIntelligenceProvider,
{
    pub fn new(provider: P, workspace: impl Into<PathBuf>, hover_strategy: HoverStrategy) -> Self {
        Self {
            provider,
            workspace: workspace.into(),
            hover_strategy,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn hover_strategy(&self) -> HoverStrategy {
        self.hover_strategy
    }

    /// Handle one raw JSON-RPC message. Notifications produce no response.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle_request(&request).await,
            Err(e) => Some(JsonRpcResponse::error(
                None,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            )),
        }
    }

    pub async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": constants::MCP_PROTOCOL_VERSION,
                    "capabilities": {
                        "tools": {}
                    },
                    "serverInfo": {
                        "name": "lspnav",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => {
                let tools = tools::list_tools();
                JsonRpcResponse::success(id, json!({ "tools": tools }))
            }
            "tools/prepare" => {
                let (tool_name, arguments) = tool_call_target(&request.params);
                match tools::confirmation_for(tool_name, &arguments) {
                    Some(prompt) => JsonRpcResponse::success(id, json!(prompt)),
                    None => JsonRpcResponse::error(
                        id,
                        METHOD_NOT_FOUND,
                        format!("Unknown tool: {}", tool_name),
                    ),
                }
            }
            "tools/call" => {
                let (tool_name, arguments) = tool_call_target(&request.params);
                handle_tool_call(ToolCallParams {
                    id,
                    tool_name,
                    arguments: &arguments,
                    server: self,
                })
                .await
            }
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }
}

fn tool_call_target(params: &Value) -> (&str, Value) {
    let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
    let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
    (tool_name, arguments)
}

/// Serve line-delimited JSON-RPC on stdin/stdout until stdin closes.
pub async fn run_stdio<P>(server: &McpServer<P>) -> Result<(), McpError>
where
    P: CodeIntelligenceProvider,
{
    info!(workspace = %server.workspace().display(), "MCP server started");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    serve_lines(server, stdin, &mut stdout).await?;
    info!("stdin closed; MCP server stopping");
    Ok(())
}

/// Handle requests one line at a time, in arrival order.
pub async fn serve_lines<P, R, W>(
    server: &McpServer<P>,
    reader: R,
    writer: &mut W,
) -> Result<(), McpError>
where
    P: CodeIntelligenceProvider,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(response) = server.handle_message(&line).await {
            if let Some(error) = &response.error {
                debug!(code = error.code, message = %error.message, "Request failed");
            }
            write_response(writer, &response).await?;
        }
    }
    Ok(())
}

async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), McpError>
where
    W: AsyncWrite + Unpin,
{
    let mut serialized = serde_json::to_vec(response)?;
    serialized.push(b'\n');
    writer.write_all(&serialized).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests;
