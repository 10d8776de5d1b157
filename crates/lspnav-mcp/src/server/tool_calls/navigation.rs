use super::{ToolCallParams, tool_error_response, tool_text_response};
use crate::server::McpServer;
use crate::protocol::JsonRpcResponse;
use lspnav_core::error::QueryError;
use lspnav_core::types::{OutlineQuery, SymbolQuery};
use lspnav_query::definition::go_to_definition;
use lspnav_query::documents::{open_text_document, resolve_document_uri};
use lspnav_query::outline::{document_outline, render_outline};
use lspnav_query::provider::CodeIntelligenceProvider;
use serde_json::Value;

pub(super) async fn handle_go_to_definition<P>(params: ToolCallParams<'_, P>) -> JsonRpcResponse
where
    P: CodeIntelligenceProvider,
{
    let ToolCallParams {
        id,
        tool_name,
        arguments,
        server,
    } = params;
    match run_go_to_definition(server, arguments).await {
        Ok(text) => tool_text_response(id, text),
        Err(e) => tool_error_response(id, tool_name, &e),
    }
}

pub(super) async fn handle_get_document_symbols<P>(
    params: ToolCallParams<'_, P>,
) -> JsonRpcResponse
where
    P: CodeIntelligenceProvider,
{
    let ToolCallParams {
        id,
        tool_name,
        arguments,
        server,
    } = params;
    match run_get_document_symbols(server, arguments).await {
        Ok(text) => tool_text_response(id, text),
        Err(e) => tool_error_response(id, tool_name, &e),
    }
}

async fn run_go_to_definition<P>(
    server: &McpServer<P>,
    arguments: &Value,
) -> Result<String, QueryError>
where
    P: CodeIntelligenceProvider,
{
    let query = SymbolQuery::new(
        string_argument(arguments, "symbol"),
        string_argument(arguments, "uri"),
        integer_argument(arguments, "startLineNumber")?,
        integer_argument(arguments, "endLineNumber")?,
    )?;
    let uri = resolve_document_uri(query.uri(), server.workspace())?;
    let document = open_text_document(&uri).await?;
    let report = go_to_definition(server.provider(), &document, &query).await?;
    Ok(report.to_string())
}

async fn run_get_document_symbols<P>(
    server: &McpServer<P>,
    arguments: &Value,
) -> Result<String, QueryError>
where
    P: CodeIntelligenceProvider,
{
    let max_depth = match integer_argument(arguments, "maxDepth")? {
        None => None,
        Some(depth) => Some(u32::try_from(depth).map_err(|_| {
            QueryError::invalid_parameters("maxDepth must be a non-negative integer.")
        })?),
    };
    let query = OutlineQuery::new(string_argument(arguments, "uri"), max_depth)?;
    let uri = resolve_document_uri(query.uri(), server.workspace())?;
    // Fail with `file_not_found` before the provider is involved.
    open_text_document(&uri).await?;
    let nodes = document_outline(
        server.provider(),
        &uri,
        query.max_depth(),
        server.hover_strategy(),
    )
    .await?;
    render_outline(query.uri(), &nodes)
}

fn string_argument<'a>(arguments: &'a Value, key: &str) -> &'a str {
    arguments.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// Optional integer argument. `null` counts as absent; integral floats are accepted.
fn integer_argument(arguments: &Value, key: &str) -> Result<Option<i64>, QueryError> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            })
            .map(Some)
            .ok_or_else(|| QueryError::invalid_parameters(format!("{key} must be an integer."))),
    }
}
