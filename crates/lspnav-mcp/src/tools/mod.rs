pub mod get_document_symbols;
pub mod go_to_definition;

use lspnav_core::constants;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP tool definition for tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// What a host shows before running a tool, and while it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationPrompt {
    pub title: String,
    pub message: String,
    pub invocation_message: String,
}

/// Return all tool definitions.
pub fn list_tools() -> Vec<ToolDefinition> {
    vec![
        go_to_definition::definition(),
        get_document_symbols::definition(),
    ]
}

/// Confirmation prompt for a pending call, or `None` for an unknown tool.
pub fn confirmation_for(tool_name: &str, arguments: &Value) -> Option<ConfirmationPrompt> {
    match tool_name {
        constants::TOOL_GO_TO_DEFINITION => Some(go_to_definition::confirmation(arguments)),
        constants::TOOL_GET_DOCUMENT_SYMBOLS => Some(get_document_symbols::confirmation(arguments)),
        _ => None,
    }
}

/// Prompts interpolate raw argument text; absent values render empty.
fn argument_text<'a>(arguments: &'a Value, key: &str) -> &'a str {
    arguments.get(key).and_then(Value::as_str).unwrap_or_default()
}
