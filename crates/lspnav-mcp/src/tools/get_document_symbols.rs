use super::{ConfirmationPrompt, ToolDefinition, argument_text};
use lspnav_core::constants;
use serde_json::{Value, json};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: constants::TOOL_GET_DOCUMENT_SYMBOLS.into(),
        description: "Return the nested symbol outline of a document with kind, line numbers and hover information for each symbol.".into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "uri": {
                    "type": "string",
                    "description": "Document URI (file:///...) or file path; relative paths resolve against the workspace"
                },
                "maxDepth": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Deepest nesting level to include; 0 returns top-level symbols only. Default: unlimited"
                }
            },
            "required": ["uri"]
        }),
    }
}

pub fn confirmation(arguments: &Value) -> ConfirmationPrompt {
    let uri = argument_text(arguments, "uri");
    ConfirmationPrompt {
        title: "Get document symbols".into(),
        message: format!("Get document symbols for {uri}?"),
        invocation_message: format!("Getting document symbols for {uri}"),
    }
}
