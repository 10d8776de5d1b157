use super::{ConfirmationPrompt, ToolDefinition, argument_text};
use lspnav_core::constants;
use serde_json::{Value, json};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: constants::TOOL_GO_TO_DEFINITION.into(),
        description: "Find where a symbol is defined. Searches for the first whole-word occurrence of the symbol within the given line range of the document, then asks the language server for its definition. Returns the surrounding lines and every definition location as path:line or path:start-end.".into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Exact symbol name to look up (case-sensitive, whole word)"
                },
                "uri": {
                    "type": "string",
                    "description": "Document URI (file:///...) or file path; relative paths resolve against the workspace"
                },
                "startLineNumber": {
                    "type": "integer",
                    "description": "First line to search, 1-based. Default: 1"
                },
                "endLineNumber": {
                    "type": "integer",
                    "description": "Last line to search, 1-based and inclusive. Default: last line"
                }
            },
            "required": ["symbol", "uri"]
        }),
    }
}

pub fn confirmation(arguments: &Value) -> ConfirmationPrompt {
    let symbol = argument_text(arguments, "symbol");
    ConfirmationPrompt {
        title: "Go to definition of symbol".into(),
        message: format!("Go to definition of symbol {symbol}?"),
        invocation_message: format!("Going to definition of symbol {symbol}"),
    }
}
