use super::*;
use crate::protocol::INVALID_PARAMS;
use crate::test_support::{StaticProvider, fixture_provider, write_fixture};
use serde_json::json;

fn make_request(id: i64, method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".into(),
        id: Some(json!(id)),
        method: method.into(),
        params,
    }
}

fn tool_call(id: i64, name: &str, arguments: Value) -> JsonRpcRequest {
    make_request(id, "tools/call", json!({"name": name, "arguments": arguments}))
}

fn text_of(response: &JsonRpcResponse) -> String {
    let result = response.result.as_ref().expect("tool call should succeed");
    result["content"][0]["text"].as_str().unwrap().to_string()
}

fn error_data_code(response: &JsonRpcResponse) -> String {
    let error = response.error.as_ref().expect("expected an error response");
    error.data.as_ref().unwrap()["code"]
        .as_str()
        .unwrap()
        .to_string()
}

fn empty_server(workspace: &Path) -> McpServer<StaticProvider> {
    McpServer::new(StaticProvider::default(), workspace, HoverStrategy::default())
}

#[tokio::test]
async fn initialize_reports_protocol_version_and_tools_capability() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    let response = server
        .handle_request(&make_request(1, "initialize", json!({})))
        .await
        .unwrap();
    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], constants::MCP_PROTOCOL_VERSION);
    assert!(result["capabilities"]["tools"].is_object());
    assert_eq!(result["serverInfo"]["name"], "lspnav");
    assert_eq!(response.id, Some(json!(1)));
}

#[tokio::test]
async fn tools_list_returns_both_navigation_tools() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    let response = server
        .handle_request(&make_request(2, "tools/list", json!({})))
        .await
        .unwrap();
    let result = response.result.unwrap();
    let names: Vec<&str> = result["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["go-to-definition", "get-document-symbols"]);
}

#[tokio::test]
async fn notifications_get_no_response() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    let response = server
        .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    let response = server
        .handle_request(&make_request(3, "resources/list", json!({})))
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_parse_error() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    let response = server.handle_message("{not json").await.unwrap();
    assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    assert_eq!(response.id, None);
}

#[tokio::test]
async fn prepare_returns_confirmation_prompt() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    let response = server
        .handle_request(&make_request(
            4,
            "tools/prepare",
            json!({"name": "go-to-definition", "arguments": {"symbol": "greet", "uri": "a.ts"}}),
        ))
        .await
        .unwrap();
    let result = response.result.unwrap();
    assert_eq!(result["title"], "Go to definition of symbol");
    assert_eq!(result["invocationMessage"], "Going to definition of symbol greet");

    let unknown = server
        .handle_request(&make_request(5, "tools/prepare", json!({"name": "nope"})))
        .await
        .unwrap();
    assert_eq!(unknown.error.unwrap().code, METHOD_NOT_FOUND);
}

#[tokio::test]
async fn go_to_definition_resolves_relative_path_against_workspace() {
    let tmp = tempfile::tempdir().unwrap();
    let uri = write_fixture(tmp.path());
    let path = uri.to_file_path().unwrap();
    let server = McpServer::new(fixture_provider(&uri), tmp.path(), HoverStrategy::default());

    let response = server
        .handle_request(&tool_call(
            6,
            "go-to-definition",
            json!({"symbol": "greet", "uri": "greet.ts", "startLineNumber": 3}),
        ))
        .await
        .unwrap();
    let text = text_of(&response);
    assert!(text.starts_with("`greet` from\n\n```typescript\ngreet.ts:2-"), "{text}");
    assert!(text.contains("\ngreet();\n"), "{text}");
    assert!(
        text.ends_with(&format!("is defined at {}:1", path.display())),
        "{text}"
    );
}

#[tokio::test]
async fn go_to_definition_reports_symbol_outside_range() {
    let tmp = tempfile::tempdir().unwrap();
    let uri = write_fixture(tmp.path());
    let server = McpServer::new(fixture_provider(&uri), tmp.path(), HoverStrategy::default());

    let response = server
        .handle_request(&tool_call(
            7,
            "go-to-definition",
            json!({"symbol": "greet", "uri": uri.as_str(), "startLineNumber": 2, "endLineNumber": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(
        text_of(&response),
        format!("greet not found in {} lines 2-2", uri.as_str())
    );
}

#[tokio::test]
async fn missing_symbol_is_invalid_params() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    let response = server
        .handle_request(&tool_call(8, "go-to-definition", json!({"uri": "a.ts"})))
        .await
        .unwrap();
    assert_eq!(response.error.as_ref().unwrap().code, INVALID_PARAMS);
    assert_eq!(error_data_code(&response), "invalid_input");
}

#[tokio::test]
async fn non_integer_line_numbers_are_invalid_params() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    let response = server
        .handle_request(&tool_call(
            9,
            "go-to-definition",
            json!({"symbol": "greet", "uri": "a.ts", "startLineNumber": "one"}),
        ))
        .await
        .unwrap();
    assert_eq!(error_data_code(&response), "invalid_input");

    let response = server
        .handle_request(&tool_call(
            10,
            "get-document-symbols",
            json!({"uri": "a.ts", "maxDepth": -1}),
        ))
        .await
        .unwrap();
    assert_eq!(error_data_code(&response), "invalid_input");
}

#[tokio::test]
async fn missing_document_is_file_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    for request in [
        tool_call(11, "go-to-definition", json!({"symbol": "x", "uri": "absent.ts"})),
        tool_call(12, "get-document-symbols", json!({"uri": "absent.ts"})),
    ] {
        let response = server.handle_request(&request).await.unwrap();
        assert_eq!(error_data_code(&response), "file_not_found");
    }
}

#[tokio::test]
async fn provider_failure_is_provider_error() {
    let tmp = tempfile::tempdir().unwrap();
    let uri = write_fixture(tmp.path());
    let provider = StaticProvider {
        failing: true,
        ..StaticProvider::default()
    };
    let server = McpServer::new(provider, tmp.path(), HoverStrategy::default());
    let response = server
        .handle_request(&tool_call(
            13,
            "get-document-symbols",
            json!({"uri": uri.as_str()}),
        ))
        .await
        .unwrap();
    assert_eq!(error_data_code(&response), "provider_error");
}

#[tokio::test]
async fn unknown_tool_is_reported_canonically() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    let response = server
        .handle_request(&tool_call(14, "search_code", json!({})))
        .await
        .unwrap();
    assert_eq!(response.error.as_ref().unwrap().code, METHOD_NOT_FOUND);
    assert_eq!(error_data_code(&response), "unknown_tool");
}

#[tokio::test]
async fn document_symbols_render_outline_json() {
    let tmp = tempfile::tempdir().unwrap();
    let uri = write_fixture(tmp.path());
    let server = McpServer::new(fixture_provider(&uri), tmp.path(), HoverStrategy::default());

    let response = server
        .handle_request(&tool_call(
            15,
            "get-document-symbols",
            json!({"uri": "greet.ts", "maxDepth": 0}),
        ))
        .await
        .unwrap();
    let text = text_of(&response);
    let body = text
        .strip_prefix("Symbols for greet.ts:\n\n```json\n")
        .and_then(|rest| rest.strip_suffix("\n```"))
        .expect("outline is a fenced json block");
    let nodes: Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        nodes,
        json!([{
            "name": "greet",
            "kind": "Function",
            "hoverInformation": "function greet(): void",
            "locationLineNumber": 1,
            "definitionStartLineNumber": 1,
            "definitionEndLineNumber": 1
        }])
    );
}

#[tokio::test]
async fn serve_lines_answers_each_request_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let server = empty_server(tmp.path());
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
        "\n\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
    );
    let mut output = Vec::new();
    serve_lines(&server, input.as_bytes(), &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"], json!({}));
    assert_eq!(responses[1]["id"], 2);
    assert!(responses[1]["result"]["tools"].is_array());
}
