//! MCP server implementation for filesearch
//!
//! Runs as a stdio JSON-RPC server for Claude Code integration. One request
//! per line in, one response per line out; no state is shared between calls.

use anyhow::Result;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

use crate::core::search::{self, SearchOptions};

use super::protocol::*;

pub struct McpServer;

impl McpServer {
    pub fn new() -> Self {
        Self
    }

    /// Run the MCP server (blocking, reads from stdin, writes to stdout)
    pub fn run(&self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            // Parse JSON-RPC request
            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    let response =
                        JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e));
                    self.write_response(&mut stdout, &response)?;
                    continue;
                }
            };

            // Notifications carry no id and expect no reply
            if request.id.is_none() && request.method.starts_with("notifications/") {
                continue;
            }

            // Handle the request
            let response = self.handle_request(request);
            self.write_response(&mut stdout, &response)?;
        }

        Ok(())
    }

    fn write_response(&self, stdout: &mut io::Stdout, response: &JsonRpcResponse) -> Result<()> {
        let json = serde_json::to_string(response)?;
        writeln!(stdout, "{}", json)?;
        stdout.flush()?;
        Ok(())
    }

    fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "initialized" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: "2024-11-05".to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "filesearch".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools = vec![ToolDefinition {
            name: "search_file".to_string(),
            description: "Search for a keyword or pattern within a file. Returns line numbers, context, and match details.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filePath": {
                        "type": "string",
                        "description": "The path to the file to search in (absolute or relative)"
                    },
                    "keyword": {
                        "type": "string",
                        "description": "The keyword or regex pattern to search for. Use regex syntax for pattern matching (e.g., \"^import\" for lines starting with import)"
                    },
                    "caseSensitive": {
                        "type": "boolean",
                        "description": "Whether the search should be case-sensitive (default: false)",
                        "default": false
                    },
                    "contextLines": {
                        "type": "number",
                        "description": "Number of context lines to include before and after each match (default: 2)",
                        "default": 2
                    }
                },
                "required": ["filePath", "keyword"]
            }),
        }];

        let result = ToolsListResult { tools };
        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params = match params {
            Some(p) => p,
            None => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params".to_string());
            }
        };

        let call: ToolCallParams = match serde_json::from_value(params) {
            Ok(c) => c,
            Err(e) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {}", e));
            }
        };

        let result = match call.name.as_str() {
            "search_file" => self.execute_search_file(call.arguments),
            _ => {
                // Calling an unregistered tool is a protocol fault, not a tool failure
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Unknown tool: {}", call.name),
                );
            }
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    fn execute_search_file(&self, args: Option<Value>) -> ToolCallResult {
        let args = match args {
            Some(a) => a,
            None => return ToolCallResult::error("Error: Missing arguments".to_string()),
        };

        let file_path = match args.get("filePath").and_then(|v| v.as_str()) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => {
                return ToolCallResult::error(
                    "Error: Missing required 'filePath' argument".to_string(),
                )
            }
        };

        let keyword = match args.get("keyword").and_then(|v| v.as_str()) {
            Some(k) if !k.is_empty() => k.to_string(),
            _ => {
                return ToolCallResult::error(
                    "Error: Missing required 'keyword' argument".to_string(),
                )
            }
        };

        let options = SearchOptions {
            case_sensitive: args
                .get("caseSensitive")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            context_lines: args
                .get("contextLines")
                .and_then(|v| v.as_u64())
                .unwrap_or(2) as usize,
        };

        match search::search(&file_path, &keyword, &options) {
            Ok(result) => match serde_json::to_string_pretty(&result) {
                Ok(text) => ToolCallResult::success(text),
                Err(e) => ToolCallResult::error(format!("Error: {}", e)),
            },
            Err(e) => ToolCallResult::error(format!("Error: {}", e)),
        }
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the server until stdin closes or the process is told to stop.
///
/// The blocking read loop lives on its own thread; SIGINT and SIGTERM win
/// the race against it and exit the process with status 0.
pub async fn run_until_shutdown(server: McpServer) -> Result<()> {
    eprintln!("[mcp] File search server running on stdio");

    let reader = tokio::task::spawn_blocking(move || server.run());

    tokio::select! {
        result = reader => result??,
        _ = shutdown_signal() => {
            eprintln!("[mcp] Shutting down");
            // The reader thread may still be parked in read(2), and dropping
            // the runtime would wait on it, so leave directly.
            std::process::exit(0);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    fn call_search_file(server: &McpServer, arguments: Value) -> JsonRpcResponse {
        server.handle_request(request(
            "tools/call",
            Some(json!({ "name": "search_file", "arguments": arguments })),
        ))
    }

    #[test]
    fn test_initialize_reports_tool_capability() {
        let server = McpServer::new();
        let response = server.handle_request(request("initialize", None));

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(result["serverInfo"]["name"], "filesearch");
        assert!(response.error.is_none());
    }

    #[test]
    fn test_tools_list_advertises_search_file() {
        let server = McpServer::new();
        let response = server.handle_request(request("tools/list", None));

        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);

        let tool = &tools[0];
        assert_eq!(tool["name"], "search_file");
        assert_eq!(
            tool["inputSchema"]["required"],
            json!(["filePath", "keyword"])
        );
        assert_eq!(
            tool["inputSchema"]["properties"]["caseSensitive"]["default"],
            false
        );
        assert_eq!(
            tool["inputSchema"]["properties"]["contextLines"]["default"],
            2
        );
    }

    #[test]
    fn test_tools_call_returns_match_report() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("sample.rs");
        fs::write(&file, "fn main() {\n    println!(\"hello\");\n}\n").unwrap();

        let server = McpServer::new();
        let response = call_search_file(
            &server,
            json!({
                "filePath": file.to_str().unwrap(),
                "keyword": "println",
                "contextLines": 1
            }),
        );

        let result = response.result.unwrap();
        assert!(result.get("isError").is_none());
        assert_eq!(result["content"][0]["type"], "text");

        // The payload is the structured report rendered as indented JSON
        let text = result["content"][0]["text"].as_str().unwrap();
        let report: Value = serde_json::from_str(text).unwrap();
        assert_eq!(report["totalMatches"], 1);
        assert_eq!(report["matches"][0]["lineNumber"], 2);
        assert_eq!(report["matches"][0]["matchIndex"], 4);
        assert_eq!(report["context"].as_array().unwrap().len(), 3);
        assert_eq!(report["context"][1]["isMatch"], true);
    }

    #[test]
    fn test_missing_file_is_tool_error_not_request_error() {
        let server = McpServer::new();
        let response = call_search_file(
            &server,
            json!({ "filePath": "/no/such/file.txt", "keyword": "x" }),
        );

        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error: File not found:"));
    }

    #[test]
    fn test_missing_required_argument_is_tool_error() {
        let server = McpServer::new();
        let response = call_search_file(&server, json!({ "filePath": "/tmp/f.txt" }));

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "Error: Missing required 'keyword' argument"
        );

        let response = call_search_file(&server, json!({ "keyword": "x" }));
        assert_eq!(
            response.result.unwrap()["content"][0]["text"],
            "Error: Missing required 'filePath' argument"
        );
    }

    #[test]
    fn test_unknown_tool_fails_the_request() {
        let server = McpServer::new();
        let response = server.handle_request(request(
            "tools/call",
            Some(json!({ "name": "delete_file", "arguments": {} })),
        ));

        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.message, "Unknown tool: delete_file");
    }

    #[test]
    fn test_tools_call_without_params_is_invalid() {
        let server = McpServer::new();
        let response = server.handle_request(request("tools/call", None));

        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.message, "Missing params");
    }

    #[test]
    fn test_unknown_method_not_found() {
        let server = McpServer::new();
        let response = server.handle_request(request("resources/list", None));

        let error = response.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert_eq!(error.message, "Method not found: resources/list");
    }

    #[test]
    fn test_ping_returns_empty_result() {
        let server = McpServer::new();
        let response = server.handle_request(request("ping", None));

        assert_eq!(response.result.unwrap(), json!({}));
    }

    #[test]
    fn test_tool_error_keeps_server_usable() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "alpha\nbeta\n").unwrap();

        let server = McpServer::new();

        let failed = call_search_file(
            &server,
            json!({ "filePath": "/no/such/file.txt", "keyword": "alpha" }),
        );
        assert_eq!(failed.result.unwrap()["isError"], true);

        let ok = call_search_file(
            &server,
            json!({ "filePath": file.to_str().unwrap(), "keyword": "alpha" }),
        );
        let result = ok.result.unwrap();
        assert!(result.get("isError").is_none());
    }
}
