//! MCP client for a remote sandbox, over streamable HTTP.
//!
//! Every request is a JSON-RPC 2.0 message POSTed to a single endpoint. The
//! server answers either with a plain JSON body or with a short
//! `text/event-stream` whose `data:` lines carry the JSON-RPC response.
//! The session id the server hands out on `initialize` is echoed on every
//! later request and released with an HTTP DELETE on [`McpSession::close`].

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use sandeval_core::error::ToolError;
use sandeval_core::provider::ToolDefinition;
use sandeval_core::tool::{ContentBlock, ToolArguments, ToolContent, ToolInvoker};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// MCP protocol revision announced on `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Sandbox tool used to write files.
pub const FILE_OPERATIONS_TOOL: &str = "sandbox_file_operations";

const SESSION_HEADER: &str = "mcp-session-id";

/// An initialized session with one sandbox MCP server.
pub struct McpSession {
    url: String,
    client: reqwest::Client,
    session_id: Option<String>,
    next_id: AtomicI64,
    timeout_secs: u64,
}

impl McpSession {
    /// Connect to `url`, run the `initialize` handshake and confirm it with
    /// `notifications/initialized`.
    pub async fn connect(url: impl Into<String>, timeout: Duration) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ToolError::Transport(format!("Failed to create HTTP client: {e}")))?;

        let mut session = Self {
            url: url.into(),
            client,
            session_id: None,
            next_id: AtomicI64::new(1),
            timeout_secs: timeout.as_secs(),
        };

        let id = session.next_request_id();
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "initialize",
            "params": {
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": "sandeval",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }
        });

        let response = session.send(&request, "initialize").await?;
        session.session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let result = session.decode(response, id, "initialize").await?;

        session
            .notify("notifications/initialized", json!({}))
            .await?;

        info!(
            url = %session.url,
            session = session.session_id.as_deref().unwrap_or("-"),
            server = result["serverInfo"]["name"].as_str().unwrap_or("unknown"),
            "MCP session initialized"
        );

        Ok(session)
    }

    /// The session id assigned by the server, if it issued one.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Fetch the server's tool catalog.
    pub async fn list_tools(&self) -> Result<Vec<ToolDefinition>, ToolError> {
        let result = self.request("tools/list", json!({})).await?;

        let tools = result
            .get("tools")
            .and_then(|t| t.as_array())
            .map(|tools| {
                tools
                    .iter()
                    .filter_map(|tool| {
                        let name = tool.get("name")?.as_str()?.to_string();
                        Some(ToolDefinition {
                            name,
                            description: tool
                                .get("description")
                                .and_then(|d| d.as_str())
                                .unwrap_or("")
                                .to_string(),
                            parameters: tool
                                .get("inputSchema")
                                .filter(|s| s.is_object())
                                .cloned()
                                .unwrap_or_else(ToolDefinition::empty_schema),
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        debug!(count = tools.len(), "Discovered sandbox tools");
        Ok(tools)
    }

    /// The tool catalog offered to the model. A failed listing is logged and
    /// yields an empty catalog, so a run can still go ahead without tools.
    pub async fn tool_catalog(&self) -> Vec<ToolDefinition> {
        match self.list_tools().await {
            Ok(tools) => tools,
            Err(e) => {
                warn!(
                    url = %self.url,
                    error = %e,
                    "Failed to list sandbox tools, continuing without tools"
                );
                Vec::new()
            }
        }
    }

    /// Run `tools/call` for one tool.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: &ToolArguments,
    ) -> Result<ToolContent, ToolError> {
        let result = self
            .request(
                "tools/call",
                json!({ "name": name, "arguments": arguments }),
            )
            .await
            .map_err(|e| match e {
                ToolError::Timeout { timeout_secs, .. } => ToolError::Timeout {
                    tool_name: name.to_string(),
                    timeout_secs,
                },
                other => other,
            })?;

        let blocks = result
            .get("content")
            .and_then(|c| c.as_array())
            .map(|items| items.iter().cloned().map(ContentBlock::from_value).collect())
            .unwrap_or_default();

        Ok(ToolContent {
            blocks,
            is_error: result
                .get("isError")
                .and_then(|e| e.as_bool())
                .unwrap_or(false),
        })
    }

    /// Copy a local UTF-8 file into the sandbox at `remote_path`.
    ///
    /// Returns whether the write succeeded. Failures are logged, never raised.
    pub async fn upload_file(&self, local_path: &Path, remote_path: &str) -> bool {
        let content = match tokio::fs::read_to_string(local_path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %local_path.display(), error = %e, "Cannot read file for upload");
                return false;
            }
        };

        let bytes = content.len();
        let mut arguments = ToolArguments::new();
        arguments.insert("action".into(), json!("write"));
        arguments.insert("path".into(), json!(remote_path));
        arguments.insert("content".into(), json!(content));
        arguments.insert("encoding".into(), json!("utf-8"));

        match self.call_tool(FILE_OPERATIONS_TOOL, &arguments).await {
            Ok(output) if !output.is_error => {
                info!(
                    local = %local_path.display(),
                    remote = remote_path,
                    bytes,
                    "Uploaded file to sandbox"
                );
                true
            }
            Ok(output) => {
                let detail: Vec<_> = output
                    .blocks
                    .iter()
                    .filter_map(|b| match b {
                        ContentBlock::Text(t) => Some(t.as_str()),
                        ContentBlock::Other(_) => None,
                    })
                    .collect();
                warn!(remote = remote_path, detail = %detail.join("\n"), "Sandbox rejected upload");
                false
            }
            Err(e) => {
                warn!(remote = remote_path, error = %e, "Upload failed");
                false
            }
        }
    }

    /// End the session on the server.
    pub async fn close(&self) -> Result<(), ToolError> {
        let Some(session_id) = self.session_id.as_deref() else {
            return Ok(());
        };

        let response = self
            .client
            .delete(&self.url)
            .header(SESSION_HEADER, session_id)
            .send()
            .await
            .map_err(|e| ToolError::Transport(e.to_string()))?;

        // 405 means the server does not support explicit termination.
        let status = response.status();
        if !status.is_success() && status.as_u16() != 405 {
            return Err(ToolError::Transport(format!(
                "Session close returned HTTP {status}"
            )));
        }

        debug!(session = session_id, "MCP session closed");
        Ok(())
    }

    // --- JSON-RPC plumbing ---

    fn next_request_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ToolError> {
        let id = self.next_request_id();
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        let response = self.send(&body, method).await?;
        self.decode(response, id, method).await
    }

    async fn notify(&self, method: &str, params: Value) -> Result<(), ToolError> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        });
        self.send(&body, method).await.map(|_| ())
    }

    async fn send(&self, body: &Value, method: &str) -> Result<reqwest::Response, ToolError> {
        let mut builder = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json, text/event-stream")
            .json(body);
        if let Some(session_id) = &self.session_id {
            builder = builder.header(SESSION_HEADER, session_id);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ToolError::Timeout {
                    tool_name: method.to_string(),
                    timeout_secs: self.timeout_secs,
                }
            } else {
                ToolError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ToolError::Transport(format!(
                "{method} returned HTTP {status}: {text}"
            )));
        }
        Ok(response)
    }

    async fn decode(
        &self,
        response: reqwest::Response,
        id: i64,
        method: &str,
    ) -> Result<Value, ToolError> {
        let is_stream = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("text/event-stream"));
        let text = response
            .text()
            .await
            .map_err(|e| ToolError::Transport(e.to_string()))?;

        let message = if is_stream {
            find_in_event_stream(&text, id).ok_or_else(|| {
                ToolError::Transport(format!(
                    "{method}: no response for request {id} in event stream"
                ))
            })?
        } else {
            serde_json::from_str::<Value>(&text)
                .map_err(|e| ToolError::Transport(format!("{method}: invalid JSON: {e}")))?
        };

        into_result(message)
    }
}

#[async_trait]
impl ToolInvoker for McpSession {
    async fn invoke(
        &self,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> Result<ToolContent, ToolError> {
        self.call_tool(tool_name, arguments).await
    }
}

/// Split an SSE body into events and return the JSON-RPC message answering `id`.
fn find_in_event_stream(body: &str, id: i64) -> Option<Value> {
    let mut data = String::new();
    let mut messages = Vec::new();

    for line in body.lines().chain(std::iter::once("")) {
        if line.is_empty() {
            if !data.is_empty() {
                if let Ok(value) = serde_json::from_str::<Value>(&data) {
                    messages.push(value);
                }
                data.clear();
            }
        } else if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }

    messages
        .into_iter()
        .find(|m| m.get("id").and_then(|v| v.as_i64()) == Some(id))
}

/// Unwrap a JSON-RPC response into its `result`, mapping `error` to [`ToolError::Remote`].
fn into_result(mut message: Value) -> Result<Value, ToolError> {
    if let Some(error) = message.get("error") {
        return Err(ToolError::Remote {
            code: error.get("code").and_then(|c| c.as_i64()).unwrap_or(0),
            message: error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string(),
        });
    }
    Ok(message
        .get_mut("result")
        .map(Value::take)
        .unwrap_or(Value::Null))
}
