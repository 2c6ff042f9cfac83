//! Tool invocation: the abstraction over whatever actually performs a
//! tool call (a remote sandbox session, or nothing at all).
//!
//! The agent loop only ever sees [`ToolInvoker`]. What comes back is folded
//! into a [`ToolExecutionResult`] and rendered to text exactly once, when
//! it is appended to the transcript.

use crate::error::ToolError;
use async_trait::async_trait;

/// Guidance appended to every failed tool result so the model tries something else.
pub const FAILURE_GUIDANCE: &str =
    "This tool is not available or encountered an error. Please try a different approach.";

/// A JSON object of tool arguments.
pub type ToolArguments = serde_json::Map<String, serde_json::Value>;

/// One block of tool output.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Plain text output.
    Text(String),
    /// Any other block (images, embedded resources), kept verbatim.
    Other(serde_json::Value),
}

impl ContentBlock {
    /// Interpret a `{"type": ..., ...}` content block.
    pub fn from_value(value: serde_json::Value) -> Self {
        let is_text = value.get("type").and_then(|t| t.as_str()) == Some("text");
        match value.get("text").and_then(|t| t.as_str()) {
            Some(text) if is_text => Self::Text(text.to_string()),
            _ => Self::Other(value),
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

/// Successful output of a tool invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolContent {
    /// Output blocks in the order the tool produced them
    pub blocks: Vec<ContentBlock>,

    /// The tool itself flagged the output as an error (the call still completed)
    pub is_error: bool,
}

impl ToolContent {
    /// Single text block output.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![ContentBlock::Text(text.into())],
            is_error: false,
        }
    }

    /// Output the tool reported as an in-band error.
    pub fn error_text(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![ContentBlock::Text(text.into())],
            is_error: true,
        }
    }

    fn render(&self) -> String {
        let body = self
            .blocks
            .iter()
            .map(ContentBlock::render)
            .collect::<Vec<_>>()
            .join("\n");
        let body = if body.is_empty() { "(no output)".to_string() } else { body };
        if self.is_error {
            format!("ERROR: Tool reported an error\n{body}")
        } else {
            body
        }
    }
}

/// What a single tool call produced, as seen by the agent loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolExecutionResult {
    /// The invoker returned output.
    Success(ToolContent),
    /// The invoker failed; the failure is reported to the model in-band.
    Failure { kind: String, message: String },
}

impl ToolExecutionResult {
    /// Fold an invoker result into the transcript-facing variant.
    pub fn from_invocation(result: std::result::Result<ToolContent, ToolError>) -> Self {
        match result {
            Ok(content) => Self::Success(content),
            Err(e) => Self::Failure {
                kind: e.kind().to_string(),
                message: e.to_string(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Text inserted into the `tool` message of the transcript.
    pub fn to_transcript_text(&self) -> String {
        match self {
            Self::Success(content) => content.render(),
            Self::Failure { kind, message } => format!(
                "ERROR: Tool execution failed\nType: {kind}\nMessage: {message}\n\n{FAILURE_GUIDANCE}"
            ),
        }
    }
}

/// The tool-execution capability consumed by the agent loop.
///
/// Implementations may fail freely; the loop converts every error into an
/// in-band [`ToolExecutionResult::Failure`] so one failing tool never aborts
/// a run.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Execute `tool_name` with an already-decoded argument object.
    async fn invoke(
        &self,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> std::result::Result<ToolContent, ToolError>;
}

/// The invoker used when no tool backend is configured: every call is a
/// [`ToolError::NotFound`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTools;

#[async_trait]
impl ToolInvoker for NoTools {
    async fn invoke(
        &self,
        tool_name: &str,
        _arguments: &ToolArguments,
    ) -> std::result::Result<ToolContent, ToolError> {
        Err(ToolError::NotFound(tool_name.to_string()))
    }
}
