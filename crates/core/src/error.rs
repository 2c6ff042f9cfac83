//! Error types for the sandeval domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all sandeval operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Structurally broken model output ---
    /// The model requested a tool call whose arguments are not a JSON object.
    /// Fatal for the whole run, unlike a failing tool execution.
    #[error("Malformed arguments for tool '{tool_name}': {reason}")]
    MalformedToolArguments {
        tool_name: String,
        arguments: String,
        reason: String,
    },
}

impl Error {
    /// Short, stable name of the error variant, used in failed task results.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Provider(_) => "ProviderError",
            Self::MalformedToolArguments { .. } => "MalformedToolArguments",
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("Tool transport error: {0}")]
    Transport(String),

    #[error("Tool server returned error {code}: {message}")]
    Remote { code: i64, message: String },
}

impl ToolError {
    /// Short name of the failure class, reported back to the model.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::Timeout { .. } => "Timeout",
            Self::Transport(_) => "TransportError",
            Self::Remote { .. } => "RemoteError",
        }
    }
}
