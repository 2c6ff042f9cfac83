//! Tool execution backends for sandeval.
//!
//! The only production backend is [`McpSession`], a client for a sandbox
//! server speaking MCP over streamable HTTP. Without a sandbox the harness
//! falls back to `sandeval_core::NoTools`.

pub mod mcp;

pub use mcp::{FILE_OPERATIONS_TOOL, McpSession, PROTOCOL_VERSION};
