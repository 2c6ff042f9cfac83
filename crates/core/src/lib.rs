//! # sandeval core
//!
//! Domain types, traits, and error definitions for the sandeval agent
//! evaluation harness. This crate has **no transport dependencies**: it
//! defines the transcript, the chat-completion seam and the tool-invocation
//! seam that every other crate implements against.
//!
//! ## Seams
//!
//! - [`Provider`]: "send the transcript, get one assistant message back".
//! - [`ToolInvoker`]: "run a named tool with a JSON object of arguments".
//!
//! Both are object-safe async traits so the agent loop can be driven by a
//! remote backend in production and by scripted mocks in tests.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Message, MessageToolCall, Role, Transcript};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolChoice, ToolDefinition};
pub use tool::{ContentBlock, NoTools, ToolArguments, ToolContent, ToolExecutionResult, ToolInvoker};
