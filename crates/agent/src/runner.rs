//! Strategy seam for agent implementations.

use async_trait::async_trait;
use sandeval_core::Result;
use sandeval_core::provider::ToolDefinition;

use crate::loop_runner::{AgentLoop, AgentRun};

/// Anything that can take a task prompt plus a tool catalog and produce a run.
///
/// The evaluation runner only depends on this trait, so alternative agent
/// strategies can be swapped in without touching it.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, prompt: &str, tools: &[ToolDefinition]) -> Result<AgentRun>;
}

#[async_trait]
impl AgentRunner for AgentLoop {
    async fn run(&self, prompt: &str, tools: &[ToolDefinition]) -> Result<AgentRun> {
        AgentLoop::run(self, prompt, tools).await
    }
}
