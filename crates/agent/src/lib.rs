//! The tool-calling agent loop.
//!
//! One run follows a **Prompt → Act → Validate** cycle:
//!
//! 1. **Seed** the transcript with the system prompt and the task
//! 2. **Send** the full transcript and tool catalog to the model
//! 3. **If tool calls**: dispatch them one by one, append results, loop back to step 2
//! 4. **If text**: check the tagged-answer contract; on a miss, append a
//!    correction and loop back to step 2
//!
//! Every model round counts against one iteration budget. When it runs out
//! the run ends as [`Termination::Exhausted`] instead of failing.

pub mod loop_runner;
pub mod runner;
pub mod system_prompt;
pub mod tags;

pub use loop_runner::{AgentLoop, AgentRun, LoopState, Termination};
pub use runner::AgentRunner;
pub use system_prompt::DEFAULT_SYSTEM_PROMPT;
pub use tags::{REQUIRED_TAGS, Tag, correction_message, extract_tag, missing_tags};
