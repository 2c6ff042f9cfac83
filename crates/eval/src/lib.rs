//! Evaluation of an agent against a task file.
//!
//! Tasks run one after another through an [`sandeval_agent::AgentRunner`].
//! Each produces a [`TaskResult`], whether the run succeeded or not, and the
//! batch is summarised in an [`EvalSummary`].

pub mod runner;
pub mod scoring;
pub mod task;

pub use runner::{EvalReport, EvalSummary, Evaluator, TaskResult};
pub use scoring::{ScoringPolicy, score};
pub use task::{EvalTask, TaskFile, TaskFileError};
