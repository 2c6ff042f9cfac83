//! Serial evaluation runner.

use std::sync::Arc;
use std::time::Instant;

use sandeval_agent::tags::{Tag, extract_tag};
use sandeval_agent::{AgentRunner, Termination};
use sandeval_core::provider::ToolDefinition;
use sandeval_telemetry::MetricsSnapshot;
use serde::Serialize;
use tracing::{info, warn};

use crate::scoring::{ScoringPolicy, score};
use crate::task::EvalTask;

const FAILURE_REASON_MAX_CHARS: usize = 100;

/// The outcome of one task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub prompt: String,
    pub expected: String,

    /// The last `<response>` region, or a `TASK_EXECUTION_ERROR` line when the run failed
    pub actual: Option<String>,

    /// 1 for a match, 0 otherwise
    pub score: u8,

    /// Wall-clock seconds for the whole task
    pub total_duration: f64,

    pub tool_calls: MetricsSnapshot,
    pub num_tool_calls: usize,
    pub summary: Option<String>,
    pub feedback: Option<String>,

    /// `None` when the run failed before terminating
    pub termination: Option<Termination>,
    pub iterations: u32,
}

impl TaskResult {
    pub fn is_correct(&self) -> bool {
        self.score > 0
    }

    /// One-line explanation for an incorrect result; `None` when correct.
    pub fn failure_reason(&self) -> Option<String> {
        if self.is_correct() {
            return None;
        }

        let first_line = |s: &str| {
            s.lines()
                .next()
                .unwrap_or_default()
                .chars()
                .take(FAILURE_REASON_MAX_CHARS)
                .collect::<String>()
        };

        let reason = match (&self.actual, &self.feedback) {
            (Some(actual), _) if actual.contains("ERROR") => first_line(actual),
            (_, Some(feedback)) if !feedback.is_empty() => first_line(feedback),
            _ => "Response mismatch".to_string(),
        };
        Some(reason)
    }
}

/// Aggregate statistics over a batch of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalSummary {
    pub correct: usize,
    pub total: usize,
    /// Percentage of correct results, 0.0 for an empty batch
    pub accuracy: f64,
    pub average_duration: f64,
    pub average_tool_calls: f64,
    pub total_tool_calls: usize,
}

impl EvalSummary {
    pub fn from_results(results: &[TaskResult]) -> Self {
        let total = results.len();
        let correct = results.iter().filter(|r| r.is_correct()).count();
        let total_tool_calls: usize = results.iter().map(|r| r.num_tool_calls).sum();
        let total_duration: f64 = results.iter().map(|r| r.total_duration).sum();

        let per_task = |sum: f64| if total == 0 { 0.0 } else { sum / total as f64 };

        Self {
            correct,
            total,
            accuracy: per_task(correct as f64 * 100.0),
            average_duration: per_task(total_duration),
            average_tool_calls: per_task(total_tool_calls as f64),
            total_tool_calls,
        }
    }
}

/// Everything a batch produced.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub summary: EvalSummary,
    pub results: Vec<TaskResult>,
}

/// Runs tasks one at a time through an agent with a fixed tool catalog.
pub struct Evaluator {
    agent: Arc<dyn AgentRunner>,
    tools: Vec<ToolDefinition>,
    policy: ScoringPolicy,
}

impl Evaluator {
    pub fn new(agent: Arc<dyn AgentRunner>, tools: Vec<ToolDefinition>) -> Self {
        Self {
            agent,
            tools,
            policy: ScoringPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run every task in order and summarise.
    pub async fn run(&self, tasks: &[EvalTask]) -> EvalReport {
        info!(tasks = tasks.len(), tools = self.tools.len(), "Starting evaluation");

        let mut results = Vec::with_capacity(tasks.len());
        for (index, task) in tasks.iter().enumerate() {
            info!(task = index + 1, total = tasks.len(), "Processing task");
            results.push(self.evaluate(task).await);
        }

        let summary = EvalSummary::from_results(&results);
        info!(
            correct = summary.correct,
            total = summary.total,
            accuracy = summary.accuracy,
            "Evaluation finished"
        );
        EvalReport { summary, results }
    }

    /// Run and score one task. A failed run becomes a zero-score result.
    pub async fn evaluate(&self, task: &EvalTask) -> TaskResult {
        let start = Instant::now();
        let outcome = self.agent.run(&task.prompt, &self.tools).await;
        let total_duration = start.elapsed().as_secs_f64();

        match outcome {
            Ok(run) => {
                let actual = extract_tag(&run.final_text, Tag::Response).map(str::to_string);
                let score = score(self.policy, &task.expected, actual.as_deref());
                TaskResult {
                    prompt: task.prompt.clone(),
                    expected: task.expected.clone(),
                    score,
                    total_duration,
                    num_tool_calls: run.metrics.total_calls(),
                    summary: extract_tag(&run.final_text, Tag::Summary).map(str::to_string),
                    feedback: extract_tag(&run.final_text, Tag::Feedback).map(str::to_string),
                    termination: Some(run.termination),
                    iterations: run.iterations,
                    tool_calls: run.metrics,
                    actual,
                }
            }
            Err(e) => {
                let kind = e.kind();
                warn!(kind, error = %e, "Task execution failed");
                TaskResult {
                    prompt: task.prompt.clone(),
                    expected: task.expected.clone(),
                    actual: Some(format!("TASK_EXECUTION_ERROR: {kind}: {e}")),
                    score: 0,
                    total_duration,
                    tool_calls: MetricsSnapshot::default(),
                    num_tool_calls: 0,
                    summary: Some(format!("Task execution failed with {kind}")),
                    feedback: Some(format!("Error during task execution: {e}")),
                    termination: None,
                    iterations: 0,
                }
            }
        }
    }
}
