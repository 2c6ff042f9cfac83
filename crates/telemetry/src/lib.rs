//! Per-tool execution metrics for sandeval agent runs.
//!
//! Every tool invocation an agent run performs is recorded here: how often
//! each tool ran, how long each call took, and with which arguments. The
//! snapshot is handed back to the caller at the end of the run and feeds
//! scoring and reporting.

pub mod metrics;

pub use metrics::{MetricsRecorder, MetricsSnapshot, TimelineEntry, ToolCallRecord, ToolMetrics};
