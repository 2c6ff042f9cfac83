//! Tool metrics data model and the recorder that accumulates it.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One recorded invocation of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Decoded arguments the model passed.
    #[serde(rename = "args")]
    pub arguments: serde_json::Map<String, serde_json::Value>,
    /// Wall-clock duration in seconds.
    pub duration: f64,
    /// When the call was dispatched.
    pub timestamp: DateTime<Utc>,
}

/// Aggregated metrics for a single tool name.
///
/// Only grows through [`MetricsRecorder::record`], which keeps
/// `durations.len() == calls.len() == count`. Deserializing checks the same.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawToolMetrics")]
pub struct ToolMetrics {
    count: usize,
    durations: Vec<f64>,
    calls: Vec<ToolCallRecord>,
}

impl ToolMetrics {
    /// Number of invocations.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Per-call durations in seconds, in invocation order.
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Per-call records, in invocation order.
    pub fn calls(&self) -> &[ToolCallRecord] {
        &self.calls
    }

    /// Sum of all call durations in seconds.
    pub fn total_duration(&self) -> f64 {
        self.durations.iter().sum()
    }

    fn push(&mut self, record: ToolCallRecord) {
        self.count += 1;
        self.durations.push(record.duration);
        self.calls.push(record);
    }
}

#[derive(Deserialize)]
struct RawToolMetrics {
    count: usize,
    durations: Vec<f64>,
    calls: Vec<ToolCallRecord>,
}

impl TryFrom<RawToolMetrics> for ToolMetrics {
    type Error = String;

    fn try_from(raw: RawToolMetrics) -> Result<Self, Self::Error> {
        if raw.durations.len() != raw.count || raw.calls.len() != raw.count {
            return Err(format!(
                "inconsistent tool metrics: count {}, {} durations, {} calls",
                raw.count,
                raw.durations.len(),
                raw.calls.len()
            ));
        }
        Ok(Self {
            count: raw.count,
            durations: raw.durations,
            calls: raw.calls,
        })
    }
}

/// A call record tagged with the tool it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry<'a> {
    pub tool_name: &'a str,
    pub record: &'a ToolCallRecord,
}

/// Metrics keyed by tool name, in order of each tool's first invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsSnapshot(IndexMap<String, ToolMetrics>);

impl MetricsSnapshot {
    pub fn get(&self, tool_name: &str) -> Option<&ToolMetrics> {
        self.0.get(tool_name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct tools invoked.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ToolMetrics)> {
        self.0.iter().map(|(name, m)| (name.as_str(), m))
    }

    /// Tool names in first-invocation order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }

    /// Total invocations across all tools.
    pub fn total_calls(&self) -> usize {
        self.0.values().map(|m| m.count).sum()
    }

    /// Every call across all tools, ordered by dispatch time.
    ///
    /// Ties keep first-invocation order of the tool, then call order.
    pub fn timeline(&self) -> Vec<TimelineEntry<'_>> {
        let mut entries: Vec<_> = self
            .0
            .iter()
            .flat_map(|(name, m)| {
                m.calls.iter().map(move |record| TimelineEntry {
                    tool_name: name.as_str(),
                    record,
                })
            })
            .collect();
        entries.sort_by_key(|e| e.record.timestamp);
        entries
    }
}

/// Accumulates [`ToolMetrics`] for one agent run.
///
/// Owned by a single run; the loop is sequential, so no locking.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    tools: MetricsSnapshot,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one invocation of `tool_name`, creating its entry on first use.
    pub fn record(
        &mut self,
        tool_name: &str,
        duration: Duration,
        arguments: serde_json::Map<String, serde_json::Value>,
        timestamp: DateTime<Utc>,
    ) {
        let record = ToolCallRecord {
            arguments,
            duration: duration.as_secs_f64(),
            timestamp,
        };
        tracing::trace!(tool = tool_name, duration_s = record.duration, "Recorded tool call");
        self.tools
            .0
            .entry(tool_name.to_string())
            .or_default()
            .push(record);
    }

    /// A copy of everything recorded so far.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.tools.clone()
    }

    /// Consume the recorder, handing its metrics to the caller.
    pub fn into_snapshot(self) -> MetricsSnapshot {
        self.tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn record_creates_entry_lazily() {
        let mut rec = MetricsRecorder::new();
        assert!(rec.snapshot().is_empty());

        let expr = args(serde_json::json!({"expr": "2+2"}));
        rec.record("calc", Duration::from_millis(250), expr, at(0));

        let snap = rec.snapshot();
        let calc = snap.get("calc").unwrap();
        assert_eq!(calc.count(), 1);
        assert!((calc.durations()[0] - 0.25).abs() < 1e-9);
        assert_eq!(calc.calls()[0].arguments["expr"], "2+2");
        assert_eq!(calc.calls()[0].timestamp, at(0));
    }

    #[test]
    fn lengths_stay_consistent() {
        let mut rec = MetricsRecorder::new();
        for i in 0..5 {
            let duration = Duration::from_millis(10 * i);
            rec.record("shell", duration, serde_json::Map::new(), at(i as i64));
        }
        rec.record("file", Duration::from_millis(3), serde_json::Map::new(), at(9));

        for (_, m) in rec.snapshot().iter() {
            assert_eq!(m.durations().len(), m.count());
            assert_eq!(m.calls().len(), m.count());
            for (d, c) in m.durations().iter().zip(m.calls()) {
                assert_eq!(*d, c.duration);
            }
        }
        assert_eq!(rec.snapshot().total_calls(), 6);
    }

    #[test]
    fn keys_keep_first_occurrence_order() {
        let mut rec = MetricsRecorder::new();
        rec.record("zeta", Duration::ZERO, serde_json::Map::new(), at(0));
        rec.record("alpha", Duration::ZERO, serde_json::Map::new(), at(1));
        rec.record("zeta", Duration::ZERO, serde_json::Map::new(), at(2));
        assert_eq!(rec.into_snapshot().tool_names(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn timeline_is_chronological_across_tools() {
        let mut rec = MetricsRecorder::new();
        rec.record("read", Duration::ZERO, serde_json::Map::new(), at(0));
        rec.record("write", Duration::ZERO, serde_json::Map::new(), at(1));
        rec.record("read", Duration::ZERO, serde_json::Map::new(), at(2));

        let snap = rec.snapshot();
        let order: Vec<_> = snap.timeline().iter().map(|e| e.tool_name).collect();
        assert_eq!(order, vec!["read", "write", "read"]);
    }

    #[test]
    fn snapshot_serializes_as_plain_mapping() {
        let mut rec = MetricsRecorder::new();
        rec.record("calc", Duration::from_secs(1), args(serde_json::json!({"expr": "1"})), at(0));
        let json = serde_json::to_value(rec.snapshot()).unwrap();
        assert_eq!(json["calc"]["count"], 1);
        assert_eq!(json["calc"]["durations"][0], 1.0);
        assert_eq!(json["calc"]["calls"][0]["args"]["expr"], "1");
    }

    #[test]
    fn deserializing_keeps_lengths_consistent() {
        let mut rec = MetricsRecorder::new();
        rec.record("calc", Duration::from_secs(1), serde_json::Map::new(), at(0));
        let json = serde_json::to_value(rec.snapshot()).unwrap();
        let back: MetricsSnapshot = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, rec.into_snapshot());

        let mut skewed = json;
        skewed["calc"]["count"] = serde_json::json!(2);
        let err = serde_json::from_value::<MetricsSnapshot>(skewed).unwrap_err();
        assert!(err.to_string().contains("inconsistent tool metrics"));

        let missing_call =
            serde_json::json!({"calc": {"count": 1, "durations": [1.0], "calls": []}});
        assert!(serde_json::from_value::<MetricsSnapshot>(missing_call).is_err());
    }
}
