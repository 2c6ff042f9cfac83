//! Task files.
//!
//! ```toml
//! scoring = "regex"   # or "exact"; optional
//!
//! [[tasks]]
//! prompt = "What is 2+2?"
//! response = "^4$"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::scoring::ScoringPolicy;

/// One prompt and the answer it should produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalTask {
    pub prompt: String,

    /// Expected answer, interpreted according to the file's [`ScoringPolicy`]
    #[serde(rename = "response")]
    pub expected: String,
}

/// A parsed task file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFile {
    #[serde(default)]
    pub scoring: ScoringPolicy,

    #[serde(default)]
    pub tasks: Vec<EvalTask>,
}

impl TaskFile {
    pub fn load(path: &Path) -> Result<Self, TaskFileError> {
        let content = std::fs::read_to_string(path).map_err(|e| TaskFileError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let file = Self::parse(&content).map_err(|e| match e {
            TaskFileError::ParseError { reason, .. } => TaskFileError::ParseError {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        tracing::info!(path = %path.display(), tasks = file.tasks.len(), "Loaded task file");
        Ok(file)
    }

    pub fn parse(content: &str) -> Result<Self, TaskFileError> {
        let file: Self = toml::from_str(content).map_err(|e| TaskFileError::ParseError {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;

        if let Some(pos) = file.tasks.iter().position(|t| t.prompt.trim().is_empty()) {
            return Err(TaskFileError::InvalidTask {
                index: pos + 1,
                reason: "prompt is empty".into(),
            });
        }
        Ok(file)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TaskFileError {
    #[error("Failed to read task file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse task file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Task {index} is invalid: {reason}")]
    InvalidTask { index: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tasks_in_order() {
        let file = TaskFile::parse(
            r#"
            [[tasks]]
            prompt = "What is 2+2?"
            response = "4"

            [[tasks]]
            prompt = """
            Count the lines
            of /tmp/data.csv"""
            response = '^\d+$'
            "#,
        )
        .unwrap();

        assert_eq!(file.scoring, ScoringPolicy::Regex);
        assert_eq!(file.tasks.len(), 2);
        assert_eq!(file.tasks[0].expected, "4");
        assert!(file.tasks[1].prompt.contains("of /tmp/data.csv"));
        assert_eq!(file.tasks[1].expected, r"^\d+$");
    }

    #[test]
    fn scoring_policy_is_selectable() {
        let file = TaskFile::parse("scoring = \"exact\"\n").unwrap();
        assert_eq!(file.scoring, ScoringPolicy::Exact);
        assert!(file.tasks.is_empty());
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err = TaskFile::parse("[[tasks]]\nprompt = \"  \"\nresponse = \"x\"\n").unwrap_err();
        assert!(matches!(err, TaskFileError::InvalidTask { index: 1, .. }));
    }

    #[test]
    fn missing_response_is_a_parse_error() {
        let err = TaskFile::parse("[[tasks]]\nprompt = \"hi\"\n").unwrap_err();
        assert!(matches!(err, TaskFileError::ParseError { .. }));
    }

    #[test]
    fn load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        match TaskFile::load(&path).unwrap_err() {
            TaskFileError::ParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            TaskFile::load(&dir.path().join("missing.toml")).unwrap_err(),
            TaskFileError::ReadError { .. }
        ));
    }
}
