//! Answer scoring.

use regex_lite::RegexBuilder;
use serde::{Deserialize, Serialize};

/// How an expected answer is compared with the extracted response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// The expected answer is a pattern searched anywhere in the response,
    /// with `.` matching newlines. A pattern that does not compile falls back
    /// to exact comparison.
    #[default]
    Regex,
    /// The response must equal the expected answer.
    Exact,
}

/// Score a response: 1 on a match, 0 otherwise. A missing or empty response scores 0.
pub fn score(policy: ScoringPolicy, expected: &str, actual: Option<&str>) -> u8 {
    let Some(actual) = actual.filter(|a| !a.is_empty()) else {
        return 0;
    };

    let matched = match policy {
        ScoringPolicy::Exact => actual == expected,
        ScoringPolicy::Regex => match RegexBuilder::new(expected)
            .dot_matches_new_line(true)
            .build()
        {
            Ok(re) => re.is_match(actual),
            Err(e) => {
                tracing::debug!(
                    pattern = expected,
                    error = %e,
                    "Invalid answer pattern, comparing exactly"
                );
                actual == expected
            }
        },
    };
    u8::from(matched)
}
