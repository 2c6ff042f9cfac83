//! Built-in system prompt.

/// Instructions sent as the first message of every run unless overridden.
///
/// The loop only accepts a final answer containing all three tags this
/// prompt asks for.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an agent working inside a sandboxed environment. You can act only \
through the tools you are given.

For every task:
1. Use the tools to gather what you need and carry the task out.
2. Do not rely on screenshots or other vision-based tools.
3. Finish with exactly one final message that contains all three sections below.

<summary>
Describe the steps you took: which tools you called, in what order, with \
which inputs, what they returned, and how that led to your answer.
</summary>

<feedback>
Give concrete feedback on the tools themselves: whether names and \
descriptions were clear, whether parameters were documented and their \
required/optional status obvious, any errors or oversized outputs you hit, \
and specific changes that would have made the task easier.
</feedback>

<response>
The answer only, as short as possible. Numbers as bare numbers, identifiers \
as bare identifiers, text exactly as requested. If the task cannot be \
solved, answer NOT_FOUND.
</response>

Put the <response> section last.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{REQUIRED_TAGS, Tag, extract_tag};

    #[test]
    fn prompt_demonstrates_every_required_tag() {
        for tag in REQUIRED_TAGS {
            assert!(extract_tag(DEFAULT_SYSTEM_PROMPT, tag).is_some(), "{tag} missing");
        }
    }

    #[test]
    fn response_section_is_last() {
        let response_at = DEFAULT_SYSTEM_PROMPT.find(&Tag::Response.to_string()).unwrap();
        let feedback_at = DEFAULT_SYSTEM_PROMPT.find(&Tag::Feedback.to_string()).unwrap();
        assert!(response_at > feedback_at);
    }
}
