//! The tagged-answer contract.
//!
//! A final answer carries three regions, `<summary>…</summary>`,
//! `<feedback>…</feedback>` and `<response>…</response>`, in any order.

use std::fmt;

/// One of the regions a final answer must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Response,
    Summary,
    Feedback,
}

/// Tags in the order they are checked and reported.
pub const REQUIRED_TAGS: [Tag; 3] = [Tag::Response, Tag::Summary, Tag::Feedback];

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Response => "response",
            Self::Summary => "summary",
            Self::Feedback => "feedback",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name())
    }
}

/// Text of the last complete `<tag>…</tag>` region, trimmed.
///
/// Regions are matched left to right, each opening tag paired with the
/// nearest closing tag after it; the last such pair wins.
pub fn extract_tag(text: &str, tag: Tag) -> Option<&str> {
    let open = format!("<{}>", tag.name());
    let close = format!("</{}>", tag.name());

    let mut found = None;
    let mut cursor = 0;
    while let Some(start) = text[cursor..].find(&open) {
        let body_start = cursor + start + open.len();
        let Some(len) = text[body_start..].find(&close) else {
            break;
        };
        found = Some(text[body_start..body_start + len].trim());
        cursor = body_start + len + close.len();
    }
    found
}

/// Tags without a complete region in `text`, in [`REQUIRED_TAGS`] order.
pub fn missing_tags(text: &str) -> Vec<Tag> {
    REQUIRED_TAGS
        .into_iter()
        .filter(|tag| extract_tag(text, *tag).is_none())
        .collect()
}

/// The user message appended when a reply misses any of the tags.
pub fn correction_message(missing: &[Tag]) -> String {
    let listed = missing
        .iter()
        .map(Tag::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "ERROR: Your response is missing required tags: {listed}. \
         You MUST provide ALL THREE tags: <summary>, <feedback>, and <response>. \
         Please provide your complete response now with all three tags."
    )
}
