use serde::{Deserialize, Serialize};

/// One cue of transcript text. Timing is dropped at the fetch boundary;
/// only the text survives into the saved file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionSegment {
    pub text: String,
}

impl CaptionSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Joins segment texts with single spaces, preserving source order.
pub fn full_text(segments: &[CaptionSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
