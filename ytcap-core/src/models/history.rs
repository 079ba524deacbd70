use serde::{Deserialize, Serialize};

/// One processed video. Written on first successful download and never
/// mutated afterwards; later submissions of the same video are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub url: String,
    pub title: String,
    pub filename: String,
}
