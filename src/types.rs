use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One recognized word. Times are in seconds with `start <= end`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Word {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// A cleaned lyric unit and the inclusive range it occupies in the
/// flattened reference token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    pub raw_text: String,
    pub cleaned_text: String,
    pub first_token: usize,
    /// Zero for units that survive cleaning but tokenize to nothing
    /// (punctuation-only fragments); such a unit owns an empty range.
    pub token_count: usize,
}

impl LyricLine {
    /// Half-open view of the inclusive `[first, last]` token range.
    pub fn token_range(&self) -> std::ops::Range<usize> {
        self.first_token..self.first_token + self.token_count
    }
}

/// Reference token index -> hypothesis token index.
pub type AlignmentMap = BTreeMap<usize, usize>;

/// Output of timestamp assignment, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedLine {
    pub seconds: f64,
    pub text: String,
}

/// One `[timestamp]text` entry of an LRC file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricEntry {
    #[serde(rename = "time_ms")]
    pub timestamp_ms: u64,
    pub text: String,
}
