use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::alignment::tokenization::normalize;
use crate::error::LyricSyncError;
use crate::pipeline::traits::Recognizer;
use crate::types::Word;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptJson {
    Segmented { segments: Vec<SegmentJson> },
    Flat(Vec<WordJson>),
}

#[derive(Debug, Deserialize)]
struct SegmentJson {
    #[serde(default)]
    words: Vec<WordJson>,
}

#[derive(Debug, Deserialize)]
struct WordJson {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    start: Option<f64>,
    #[serde(default)]
    end: Option<f64>,
}

/// Parse whisper-style `{"segments": [{"words": [...]}]}` or a flat word
/// array. Words without both `start` and `end` are dropped; text is
/// normalized the same way reference tokens are.
pub fn parse_transcript(json: &str) -> Result<Vec<Word>, LyricSyncError> {
    let parsed: TranscriptJson =
        serde_json::from_str(json).map_err(|e| LyricSyncError::json("parse word transcript", e))?;
    let raw = match parsed {
        TranscriptJson::Segmented { segments } => {
            segments.into_iter().flat_map(|s| s.words).collect::<Vec<_>>()
        }
        TranscriptJson::Flat(words) => words,
    };

    let total = raw.len();
    let words: Vec<Word> = raw
        .into_iter()
        .filter_map(|w| {
            let (start, end) = (w.start?, w.end?);
            let text = w.word.or(w.text).unwrap_or_default();
            Some(Word::new(normalize(&text), start, end))
        })
        .collect();
    if words.len() < total {
        tracing::debug!(
            kept = words.len(),
            dropped = total - words.len(),
            "dropped transcript words without timestamps"
        );
    }
    Ok(words)
}

pub fn read_transcript(path: &Path) -> Result<Vec<Word>, LyricSyncError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| LyricSyncError::io("read word transcript", e))?;
    parse_transcript(&data)
}

/// Reads words from a transcript file produced earlier by some recognizer.
/// Without an explicit path the file sits next to the audio as
/// `<audio stem><suffix>`.
pub struct TranscriptFileRecognizer {
    path: Option<PathBuf>,
    suffix: String,
}

impl TranscriptFileRecognizer {
    pub fn new(path: Option<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            path,
            suffix: suffix.into(),
        }
    }

    pub fn transcript_path(&self, audio: &Path) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        let stem = audio
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        audio.with_file_name(format!("{stem}{}", self.suffix))
    }
}

impl Recognizer for TranscriptFileRecognizer {
    fn name(&self) -> &str {
        "transcript"
    }

    fn recognize(&self, audio: &Path) -> Result<Vec<Word>, LyricSyncError> {
        let path = self.transcript_path(audio);
        read_transcript(&path).map_err(|e| LyricSyncError::recognition(self.name(), e))
    }
}
