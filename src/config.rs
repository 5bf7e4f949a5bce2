use std::path::Path;

use serde::Deserialize;

use crate::alignment::edit_distance::DEFAULT_MATCH_THRESHOLD;
use crate::error::LyricSyncError;
use crate::lrc::codec::TimestampPrecision;

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub precision: TimestampPrecision,
    /// Similarity (0-100) at which two different tokens count as a match.
    pub match_threshold: f64,
    /// Extension of the default output path derived from the audio file.
    pub output_extension: String,
}

impl SyncConfig {
    pub const DEFAULT_OUTPUT_EXTENSION: &'static str = "lrc";
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            precision: TimestampPrecision::Milliseconds,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            output_extension: Self::DEFAULT_OUTPUT_EXTENSION.to_string(),
        }
    }
}

/// Ordered recognition strategies; later entries are fallbacks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecognizerConfig {
    pub strategies: Vec<StrategyConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Run a whisper-family CLI that writes `<stem>.json` into an output dir.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default = "default_model")]
        model: String,
        #[serde(default)]
        language: Option<String>,
    },
    /// Read a word transcript already on disk.
    Transcript {
        #[serde(default)]
        path: Option<String>,
        #[serde(default = "default_transcript_suffix")]
        suffix: String,
    },
}

fn default_model() -> String {
    "medium".to_string()
}

fn default_transcript_suffix() -> String {
    ".words.json".to_string()
}

impl RecognizerConfig {
    pub fn load(path: &Path) -> Result<Self, LyricSyncError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| LyricSyncError::io("read recognizer config", e))?;
        serde_json::from_str(&data)
            .map_err(|e| LyricSyncError::json("parse recognizer config", e))
    }
}

impl Default for RecognizerConfig {
    /// whisperx first, plain whisper with word timestamps second.
    fn default() -> Self {
        Self {
            strategies: vec![
                StrategyConfig::Command {
                    program: "whisperx".to_string(),
                    args: Vec::new(),
                    model: default_model(),
                    language: None,
                },
                StrategyConfig::Command {
                    program: "whisper".to_string(),
                    args: vec![
                        "--word_timestamps".to_string(),
                        "True".to_string(),
                        "--fp16".to_string(),
                        "False".to_string(),
                    ],
                    model: default_model(),
                    language: None,
                },
            ],
        }
    }
}
