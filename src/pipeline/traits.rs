use std::path::Path;

use crate::error::LyricSyncError;
use crate::types::{AlignmentMap, Word};

pub trait Tokenizer: Send + Sync {
    /// Canonical form used for hypothesis words.
    fn normalize(&self, text: &str) -> String;
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Token similarity on a 0-100 scale.
pub trait Similarity: Send + Sync {
    fn name(&self) -> &str;
    fn score(&self, a: &str, b: &str) -> f64;
}

pub trait SequenceAligner: Send + Sync {
    fn align(&self, reference: &[String], hypothesis: &[String]) -> AlignmentMap;
}

/// Produces time-stamped words for an audio file.
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &str;
    fn recognize(&self, audio: &Path) -> Result<Vec<Word>, LyricSyncError>;
}
