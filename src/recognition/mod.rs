pub mod command;
pub mod transcript;

use std::path::{Path, PathBuf};

use crate::config::{RecognizerConfig, StrategyConfig};
use crate::error::LyricSyncError;
use crate::pipeline::traits::Recognizer;
use crate::types::Word;

pub use command::CommandRecognizer;
pub use transcript::TranscriptFileRecognizer;

/// Tries each strategy in order and returns the first success. When every
/// strategy fails the last failure is kept as the error source.
pub struct FallbackRecognizer {
    strategies: Vec<Box<dyn Recognizer>>,
}

impl FallbackRecognizer {
    pub fn new(strategies: Vec<Box<dyn Recognizer>>) -> Self {
        Self { strategies }
    }

    pub fn from_config(config: &RecognizerConfig) -> Self {
        Self::new(config.strategies.iter().map(build_recognizer).collect())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Recognizer for FallbackRecognizer {
    fn name(&self) -> &str {
        "fallback"
    }

    fn recognize(&self, audio: &Path) -> Result<Vec<Word>, LyricSyncError> {
        let mut attempts = Vec::with_capacity(self.strategies.len());
        let mut last = None;
        for strategy in &self.strategies {
            match strategy.recognize(audio) {
                Ok(words) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        words = words.len(),
                        "recognition succeeded"
                    );
                    return Ok(words);
                }
                Err(err) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        error = %err,
                        "recognition strategy failed"
                    );
                    attempts.push(format!("{}: {err}", strategy.name()));
                    last = Some(err);
                }
            }
        }
        match last {
            Some(last) => Err(LyricSyncError::RecognitionExhausted {
                attempts,
                last: Box::new(last),
            }),
            None => Err(LyricSyncError::invalid_input(
                "no recognition strategies configured",
            )),
        }
    }
}

pub fn build_recognizer(strategy: &StrategyConfig) -> Box<dyn Recognizer> {
    match strategy {
        StrategyConfig::Command {
            program,
            args,
            model,
            language,
        } => Box::new(CommandRecognizer::new(
            program.clone(),
            args.clone(),
            model.clone(),
            language.clone(),
        )),
        StrategyConfig::Transcript { path, suffix } => Box::new(TranscriptFileRecognizer::new(
            path.as_ref().map(PathBuf::from),
            suffix.clone(),
        )),
    }
}
