use crate::alignment::similarity::default_similarity;
use crate::config::{RecognizerConfig, SyncConfig};
use crate::error::LyricSyncError;
use crate::pipeline::defaults::{CjkAwareTokenizer, EditDistanceAligner};
use crate::pipeline::runtime::{LyricSyncer, LyricSyncerParts};
use crate::pipeline::traits::{Recognizer, SequenceAligner, Similarity, Tokenizer};
use crate::recognition::FallbackRecognizer;

pub struct LyricSyncerBuilder {
    config: SyncConfig,
    recognizer_config: Option<RecognizerConfig>,
    recognizer: Option<Box<dyn Recognizer>>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    similarity: Option<Box<dyn Similarity>>,
    sequence_aligner: Option<Box<dyn SequenceAligner>>,
}

impl LyricSyncerBuilder {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            recognizer_config: None,
            recognizer: None,
            tokenizer: None,
            similarity: None,
            sequence_aligner: None,
        }
    }

    pub fn with_recognizer_config(mut self, recognizer_config: RecognizerConfig) -> Self {
        self.recognizer_config = Some(recognizer_config);
        self
    }

    /// Takes precedence over any recognizer config.
    pub fn with_recognizer(mut self, recognizer: Box<dyn Recognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Ignored when a custom sequence aligner is also supplied.
    pub fn with_similarity(mut self, similarity: Box<dyn Similarity>) -> Self {
        self.similarity = Some(similarity);
        self
    }

    pub fn with_sequence_aligner(mut self, sequence_aligner: Box<dyn SequenceAligner>) -> Self {
        self.sequence_aligner = Some(sequence_aligner);
        self
    }

    pub fn build(self) -> Result<LyricSyncer, LyricSyncError> {
        let threshold = self.config.match_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(LyricSyncError::invalid_input(format!(
                "match threshold must be within 0..=100, got {threshold}"
            )));
        }
        if self.config.output_extension.is_empty() {
            return Err(LyricSyncError::invalid_input(
                "output extension must not be empty",
            ));
        }

        let sequence_aligner = match self.sequence_aligner {
            Some(aligner) => aligner,
            None => {
                let similarity = self.similarity.unwrap_or_else(default_similarity);
                tracing::debug!(
                    similarity = similarity.name(),
                    threshold,
                    "selected similarity metric"
                );
                Box::new(EditDistanceAligner::new(similarity, threshold))
            }
        };

        let recognizer = match self.recognizer {
            Some(recognizer) => recognizer,
            None => Box::new(FallbackRecognizer::from_config(
                &self.recognizer_config.unwrap_or_default(),
            )),
        };

        Ok(LyricSyncer::from_parts(LyricSyncerParts {
            config: self.config,
            recognizer,
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(CjkAwareTokenizer)),
            sequence_aligner,
        }))
    }
}
