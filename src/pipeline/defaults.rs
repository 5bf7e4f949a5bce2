use crate::alignment::edit_distance::align_tokens;
use crate::alignment::tokenization::{normalize, tokenize};
use crate::pipeline::traits::{SequenceAligner, Similarity, Tokenizer};
use crate::types::AlignmentMap;

pub struct CjkAwareTokenizer;

impl Tokenizer for CjkAwareTokenizer {
    fn normalize(&self, text: &str) -> String {
        normalize(text)
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize(text)
    }
}

pub struct EditDistanceAligner {
    similarity: Box<dyn Similarity>,
    threshold: f64,
}

impl EditDistanceAligner {
    pub fn new(similarity: Box<dyn Similarity>, threshold: f64) -> Self {
        Self {
            similarity,
            threshold,
        }
    }
}

impl SequenceAligner for EditDistanceAligner {
    fn align(&self, reference: &[String], hypothesis: &[String]) -> AlignmentMap {
        align_tokens(reference, hypothesis, self.similarity.as_ref(), self.threshold)
    }
}
