pub mod alignment;
pub mod config;
pub mod error;
pub mod lrc;
pub mod pipeline;
pub mod recognition;
pub mod types;

pub use alignment::segmentation::{segment, SegmentedLyrics};
pub use alignment::tokenization::tokenize;
pub use config::{RecognizerConfig, StrategyConfig, SyncConfig};
pub use error::LyricSyncError;
pub use lrc::{LrcDocument, TimestampPrecision};
pub use pipeline::builder::LyricSyncerBuilder;
pub use pipeline::runtime::{LyricSyncer, SelfCheck};
pub use pipeline::traits::{Recognizer, SequenceAligner, Similarity, Tokenizer};
pub use recognition::FallbackRecognizer;
pub use types::{AlignmentMap, LyricEntry, LyricLine, TimedLine, Word};
