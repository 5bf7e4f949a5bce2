use std::path::{Path, PathBuf};

use crate::alignment::segmentation::segment;
use crate::alignment::timestamps::assign_timestamps;
use crate::config::SyncConfig;
use crate::error::LyricSyncError;
use crate::lrc::codec::{format_seconds, TimestampPrecision};
use crate::pipeline::traits::{Recognizer, SequenceAligner, Tokenizer};
use crate::types::{TimedLine, Word};

const SELF_CHECK_FIXTURE: [&str; 3] = ["今 天 下 雨", "hello world", "副 歌"];

pub struct LyricSyncer {
    config: SyncConfig,
    recognizer: Box<dyn Recognizer>,
    tokenizer: Box<dyn Tokenizer>,
    sequence_aligner: Box<dyn SequenceAligner>,
}

pub(crate) struct LyricSyncerParts {
    pub config: SyncConfig,
    pub recognizer: Box<dyn Recognizer>,
    pub tokenizer: Box<dyn Tokenizer>,
    pub sequence_aligner: Box<dyn SequenceAligner>,
}

/// Outcome of aligning the built-in fixture against itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfCheck {
    pub reference_tokens: usize,
    pub mapped_tokens: usize,
}

impl SelfCheck {
    pub fn passed(&self) -> bool {
        self.mapped_tokens == self.reference_tokens
    }

    pub fn token(&self) -> &'static str {
        if self.passed() {
            "SELF_TEST_OK"
        } else {
            "SELF_TEST_FAIL"
        }
    }
}

impl LyricSyncer {
    pub(crate) fn from_parts(parts: LyricSyncerParts) -> Self {
        Self {
            config: parts.config,
            recognizer: parts.recognizer,
            tokenizer: parts.tokenizer,
            sequence_aligner: parts.sequence_aligner,
        }
    }

    pub fn precision(&self) -> TimestampPrecision {
        self.config.precision
    }

    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Recognize `audio`, align it with the lyrics at `lyrics_path` and write
    /// an LRC file. Nothing is written unless every step succeeds.
    pub fn generate(
        &self,
        audio: &Path,
        lyrics_path: &Path,
        out_path: Option<&Path>,
    ) -> Result<PathBuf, LyricSyncError> {
        let raw_lines = read_lyrics(lyrics_path)?;
        let words = self.recognizer.recognize(audio)?;
        if words.is_empty() {
            tracing::warn!(
                audio = %audio.display(),
                "recognizer returned no words; every line falls back to interpolation"
            );
        }

        let timed = self.sync_lines(&raw_lines, &words);
        let out_path = out_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_output_path(audio));
        std::fs::write(&out_path, self.render(&timed))
            .map_err(|e| LyricSyncError::io("write LRC output", e))?;

        tracing::info!(out = %out_path.display(), lines = timed.len(), "wrote synchronized lyrics");
        Ok(out_path)
    }

    /// Align raw lyric lines against recognized words and time every unit.
    pub fn sync_lines<S: AsRef<str>>(&self, raw_lines: &[S], words: &[Word]) -> Vec<TimedLine> {
        let segmented = segment(raw_lines, |text| self.tokenizer.tokenize(text));
        let hypothesis: Vec<String> = words
            .iter()
            .map(|w| self.tokenizer.normalize(&w.text))
            .collect();
        let map = self
            .sequence_aligner
            .align(&segmented.reference_tokens, &hypothesis);

        tracing::debug!(
            lines = segmented.lines.len(),
            reference_tokens = segmented.reference_tokens.len(),
            hypothesis_tokens = hypothesis.len(),
            matched = map.len(),
            "aligned lyrics against transcript"
        );

        assign_timestamps(&segmented.lines, &map, words)
    }

    /// One `<timestamp><text>` entry per line, newline-joined.
    pub fn render(&self, lines: &[TimedLine]) -> String {
        lines
            .iter()
            .map(|line| {
                format!(
                    "{}{}",
                    format_seconds(line.seconds, self.config.precision),
                    line.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn default_output_path(&self, audio: &Path) -> PathBuf {
        audio.with_extension(&self.config.output_extension)
    }

    pub fn self_check(&self) -> SelfCheck {
        let reference: Vec<String> = SELF_CHECK_FIXTURE
            .iter()
            .flat_map(|line| self.tokenizer.tokenize(line))
            .collect();
        let map = self.sequence_aligner.align(&reference, &reference);
        SelfCheck {
            reference_tokens: reference.len(),
            mapped_tokens: map.len(),
        }
    }
}

pub fn read_lyrics(path: &Path) -> Result<Vec<String>, LyricSyncError> {
    let text = std::fs::read_to_string(path).map_err(|e| LyricSyncError::io("read lyrics", e))?;
    Ok(text.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use crate::pipeline::builder::LyricSyncerBuilder;

    use super::*;

    struct NoWords;

    impl Recognizer for NoWords {
        fn name(&self) -> &str {
            "silent"
        }

        fn recognize(&self, _audio: &Path) -> Result<Vec<Word>, LyricSyncError> {
            Ok(Vec::new())
        }
    }

    fn syncer(precision: TimestampPrecision) -> LyricSyncer {
        LyricSyncerBuilder::new(SyncConfig {
            precision,
            ..SyncConfig::default()
        })
        .with_recognizer(Box::new(NoWords))
        .build()
        .expect("build succeeds")
    }

    #[test]
    fn self_check_passes() {
        let check = syncer(TimestampPrecision::Milliseconds).self_check();
        assert_eq!(check.reference_tokens, 8);
        assert!(check.passed());
        assert_eq!(check.token(), "SELF_TEST_OK");
    }

    #[test]
    fn self_check_failure_token() {
        let check = SelfCheck {
            reference_tokens: 3,
            mapped_tokens: 2,
        };
        assert_eq!(check.token(), "SELF_TEST_FAIL");
    }

    #[test]
    fn render_joins_without_separator() {
        let lines = vec![
            TimedLine {
                seconds: 1.5,
                text: "la".to_string(),
            },
            TimedLine {
                seconds: 61.0,
                text: "da".to_string(),
            },
        ];
        assert_eq!(
            syncer(TimestampPrecision::Centiseconds).render(&lines),
            "[00:01.50]la\n[01:01.00]da"
        );
    }

    #[test]
    fn silent_audio_anchors_everything_at_zero() {
        let lines = syncer(TimestampPrecision::Milliseconds).sync_lines(&["a b", "c"], &[]);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.seconds == 0.0));
    }

    #[test]
    fn word_text_is_normalized_before_alignment() {
        let words = vec![
            Word::new("Sun", 1.0, 1.5),
            Word::new("Rain,", 5.0, 5.5),
            Word::new("MOON!", 9.0, 9.5),
        ];
        let lines =
            syncer(TimestampPrecision::Milliseconds).sync_lines(&["sun", "Rain", "moon"], &words);
        let times: Vec<f64> = lines.iter().map(|l| l.seconds).collect();
        assert_eq!(times, [1.0, 5.0, 9.0]);
    }

    #[test]
    fn elided_word_still_anchors_its_line() {
        let words = vec![
            Word::new("sun", 1.0, 1.5),
            Word::new("dancin", 5.0, 5.5),
            Word::new("moon", 9.0, 9.5),
        ];
        let lines = syncer(TimestampPrecision::Milliseconds)
            .sync_lines(&["sun", "dancing", "moon"], &words);
        assert_eq!(lines[1].seconds, 5.0);
    }

    #[test]
    fn default_output_path_swaps_extension() {
        assert_eq!(
            syncer(TimestampPrecision::Milliseconds).default_output_path(Path::new("/m/song.mp3")),
            PathBuf::from("/m/song.lrc")
        );
    }

    #[test]
    fn missing_lyrics_fail_before_recognition() {
        let err = syncer(TimestampPrecision::Milliseconds)
            .generate(
                Path::new("/nonexistent/song.mp3"),
                Path::new("/nonexistent/lyrics.txt"),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, LyricSyncError::Io { context: "read lyrics", .. }));
    }
}
