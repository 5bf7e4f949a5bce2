use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::LyricSyncError;
use crate::pipeline::traits::Recognizer;
use crate::recognition::transcript::read_transcript;
use crate::types::Word;

/// Runs a whisper-family command line tool and reads the word-level JSON it
/// writes. The tool is invoked as
/// `<program> <audio> --model <model> [--language <lang>] --output_format json --output_dir <dir> [args...]`
/// and must leave `<dir>/<audio stem>.json` behind.
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    model: String,
    language: Option<String>,
}

impl CommandRecognizer {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        model: impl Into<String>,
        language: Option<String>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            model: model.into(),
            language,
        }
    }

    pub(crate) fn command(&self, audio: &Path, output_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(audio).arg("--model").arg(&self.model);
        if let Some(language) = &self.language {
            cmd.arg("--language").arg(language);
        }
        cmd.arg("--output_format")
            .arg("json")
            .arg("--output_dir")
            .arg(output_dir)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }

    fn output_path(audio: &Path, output_dir: &Path) -> PathBuf {
        let stem = audio
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        output_dir.join(format!("{stem}.json"))
    }
}

impl Recognizer for CommandRecognizer {
    fn name(&self) -> &str {
        &self.program
    }

    fn recognize(&self, audio: &Path) -> Result<Vec<Word>, LyricSyncError> {
        if !audio.exists() {
            return Err(LyricSyncError::recognition(
                self.name(),
                format!("audio file not found: {}", audio.display()),
            ));
        }
        let output_dir = tempfile::tempdir()
            .map_err(|e| LyricSyncError::io("create recognizer output dir", e))?;

        tracing::debug!(
            program = %self.program,
            model = %self.model,
            audio = %audio.display(),
            "running recognizer"
        );
        let output = self
            .command(audio, output_dir.path())
            .output()
            .map_err(|e| LyricSyncError::recognition(self.name(), e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr.lines().last().unwrap_or("").trim().to_string();
            return Err(LyricSyncError::recognition(
                self.name(),
                format!("exited with {}: {tail}", output.status),
            ));
        }

        read_transcript(&Self::output_path(audio, output_dir.path()))
            .map_err(|e| LyricSyncError::recognition(self.name(), e))
    }
}
