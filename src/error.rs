use thiserror::Error;

#[derive(Debug, Error)]
pub enum LyricSyncError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("recognizer '{strategy}' failed: {message}")]
    Recognition { strategy: String, message: String },
    #[error("all recognition strategies failed: {}", attempts.join("; "))]
    RecognitionExhausted {
        attempts: Vec<String>,
        #[source]
        last: Box<LyricSyncError>,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl LyricSyncError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn recognition(strategy: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Recognition {
            strategy: strategy.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
