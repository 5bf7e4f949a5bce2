use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use crate::error::LyricSyncError;
use crate::lrc::codec::{format_millis, parse_prefix, TimestampPrecision};
use crate::types::LyricEntry;

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([a-zA-Z]+):(.*)\]$").expect("header pattern is valid"));

/// Header keys written back to disk, in this order. Other keys are kept in
/// memory and exported but not rewritten.
pub const HEADER_ORDER: [&str; 7] = ["ti", "ar", "al", "by", "offset", "re", "ve"];

/// An LRC file: `[key:value]` headers, in file order, followed by timed
/// lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LrcDocument {
    pub headers: IndexMap<String, String>,
    #[serde(rename = "lines")]
    pub entries: Vec<LyricEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LrcInfo {
    pub lrc_headers: IndexMap<String, String>,
    pub lrc_lines: usize,
    pub lrc_time_span_ms: i64,
}

impl LrcDocument {
    pub fn from_entries(entries: Vec<LyricEntry>) -> Self {
        Self {
            headers: IndexMap::new(),
            entries,
        }
    }

    /// Lines that are neither headers nor `<timestamp><text>` entries are
    /// skipped.
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::default();
        for line in text.lines() {
            if let Some(caps) = HEADER.captures(line) {
                doc.headers.insert(caps[1].to_string(), caps[2].to_string());
                continue;
            }
            match parse_prefix(line) {
                Some((timestamp_ms, consumed)) if consumed < line.len() => {
                    doc.entries.push(LyricEntry {
                        timestamp_ms,
                        text: line[consumed..].to_string(),
                    });
                }
                _ => tracing::trace!(line, "skipping unrecognized LRC line"),
            }
        }
        doc
    }

    pub fn read(path: &Path) -> Result<Self, LyricSyncError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| LyricSyncError::io("read LRC file", e))?;
        Ok(Self::parse(&text))
    }

    pub fn set_header(&mut self, key: &str, value: impl Into<String>) {
        self.headers.insert(key.to_string(), value.into());
    }

    /// Shift every entry by `offset_ms` (times saturate at zero) and record
    /// the offset header.
    pub fn apply_offset(&mut self, offset_ms: i64) {
        for entry in &mut self.entries {
            entry.timestamp_ms = entry.timestamp_ms.saturating_add_signed(offset_ms);
        }
        self.set_header("offset", offset_ms.to_string());
    }

    pub fn to_lrc_string(&self, precision: TimestampPrecision) -> String {
        let headers = HEADER_ORDER.iter().filter_map(|key| {
            self.headers
                .get(*key)
                .map(|value| format!("[{key}:{value}]"))
        });
        let entries = self
            .entries
            .iter()
            .map(|e| format!("{}{}", format_millis(e.timestamp_ms, precision), e.text));
        headers.chain(entries).collect::<Vec<_>>().join("\n")
    }

    pub fn write(&self, path: &Path, precision: TimestampPrecision) -> Result<(), LyricSyncError> {
        std::fs::write(path, self.to_lrc_string(precision))
            .map_err(|e| LyricSyncError::io("write LRC file", e))
    }

    pub fn export_json(&self) -> Result<String, LyricSyncError> {
        serde_json::to_string_pretty(self).map_err(|e| LyricSyncError::json("serialize LRC", e))
    }

    pub fn write_json(&self, path: &Path) -> Result<(), LyricSyncError> {
        std::fs::write(path, self.export_json()?)
            .map_err(|e| LyricSyncError::io("write LRC export", e))
    }

    pub fn info(&self) -> LrcInfo {
        let span = match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => last.timestamp_ms as i64 - first.timestamp_ms as i64,
            _ => 0,
        };
        LrcInfo {
            lrc_headers: self.headers.clone(),
            lrc_lines: self.entries.len(),
            lrc_time_span_ms: span,
        }
    }
}
