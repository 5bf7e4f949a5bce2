use std::sync::LazyLock;

use regex::Regex;

use crate::types::LyricLine;

static TIME_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[0-9]{1,2}:[0-9]{2}(?:\.[0-9]{1,3})?\]").expect("time tag pattern is valid")
});
static BRACKET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]").expect("bracket pattern is valid"));
static FULL_WIDTH_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【[^】]+】").expect("full-width bracket pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Lyric units plus the flattened reference token stream their ranges index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentedLyrics {
    pub lines: Vec<LyricLine>,
    pub reference_tokens: Vec<String>,
}

/// Strip time tags, bracketed annotations and dash decoration from a raw
/// lyric line.
pub fn clean_line(raw: &str) -> String {
    let s = TIME_TAG.replace_all(raw, "");
    let s = BRACKET_TAG.replace_all(&s, "");
    let s = FULL_WIDTH_TAG.replace_all(&s, "");
    let s = s.replace("——", "").replace('—', "");
    WHITESPACE.replace_all(&s, " ").trim().to_string()
}

/// Clean every raw line, drop the empty ones, and split the survivors on
/// spaces. Each fragment becomes its own unit, paired with its raw line.
pub fn split_units<S: AsRef<str>>(raw_lines: &[S]) -> Vec<(String, String)> {
    let mut units = Vec::new();
    for raw in raw_lines {
        let raw = raw.as_ref();
        let cleaned = clean_line(raw);
        if cleaned.is_empty() {
            continue;
        }
        units.extend(
            cleaned
                .split(' ')
                .filter(|fragment| !fragment.is_empty())
                .map(|fragment| (raw.to_string(), fragment.to_string())),
        );
    }
    units
}

/// Build lyric units and assign each a contiguous range in one global
/// token stream, in emission order.
pub fn segment<S, F>(raw_lines: &[S], tokenize: F) -> SegmentedLyrics
where
    S: AsRef<str>,
    F: Fn(&str) -> Vec<String>,
{
    let mut out = SegmentedLyrics::default();
    for (raw_text, cleaned_text) in split_units(raw_lines) {
        let tokens = tokenize(&cleaned_text);
        out.lines.push(LyricLine {
            raw_text,
            cleaned_text,
            first_token: out.reference_tokens.len(),
            token_count: tokens.len(),
        });
        out.reference_tokens.extend(tokens);
    }
    out
}
