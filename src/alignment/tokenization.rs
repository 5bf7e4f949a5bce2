use unicode_normalization::UnicodeNormalization;

/// CJK unified ideographs, extension A and extensions B through E.
pub fn is_cjk(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF
            | 0x3400..=0x4DBF
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2B73F
            | 0x2B740..=0x2B81F
            | 0x2B820..=0x2CEAF
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lowercase, apply NFKC, blank out everything that is neither a word
/// character nor a CJK ideograph, then collapse whitespace.
pub fn normalize(text: &str) -> String {
    let folded: String = text.to_lowercase().nfkc().collect();
    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;
    for c in folded.chars() {
        if is_word_char(c) || is_cjk(c) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Split text into reference tokens: one token per CJK character, one per
/// maximal run of word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    let mut tokens = Vec::new();
    let mut buf = String::new();

    for c in normalized.chars() {
        if is_cjk(c) {
            if !buf.is_empty() {
                tokens.push(std::mem::take(&mut buf));
            }
            tokens.push(c.to_string());
        } else if is_word_char(c) {
            buf.push(c);
        } else if !buf.is_empty() {
            tokens.push(std::mem::take(&mut buf));
        }
    }
    if !buf.is_empty() {
        tokens.push(buf);
    }
    tokens
}
