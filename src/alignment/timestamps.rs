use crate::types::{AlignmentMap, LyricLine, TimedLine, Word};

/// Hypothesis indices matched by any token of `line`.
fn matched_hypotheses(line: &LyricLine, map: &AlignmentMap) -> Vec<usize> {
    map.range(line.token_range()).map(|(_, &h)| h).collect()
}

fn first_match(line: &LyricLine, map: &AlignmentMap) -> Option<usize> {
    matched_hypotheses(line, map).into_iter().min()
}

fn first_start(words: &[Word]) -> f64 {
    words.first().map(|w| w.start).unwrap_or(0.0)
}

/// Give every line a time in seconds, in line order.
///
/// A line with matched tokens starts at its earliest matched word. An
/// unmatched interior line sits halfway between the end of the previous
/// line's anchor word and the start of the next line's anchor word. An
/// unmatched first or last line falls back to the first word's start.
pub fn assign_timestamps(
    lines: &[LyricLine],
    map: &AlignmentMap,
    words: &[Word],
) -> Vec<TimedLine> {
    let last = lines.len().saturating_sub(1);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let seconds = match first_match(line, map).and_then(|h| words.get(h)) {
                Some(word) => word.start,
                None if i > 0 && i < last => {
                    let prev_anchor = first_match(&lines[i - 1], map)
                        .and_then(|h| words.get(h))
                        .map(|w| w.end)
                        .unwrap_or_else(|| first_start(words));
                    let next_anchor = first_match(&lines[i + 1], map)
                        .and_then(|h| words.get(h))
                        .map(|w| w.start)
                        .unwrap_or_else(|| words.last().map(|w| w.end).unwrap_or(prev_anchor));
                    prev_anchor + (next_anchor - prev_anchor) * 0.5
                }
                None => first_start(words),
            };
            TimedLine {
                seconds,
                text: line.cleaned_text.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, first_token: usize, token_count: usize) -> LyricLine {
        LyricLine {
            raw_text: text.to_string(),
            cleaned_text: text.to_string(),
            first_token,
            token_count,
        }
    }

    fn three_lines() -> Vec<LyricLine> {
        vec![line("a", 0, 1), line("b", 1, 1), line("c", 2, 1)]
    }

    #[test]
    fn matched_line_uses_earliest_word_start() {
        let lines = vec![line("a b", 0, 2)];
        let words = vec![Word::new("a", 1.0, 1.5), Word::new("b", 2.0, 2.5)];
        let map = AlignmentMap::from([(0, 1), (1, 0)]);
        let out = assign_timestamps(&lines, &map, &words);
        assert_eq!(out[0].seconds, 1.0);
        assert_eq!(out[0].text, "a b");
    }

    #[test]
    fn unmatched_interior_line_interpolates() {
        let words = vec![Word::new("a", 9.0, 10.0), Word::new("c", 14.0, 15.0)];
        let map = AlignmentMap::from([(0, 0), (2, 1)]);
        let out = assign_timestamps(&three_lines(), &map, &words);
        assert_eq!(out[1].seconds, 12.0);
    }

    #[test]
    fn unmatched_neighbours_fall_back_to_transcript_edges() {
        let lines = vec![line("a", 0, 1), line("b", 1, 1), line("c", 2, 1), line("d", 3, 1)];
        let words = vec![Word::new("x", 2.0, 3.0), Word::new("y", 6.0, 8.0)];
        let out = assign_timestamps(&lines, &AlignmentMap::new(), &words);
        // prev anchor = first start 2.0, next anchor = last end 8.0
        assert_eq!(out[1].seconds, 5.0);
        assert_eq!(out[2].seconds, 5.0);
        assert_eq!(out[0].seconds, 2.0);
        assert_eq!(out[3].seconds, 2.0);
    }

    #[test]
    fn no_words_anchors_everything_at_zero() {
        let out = assign_timestamps(&three_lines(), &AlignmentMap::new(), &[]);
        assert!(out.iter().all(|l| l.seconds == 0.0));
    }

    #[test]
    fn unmatched_edges_use_first_word_start() {
        let words = vec![Word::new("b", 4.0, 5.0)];
        let map = AlignmentMap::from([(1, 0)]);
        let out = assign_timestamps(&three_lines(), &map, &words);
        assert_eq!(out[0].seconds, 4.0);
        assert_eq!(out[1].seconds, 4.0);
        assert_eq!(out[2].seconds, 4.0);
    }

    #[test]
    fn empty_range_line_is_treated_as_unmatched() {
        let lines = vec![line("a", 0, 1), line("!!!", 1, 0), line("c", 1, 1)];
        let words = vec![Word::new("a", 0.0, 1.0), Word::new("c", 3.0, 4.0)];
        let map = AlignmentMap::from([(0, 0), (1, 1)]);
        let out = assign_timestamps(&lines, &map, &words);
        assert_eq!(out[1].seconds, 2.0);
        assert_eq!(out[2].seconds, 3.0);
    }
}
