//! String similarity metrics on a 0-100 scale.
//!
//! The metric is chosen once when the syncer is built. With the default
//! `rapidfuzz` feature the indel ratio is used; without it the built-in
//! sequence-matcher ratio takes its place. Both score `2 * M / T`, so they
//! accept and reject the same pairs up to rounding.

use std::collections::HashMap;

use crate::pipeline::traits::Similarity;

/// Indel-normalized similarity, `1 - indel_distance / (len_a + len_b)`,
/// scaled to 0-100.
#[cfg(feature = "rapidfuzz")]
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelRatio;

#[cfg(feature = "rapidfuzz")]
impl Similarity for IndelRatio {
    fn name(&self) -> &str {
        "indel-ratio"
    }

    fn score(&self, a: &str, b: &str) -> f64 {
        rapidfuzz::fuzz::ratio(a.chars(), b.chars()) * 100.0
    }
}

/// Ratcliff/Obershelp matching-blocks ratio, `2 * M / T`, scaled to 0-100
/// and rounded to an integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceMatcherRatio;

impl Similarity for SequenceMatcherRatio {
    fn name(&self) -> &str {
        "sequence-matcher"
    }

    fn score(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 100.0;
        }
        let matched = matching_chars(&a, &b);
        (200.0 * matched as f64 / total as f64).round()
    }
}

/// Metric used when nothing was injected.
pub fn default_similarity() -> Box<dyn Similarity> {
    #[cfg(feature = "rapidfuzz")]
    {
        Box::new(IndelRatio)
    }

    #[cfg(not(feature = "rapidfuzz"))]
    {
        Box::new(SequenceMatcherRatio)
    }
}

/// Total size of the matching blocks found by recursively taking the
/// longest common substring and recursing on both sides of it.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut stack = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = stack.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            stack.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            stack.push((i + size, ahi, j + size, bhi));
        }
    }
    total
}

/// Longest common block in `a[alo..ahi]` / `b[blo..bhi]`; ties go to the
/// earliest start in `a`, then in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0usize);
    let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate().take(bhi).skip(blo) {
        b_index.entry(c).or_default().push(j);
    }

    // run length of the match ending at (i - 1, j), keyed by j
    let mut prev_runs: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut runs = HashMap::new();
        if let Some(positions) = b_index.get(&a[i]) {
            for &j in positions {
                let k = j
                    .checked_sub(1)
                    .and_then(|p| prev_runs.get(&p))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                runs.insert(j, k);
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        prev_runs = runs;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_matcher_identical_is_100() {
        assert_eq!(SequenceMatcherRatio.score("rain", "rain"), 100.0);
        assert_eq!(SequenceMatcherRatio.score("", ""), 100.0);
    }

    #[test]
    fn sequence_matcher_disjoint_is_0() {
        assert_eq!(SequenceMatcherRatio.score("abc", "xyz"), 0.0);
        assert_eq!(SequenceMatcherRatio.score("abc", ""), 0.0);
    }

    #[test]
    fn sequence_matcher_partial_overlap_rounds() {
        // "cat" / "kat": one block "at", 2 * 2 / 6 = 66.67
        assert_eq!(SequenceMatcherRatio.score("cat", "kat"), 67.0);
        // "abcd" / "bcda": block "bcd", 2 * 3 / 8 = 75
        assert_eq!(SequenceMatcherRatio.score("abcd", "bcda"), 75.0);
    }

    #[test]
    fn sequence_matcher_counts_blocks_on_both_sides() {
        // blocks "ab" and "de" around the mismatch
        assert_eq!(SequenceMatcherRatio.score("abxde", "abyde"), 80.0);
    }

    #[test]
    fn sequence_matcher_handles_multibyte() {
        assert_eq!(SequenceMatcherRatio.score("今天", "今天"), 100.0);
        assert_eq!(SequenceMatcherRatio.score("今天", "明天"), 50.0);
    }

    #[cfg(feature = "rapidfuzz")]
    #[test]
    fn indel_ratio_scale() {
        assert_eq!(IndelRatio.score("rain", "rain"), 100.0);
        assert!((IndelRatio.score("rain", "rein") - 75.0).abs() < 1e-9);
        assert!((IndelRatio.score("dancing", "dancin") - 1200.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn default_and_fallback_agree_on_elisions() {
        use crate::alignment::edit_distance::DEFAULT_MATCH_THRESHOLD;

        let default = default_similarity();
        for (a, b, accepted) in [
            ("dancing", "dancin", true),
            ("hello", "helloo", true),
            ("rain", "rein", false),
            ("love", "loving", false),
        ] {
            let fallback = SequenceMatcherRatio.score(a, b) >= DEFAULT_MATCH_THRESHOLD;
            let chosen = default.score(a, b) >= DEFAULT_MATCH_THRESHOLD;
            assert_eq!(fallback, accepted, "{a}/{b} under {}", SequenceMatcherRatio.name());
            assert_eq!(chosen, accepted, "{a}/{b} under {}", default.name());
        }
    }

    #[test]
    fn default_similarity_scores_identity_as_100() {
        assert_eq!(default_similarity().score("hello", "hello"), 100.0);
    }
}
