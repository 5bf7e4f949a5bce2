use crate::pipeline::traits::Similarity;
use crate::types::AlignmentMap;

/// Minimum similarity (0-100) at which two different tokens still count
/// as a free substitution.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 90.0;

const STEP_ORIGIN: u8 = 0;
const STEP_DIAG_MATCH: u8 = 1;
const STEP_DIAG_SUB: u8 = 2;
const STEP_UP: u8 = 3;
const STEP_LEFT: u8 = 4;

/// Edit-distance alignment of reference tokens against hypothesis tokens.
///
/// Insertions and deletions cost 1. A substitution is free when the tokens
/// are equal or score at least `threshold`, otherwise it costs 1. On equal
/// cost the diagonal move wins, then the vertical (skip a reference token),
/// then the horizontal (skip a hypothesis token).
///
/// Only free diagonal moves on the backtraced path end up in the map.
pub fn align_tokens(
    reference: &[String],
    hypothesis: &[String],
    similarity: &dyn Similarity,
    threshold: f64,
) -> AlignmentMap {
    let n = reference.len();
    let m = hypothesis.len();
    if n == 0 || m == 0 {
        return AlignmentMap::new();
    }

    let width = m + 1;
    let mut steps = vec![STEP_ORIGIN; (n + 1) * width];
    let mut prev: Vec<u32> = (0..=m as u32).collect();
    let mut curr = vec![0u32; width];
    for j in 1..=m {
        steps[j] = STEP_LEFT;
    }

    for i in 1..=n {
        curr[0] = i as u32;
        steps[i * width] = STEP_UP;
        let r = &reference[i - 1];
        for j in 1..=m {
            let h = &hypothesis[j - 1];
            let free = r == h || similarity.score(r, h) >= threshold;
            let up = prev[j] + 1;
            let left = curr[j - 1] + 1;
            let diag = prev[j - 1] + u32::from(!free);

            let (cost, step) = if diag <= up && diag <= left {
                (diag, if free { STEP_DIAG_MATCH } else { STEP_DIAG_SUB })
            } else if up <= left {
                (up, STEP_UP)
            } else {
                (left, STEP_LEFT)
            };
            curr[j] = cost;
            steps[i * width + j] = step;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    tracing::trace!(distance = prev[m], "edit distance table filled");

    let mut pairs = Vec::new();
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        match steps[i * width + j] {
            STEP_DIAG_MATCH => {
                pairs.push((i - 1, j - 1));
                i -= 1;
                j -= 1;
            }
            STEP_DIAG_SUB => {
                i -= 1;
                j -= 1;
            }
            STEP_UP => i -= 1,
            STEP_LEFT => j -= 1,
            _ => break,
        }
    }
    pairs.reverse();

    let mut map = AlignmentMap::new();
    for (ref_idx, hyp_idx) in pairs {
        map.entry(ref_idx).or_insert(hyp_idx);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::similarity::SequenceMatcherRatio;

    struct Fixed(f64);

    impl Similarity for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn score(&self, _a: &str, _b: &str) -> f64 {
            self.0
        }
    }

    fn toks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn align(reference: &[&str], hypothesis: &[&str], sim: &dyn Similarity) -> AlignmentMap {
        align_tokens(&toks(reference), &toks(hypothesis), sim, DEFAULT_MATCH_THRESHOLD)
    }

    #[test]
    fn empty_sides_yield_empty_map() {
        assert!(align(&[], &["a"], &SequenceMatcherRatio).is_empty());
        assert!(align(&["a"], &[], &SequenceMatcherRatio).is_empty());
    }

    #[test]
    fn identical_sequences_map_identity() {
        let t = ["今", "天", "hello", "world", "hello", "雨"];
        let map = align(&t, &t, &SequenceMatcherRatio);
        assert_eq!(map.len(), t.len());
        for (k, v) in &map {
            assert_eq!(k, v);
        }
    }

    #[test]
    fn accepted_substitution_is_mapped() {
        let map = align(&["cat"], &["kat"], &Fixed(95.0));
        assert_eq!(map.get(&0), Some(&0));
    }

    #[test]
    fn rejected_substitution_is_not_mapped() {
        let map = align(&["cat"], &["dog"], &Fixed(10.0));
        assert!(map.is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let map = align(&["cat"], &["kat"], &Fixed(90.0));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn skips_extra_hypothesis_words() {
        let map = align(&["a", "b", "c"], &["a", "x", "b", "c"], &Fixed(0.0));
        assert_eq!(map.into_iter().collect::<Vec<_>>(), [(0, 0), (1, 2), (2, 3)]);
    }

    #[test]
    fn skips_missing_reference_tokens() {
        let map = align(&["a", "b", "c", "d"], &["a", "d"], &Fixed(0.0));
        assert_eq!(map.into_iter().collect::<Vec<_>>(), [(0, 0), (3, 1)]);
    }

    #[test]
    fn diagonal_wins_ties_for_repeated_reference() {
        // both "a" tokens could claim the single hypothesis; the later one does
        let map = align(&["a", "a"], &["a"], &Fixed(0.0));
        assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, 0)]);
    }

    #[test]
    fn diagonal_wins_ties_for_repeated_hypothesis() {
        let map = align(&["a"], &["a", "a"], &Fixed(0.0));
        assert_eq!(map.into_iter().collect::<Vec<_>>(), [(0, 1)]);
    }

    #[test]
    fn skipping_reference_beats_skipping_hypothesis_on_ties() {
        // two equal-cost paths; preferring the vertical move keeps the early "a"
        let map = align(&["a", "b", "a"], &["b", "a", "b"], &Fixed(0.0));
        assert_eq!(map.into_iter().collect::<Vec<_>>(), [(0, 1), (1, 2)]);
    }

    #[test]
    fn deterministic_across_runs() {
        let r = toks(&["la", "la", "love", "you", "la"]);
        let h = toks(&["la", "lov", "you", "la", "la"]);
        let first = align_tokens(&r, &h, &SequenceMatcherRatio, DEFAULT_MATCH_THRESHOLD);
        let second = align_tokens(&r, &h, &SequenceMatcherRatio, DEFAULT_MATCH_THRESHOLD);
        assert_eq!(first, second);
    }
}
