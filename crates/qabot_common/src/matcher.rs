//! Fuzzy question matching
//!
//! Similarity is the Ratcliff/Obershelp ratio: find the longest common
//! contiguous block, recurse on the pieces left and right of it, and score
//! `2 * matched / (len(a) + len(b))`. The 0.6 threshold is calibrated for
//! this measure; edit-distance or token-overlap scores are not
//! interchangeable with it.

use crate::knowledge::KnowledgeBase;
use std::collections::HashMap;
use tracing::debug;

/// Minimum score for a stored question to count as a match
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Sequences at least this long get the popular-element heuristic
const AUTOJUNK_MIN_LEN: usize = 200;

/// A candidate that cleared the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch<'a> {
    pub question: &'a str,
    pub score: f64,
}

/// Similarity of two strings in `0.0..=1.0` (case-sensitive)
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    SequenceMatcher::new(&a, &b).ratio()
}

/// Highest-scoring candidate at or above [`SIMILARITY_THRESHOLD`].
///
/// Comparison ignores case. Among equal top scores the earliest candidate
/// wins. The returned text is the candidate as given.
pub fn find_best_match<'a, I>(input: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    best_match(input, candidates, SIMILARITY_THRESHOLD).map(|m| m.question)
}

/// Like [`find_best_match`] with an explicit cutoff, reporting the score
pub fn best_match<'a, I>(input: &str, candidates: I, cutoff: f64) -> Option<BestMatch<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let input: Vec<char> = input.to_lowercase().chars().collect();
    let mut best: Option<BestMatch<'a>> = None;

    for candidate in candidates {
        let lowered: Vec<char> = candidate.to_lowercase().chars().collect();
        let matcher = SequenceMatcher::new(&lowered, &input);

        // Upper bounds first; they are cheap and never exclude a real match
        if matcher.real_quick_ratio() < cutoff || matcher.quick_ratio() < cutoff {
            continue;
        }

        let score = matcher.ratio();
        if score < cutoff {
            continue;
        }

        if best.map_or(true, |b| score > b.score) {
            best = Some(BestMatch {
                question: candidate,
                score,
            });
        }
    }

    match &best {
        Some(m) => debug!(question = m.question, score = m.score, "Best match"),
        None => debug!(cutoff, "No candidate cleared the cutoff"),
    }

    best
}

/// Answer for the first stored question equal to `question`, ignoring case.
///
/// Returns `None` when no question matches, and also when the first match
/// holds an empty answer.
pub fn get_answer<'a>(question: &str, kb: &'a KnowledgeBase) -> Option<&'a str> {
    kb.iter()
        .find(|pair| pair.asks(question))
        .filter(|pair| pair.has_answer())
        .map(|pair| pair.answer.as_str())
}

/// Ratcliff/Obershelp matcher over two char sequences.
///
/// `b` is indexed once; for long `b`, elements occurring in more than 1% of
/// positions are left out of the index and can only join a match by
/// extending one found through other elements.
struct SequenceMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> SequenceMatcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    fn ratio(&self) -> f64 {
        let matched: usize = self.matching_blocks().iter().map(|&(_, _, size)| size).sum();
        calculate_ratio(matched, self.a.len() + self.b.len())
    }

    /// Bound from the multiset of shared characters
    fn quick_ratio(&self) -> f64 {
        let mut available: HashMap<char, isize> = HashMap::new();
        for &c in self.b {
            *available.entry(c).or_insert(0) += 1;
        }

        let mut matched = 0;
        for c in self.a {
            if let Some(n) = available.get_mut(c) {
                if *n > 0 {
                    matched += 1;
                }
                *n -= 1;
            }
        }

        calculate_ratio(matched, self.a.len() + self.b.len())
    }

    /// Bound from the lengths alone
    fn real_quick_ratio(&self) -> f64 {
        let (la, lb) = (self.a.len(), self.b.len());
        calculate_ratio(la.min(lb), la + lb)
    }

    /// Non-overlapping matching blocks as `(i, j, size)`, in no particular order
    fn matching_blocks(&self) -> Vec<(usize, usize, usize)> {
        let mut blocks = Vec::new();
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            blocks.push((i, j, k));
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }

        blocks
    }

    /// Longest block with `a[i..i+k] == b[j..j+k]` inside the given ranges.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);
        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Grow the block over elements the index left out
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }
}

fn calculate_ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        2.0 * matched as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::QaPair;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_ratio_known_values() {
        // Values cross-checked against difflib.SequenceMatcher
        assert_close(similarity("abcd", "bcde"), 0.75);
        assert_close(similarity("hello", "hello"), 1.0);
        assert_close(similarity("abc", "xyz"), 0.0);
        assert_close(similarity("", ""), 1.0);
        assert_close(similarity("abc", ""), 0.0);
        // Longest block "ab", then "d" to its right: 2 * 3 / 8
        assert_close(similarity("abxd", "abyd"), 0.75);
    }

    #[test]
    fn test_ratio_sums_blocks_on_both_sides() {
        // "ab" is found first, then "cd" to its right
        let score = similarity("qabxcd", "abycdf");
        assert_close(score, 2.0 * 4.0 / 12.0);
    }

    #[test]
    fn test_exact_text_any_case_matches() {
        let candidates = ["What is your name?", "How old are you?"];
        assert_eq!(
            find_best_match("WHAT IS YOUR NAME?", candidates.iter().copied()),
            Some("What is your name?")
        );
    }

    #[test]
    fn test_near_duplicate_matches() {
        let candidates = ["What is your name?"];
        assert_eq!(
            find_best_match("what is your name", candidates.iter().copied()),
            Some("What is your name?")
        );
    }

    #[test]
    fn test_unrelated_input_has_no_match() {
        let candidates = ["What is your name?", "How old are you?"];
        assert_eq!(find_best_match("xyz", candidates.iter().copied()), None);
        assert_eq!(find_best_match("anything", std::iter::empty()), None);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // "abcd" vs "bcde" scores exactly 0.75
        let candidates = ["bcde"];
        let found = best_match("abcd", candidates.iter().copied(), 0.75).unwrap();
        assert_close(found.score, 0.75);
        assert!(best_match("abcd", candidates.iter().copied(), 0.76).is_none());
    }

    #[test]
    fn test_default_threshold_accepts_exact_score() {
        // 3 shared chars over 10 total gives exactly 0.6
        assert_eq!(similarity("abcdefg", "abc"), SIMILARITY_THRESHOLD);
        let candidates = ["abcdefg"];
        assert_eq!(find_best_match("ABC", candidates.iter().copied()), Some("abcdefg"));
        assert_eq!(find_best_match("abx", candidates.iter().copied()), None);
    }

    #[test]
    fn test_ties_go_to_first_candidate() {
        let candidates = ["abce", "abcf"];
        let found = best_match("abcd", candidates.iter().copied(), 0.6).unwrap();
        assert_eq!(found.question, "abce");
    }

    #[test]
    fn test_highest_score_wins_over_order() {
        let candidates = ["how are", "how are you?"];
        assert_eq!(
            find_best_match("how are you", candidates.iter().copied()),
            Some("how are you?")
        );
    }

    #[test]
    fn test_popular_characters_in_long_input() {
        // Past 200 chars, very common characters are not indexed but the
        // score still reflects the surrounding matches
        let long = "a".repeat(250);
        let score = similarity(&long, &long);
        assert_close(score, 1.0);

        let mixed_b = format!("xyz{}", "a".repeat(250));
        assert_close(similarity("xyz", &mixed_b), 2.0 * 3.0 / 256.0);
    }

    #[test]
    fn test_get_answer_is_case_insensitive_first_wins() {
        let kb = KnowledgeBase::from_pairs(vec![
            QaPair::new("Hi", "Hello!"),
            QaPair::new("hi", "Second"),
        ]);
        assert_eq!(get_answer("HI", &kb), Some("Hello!"));
        assert_eq!(get_answer("bye", &kb), None);
    }

    #[test]
    fn test_get_answer_empty_answer_is_none() {
        let kb = KnowledgeBase::from_pairs(vec![
            QaPair::new("Ping", "   "),
            QaPair::new("ping", "pong"),
        ]);
        assert_eq!(get_answer("ping", &kb), None);
    }
}
