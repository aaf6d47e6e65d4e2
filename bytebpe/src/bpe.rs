//! The pair-counting and merge-application primitives at the heart of BPE (byte pair encoding).
//!
//! Both the trainer and the encode loop are driven by the same two operations: scan a token
//! sequence for adjacent pairs, then rewrite the sequence with one pair collapsed into a single
//! token.  Training runs them with a "most frequent pair wins" policy, encoding with a "lowest
//! merge rank wins" policy; the primitives themselves don't care which.
//!
//! Every merge step here re-scans the full sequence, which is O(merges × sequence length)
//! overall.  That's fine at the scale this crate targets (thousands of merges over tens of
//! thousands of characters).  A faster variant would maintain pair counts incrementally, updating
//! only the pairs adjacent to each merge site; as long as it selects the same pairs it can
//! replace these functions without changing any caller.

use crate::TokenInt;
use itertools::Itertools;
use rustc_hash::FxHashMap;

/// Count every ordered pair of immediately adjacent tokens in `ids`.
///
/// A sequence with fewer than two elements has no adjacent pairs and yields an empty map.
/// Overlapping occurrences all count: `[a, a, a]` counts `(a, a)` twice.
pub fn count_pairs(ids: &[TokenInt]) -> FxHashMap<(TokenInt, TokenInt), usize> {
    let mut counts = FxHashMap::default();
    for pair in ids.iter().copied().tuple_windows::<(_, _)>() {
        *counts.entry(pair).or_insert(0usize) += 1;
    }
    counts
}

/// Produce a copy of `ids` with every occurrence of `pair` replaced by `new_id`.
///
/// Replacement is greedy and left to right: at each position, if the current and next token match
/// `pair` exactly, `new_id` is emitted and the cursor advances past both.  Candidate occurrences
/// therefore never overlap; `[a, a, a]` with pair `(a, a)` becomes `[new_id, a]`, with the third
/// `a` left alone because its left neighbor was already consumed.
pub fn merge_pair(ids: &[TokenInt], pair: (TokenInt, TokenInt), new_id: TokenInt) -> Vec<TokenInt> {
    let mut merged = Vec::with_capacity(ids.len());
    let mut i = 0;
    while i < ids.len() {
        if i + 1 < ids.len() && (ids[i], ids[i + 1]) == pair {
            merged.push(new_id);
            i += 2;
        } else {
            merged.push(ids[i]);
            i += 1;
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_pairs_short_sequences_have_no_pairs() {
        assert!(count_pairs(&[]).is_empty());
        assert!(count_pairs(&[7]).is_empty());
    }

    #[test]
    fn count_pairs_counts_adjacent_pairs() {
        let counts = count_pairs(&[1, 2, 2, 3, 1, 2]);

        assert_eq!(counts.len(), 4);
        assert_eq!(counts[&(1, 2)], 2);
        assert_eq!(counts[&(2, 2)], 1);
        assert_eq!(counts[&(2, 3)], 1);
        assert_eq!(counts[&(3, 1)], 1);
    }

    #[test]
    fn count_pairs_counts_overlapping_occurrences() {
        let counts = count_pairs(&[5, 5, 5]);

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&(5, 5)], 2);
    }

    #[test]
    fn merge_pair_replaces_every_occurrence() {
        assert_eq!(
            merge_pair(&[1, 2, 9, 1, 2], (1, 2), 300),
            vec![300, 9, 300]
        );
    }

    #[test]
    fn merge_pair_is_greedy_and_non_overlapping() {
        // The first two tokens merge; the third has no left neighbor left to pair with
        assert_eq!(merge_pair(&[5, 5, 5], (5, 5), 300), vec![300, 5]);
        assert_eq!(merge_pair(&[5, 5, 5, 5], (5, 5), 300), vec![300, 300]);
        assert_eq!(merge_pair(&[5, 5, 5, 5, 5], (5, 5), 300), vec![300, 300, 5]);
    }

    #[test]
    fn merge_pair_leaves_unmatched_sequences_alone() {
        assert_eq!(merge_pair(&[1, 2, 3], (8, 9), 300), vec![1, 2, 3]);
        assert_eq!(merge_pair(&[], (8, 9), 300), Vec::<TokenInt>::new());
        assert_eq!(merge_pair(&[8], (8, 9), 300), vec![8]);
    }

    #[test]
    fn merge_pair_matches_at_the_end_of_the_sequence() {
        assert_eq!(merge_pair(&[9, 8, 9], (8, 9), 300), vec![9, 300]);
    }
}
