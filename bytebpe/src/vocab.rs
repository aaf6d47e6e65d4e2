//! The trained model: the vocabulary of token byte sequences and the ordered merge table.
//!
//! Both halves are built once by the trainer and never mutated afterwards.  The merge table's
//! ordering is load bearing: the rank of a merge (its insertion position) decides which merge the
//! encoder applies first, so it is kept as an explicit list rather than relying on any map's
//! iteration order.

use crate::{TokenInt, TokenString, BYTE_VOCAB_SIZE};
use rustc_hash::FxHashMap;

/// Mapping of integer token IDs to the byte sequences they stand for.
///
/// IDs are dense: every ID in `0..len()` is present.  The first [`BYTE_VOCAB_SIZE`] entries are
/// the single raw bytes; every later entry is the concatenation of two earlier entries, appended
/// by the trainer as it learns merges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocab(Vec<TokenString>);

impl Vocab {
    /// A vocabulary holding only the 256 raw byte tokens, the starting point for every training
    /// run.
    pub fn byte_alphabet() -> Self {
        Self((0..=u8::MAX).map(|byte| vec![byte]).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The byte sequence for a token, or `None` if the ID is outside this vocabulary.
    pub fn bytes_for_token(&self, token: TokenInt) -> Option<&[u8]> {
        self.0.get(token).map(Vec::as_slice)
    }

    /// Append the token formed by merging `left` and `right`, returning its newly assigned ID.
    ///
    /// The new entry's bytes are the parents' bytes concatenated in order, so the vocabulary
    /// invariant that every merged token decodes to exactly its parents' bytes holds by
    /// construction.
    pub(crate) fn push_merged(&mut self, (left, right): (TokenInt, TokenInt)) -> TokenInt {
        let mut bytes = self
            .bytes_for_token(left)
            .expect("BUG: merge parent is not in the vocabulary")
            .to_vec();
        bytes.extend_from_slice(
            self.bytes_for_token(right)
                .expect("BUG: merge parent is not in the vocabulary"),
        );

        self.0.push(bytes);
        self.0.len() - 1
    }

    /// All (ID, bytes) entries in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenInt, &[u8])> {
        self.0
            .iter()
            .enumerate()
            .map(|(token, bytes)| (token, bytes.as_slice()))
    }
}

/// The ordered list of learned merges, with a hash index for rank lookups.
///
/// The n-th merge (0-indexed) always produces token ID `BYTE_VOCAB_SIZE + n`, so the table
/// doesn't store the produced ID at all; it falls out of the rank.  Lower rank means the merge
/// was learned earlier in training and takes priority at encode time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeTable {
    /// Pairs in the order they were learned; the index is the merge rank
    entries: Vec<(TokenInt, TokenInt)>,

    /// Reverse index from pair to its rank in `entries`
    ranks: FxHashMap<(TokenInt, TokenInt), usize>,
}

impl MergeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of merges learned so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record `pair` as the next merge, returning the token ID the merge produces.
    pub(crate) fn push(&mut self, pair: (TokenInt, TokenInt)) -> TokenInt {
        debug_assert!(
            !self.ranks.contains_key(&pair),
            "BUG: pair {pair:?} was already merged"
        );

        let rank = self.entries.len();
        self.entries.push(pair);
        self.ranks.insert(pair, rank);

        BYTE_VOCAB_SIZE + rank
    }

    /// The rank of `pair` if it was learned during training.
    pub fn rank(&self, pair: (TokenInt, TokenInt)) -> Option<usize> {
        self.ranks.get(&pair).copied()
    }

    /// The token ID that merging `pair` produces, if the pair was learned during training.
    pub fn token_for_pair(&self, pair: (TokenInt, TokenInt)) -> Option<TokenInt> {
        self.rank(pair).map(|rank| BYTE_VOCAB_SIZE + rank)
    }

    /// All `((left, right), produced_id)` entries in rank order.
    ///
    /// This is the order-preserving view a caller would persist if it wants to serialize the
    /// model.
    pub fn iter(&self) -> impl Iterator<Item = ((TokenInt, TokenInt), TokenInt)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(rank, &pair)| (pair, BYTE_VOCAB_SIZE + rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_alphabet_covers_every_byte() {
        let vocab = Vocab::byte_alphabet();

        assert_eq!(vocab.len(), BYTE_VOCAB_SIZE);
        for byte in 0..=u8::MAX {
            assert_eq!(vocab.bytes_for_token(byte as TokenInt), Some(&[byte][..]));
        }
        assert_eq!(vocab.bytes_for_token(256), None);
    }

    #[test]
    fn push_merged_concatenates_parents_in_order() {
        let mut vocab = Vocab::byte_alphabet();

        let ab = vocab.push_merged((b'a' as TokenInt, b'b' as TokenInt));
        assert_eq!(ab, 256);
        assert_eq!(vocab.bytes_for_token(ab), Some(&b"ab"[..]));

        let abc = vocab.push_merged((ab, b'c' as TokenInt));
        assert_eq!(abc, 257);
        assert_eq!(vocab.bytes_for_token(abc), Some(&b"abc"[..]));
        assert_eq!(vocab.len(), BYTE_VOCAB_SIZE + 2);
    }

    #[test]
    fn iter_walks_entries_in_id_order() {
        let mut vocab = Vocab::byte_alphabet();
        vocab.push_merged((b'h' as TokenInt, b'i' as TokenInt));

        let entries: Vec<_> = vocab.iter().collect();
        assert_eq!(entries.len(), BYTE_VOCAB_SIZE + 1);
        assert_eq!(entries[0], (0, &[0u8][..]));
        assert_eq!(entries[256], (256, &b"hi"[..]));
    }

    #[test]
    fn merge_table_assigns_sequential_ids_by_rank() {
        let mut merges = MergeTable::new();

        assert_eq!(merges.push((97, 97)), 256);
        assert_eq!(merges.push((256, 97)), 257);
        assert_eq!(merges.push((97, 98)), 258);

        assert_eq!(merges.rank((97, 97)), Some(0));
        assert_eq!(merges.rank((97, 98)), Some(2));
        assert_eq!(merges.rank((98, 97)), None);
        assert_eq!(merges.token_for_pair((256, 97)), Some(257));

        let entries: Vec<_> = merges.iter().collect();
        assert_eq!(
            entries,
            vec![((97, 97), 256), ((256, 97), 257), ((97, 98), 258)]
        );
    }
}
