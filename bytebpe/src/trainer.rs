//! Learns a vocabulary and merge table from a raw text corpus.
//!
//! Training is the classic greedy BPE loop: encode the corpus as raw bytes, then repeatedly
//! replace the most frequent adjacent token pair with a freshly allocated token until the
//! vocabulary reaches its target size or nothing repeats any more.  Given the same corpus and
//! options the result is bit-for-bit reproducible; there is no randomness anywhere in the loop.

use crate::error::{EmptyCorpusSnafu, VocabSizeTooSmallSnafu};
use crate::{bpe, MergeTable, Result, TokenInt, Vocab, BYTE_VOCAB_SIZE};
use snafu::ensure;
use std::cmp::Reverse;
use tracing::{debug, trace};

/// Options controlling a training run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainOptions {
    /// Total vocabulary size to aim for, raw byte tokens included.  Must be at least 256; the
    /// number of merges learned is `target_vocab_size - 256`, fewer if the corpus runs out of
    /// repeated pairs first.
    pub target_vocab_size: usize,

    /// If set, only the first `sample_size` *characters* of the corpus are used.
    ///
    /// This is a speed/quality trade-off knob for large corpora, not a correctness requirement.
    /// Note the limit is applied to the character stream before UTF-8 byte encoding, so for
    /// multi-byte scripts the byte count used for training will be larger than `sample_size`.
    pub sample_size: Option<usize>,
}

impl Default for TrainOptions {
    fn default() -> Self {
        // Suited to corpora in the hundreds-of-kilobytes range; small enough to train in seconds
        Self {
            target_vocab_size: 5000,
            sample_size: Some(20_000),
        }
    }
}

/// Train a vocabulary and merge table from `corpus` per `options`.
///
/// Fails if `options.target_vocab_size` can't even hold the raw byte alphabet, or if merges were
/// requested but the (possibly sampled) corpus is empty.  Running out of repeated pairs before
/// reaching the target size is not an error; the returned vocabulary is simply smaller than
/// requested.
pub fn train(corpus: &str, options: TrainOptions) -> Result<(Vocab, MergeTable)> {
    let (vocab, merges, _ids) = train_ids(corpus, options)?;
    Ok((vocab, merges))
}

/// The training loop proper.  Also returns the fully merged ID sequence of the training corpus,
/// which tests use to check that encode reproduces training's segmentation exactly.
pub(crate) fn train_ids(
    corpus: &str,
    options: TrainOptions,
) -> Result<(Vocab, MergeTable, Vec<TokenInt>)> {
    ensure!(
        options.target_vocab_size >= BYTE_VOCAB_SIZE,
        VocabSizeTooSmallSnafu {
            requested: options.target_vocab_size
        }
    );

    let corpus = truncate_chars(corpus, options.sample_size);
    let num_merges = options.target_vocab_size - BYTE_VOCAB_SIZE;
    ensure!(
        !corpus.is_empty() || num_merges == 0,
        EmptyCorpusSnafu {
            requested_merges: num_merges
        }
    );

    let mut vocab = Vocab::byte_alphabet();
    let mut merges = MergeTable::new();
    let mut ids: Vec<TokenInt> = corpus.bytes().map(TokenInt::from).collect();
    let input_len = ids.len();

    for _ in 0..num_merges {
        let counts = bpe::count_pairs(&ids);

        // Highest count wins.  Ties break towards the smallest (left, right) pair so two
        // trainings of the same corpus always learn the same merges in the same order.
        let best = counts
            .iter()
            .max_by_key(|&(&pair, &count)| (count, Reverse(pair)))
            .map(|(&pair, &count)| (pair, count));

        // A pair that occurs only once compresses nothing; the corpus is exhausted
        let Some((pair, count)) = best else { break };
        if count < 2 {
            break;
        }

        let new_id = merges.push(pair);
        let vocab_id = vocab.push_merged(pair);
        debug_assert_eq!(new_id, vocab_id, "BUG: merge table and vocab disagree on IDs");

        ids = bpe::merge_pair(&ids, pair, new_id);
        trace!(?pair, new_id, count, "learned merge");
    }

    let compression_ratio = if ids.is_empty() {
        1.0
    } else {
        input_len as f64 / ids.len() as f64
    };
    debug!(
        input_bytes = input_len,
        output_tokens = ids.len(),
        merges = merges.len(),
        compression_ratio,
        "training complete"
    );

    Ok((vocab, merges, ids))
}

/// Limit `text` to its first `limit` characters, on the character stream rather than the byte
/// stream, so a multi-byte character is either kept whole or dropped whole.
fn truncate_chars(text: &str, limit: Option<usize>) -> &str {
    match limit {
        Some(limit) => match text.char_indices().nth(limit) {
            Some((boundary, _)) => &text[..boundary],
            None => text,
        },
        None => text,
    }
}
