use crate::TokenInt;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ByteBpeError {
    /// Construction-time configuration error.  The vocabulary must at least hold the 256 raw byte
    /// tokens, so any smaller target cannot represent arbitrary input.
    #[snafu(display(
        "Target vocab size {requested} is too small; the byte alphabet alone needs 256 entries"
    ))]
    VocabSizeTooSmall { requested: usize },

    /// Construction-time configuration error.  Merges were requested but there is no corpus to
    /// learn them from.
    #[snafu(display("Cannot learn {requested_merges} merges from an empty corpus"))]
    EmptyCorpus { requested_merges: usize },

    /// Construction-time configuration error when assembling a tokenizer from externally held
    /// model parts whose sizes don't agree.
    #[snafu(display(
        "Vocabulary of {vocab_len} entries doesn't match a merge table of {merges_len} merges; \
         expected the vocabulary to hold exactly 256 + {merges_len} entries"
    ))]
    MismatchedModelParts { vocab_len: usize, merges_len: usize },

    /// Decode was given an ID that this tokenizer's vocabulary doesn't contain.
    #[snafu(display("Token {token} is not in the vocabulary (vocab size {vocab_size})"))]
    UnknownToken {
        token: TokenInt,
        vocab_size: usize,
    },
}
