//! A trainable byte-level BPE (byte pair encoding) subword tokenizer.
//!
//! Unlike tokenizers that ship a fixed vocabulary, this crate learns its vocabulary from whatever
//! corpus you give it: training counts adjacent byte-pair frequencies and greedily merges the most
//! frequent pair into a new token, over and over, until the vocabulary reaches a target size.
//! The resulting merge table then drives [`Tokenizer::encode`] and [`Tokenizer::decode`], which
//! map arbitrary UTF-8 text to integer token IDs and back with exact round-trip fidelity.

use snafu::OptionExt;
use std::sync::Arc;

mod bpe;
mod error;
mod token;
mod trainer;
mod vocab;

pub use bpe::*;
pub use error::*;
pub use token::*;
pub use trainer::*;
pub use vocab::*;

pub type Result<T> = std::result::Result<T, ByteBpeError>;

/// The trained model: a vocabulary plus the ordered merges that produced it.
struct Model {
    vocab: Vocab,
    merges: MergeTable,
}

/// A byte-level BPE tokenizer bound to one trained vocabulary and merge table.
///
/// Instances are light weight and can be very cheaply cloned.  They are also thread safe: the
/// model is built once at construction and never mutated, so a single instance can encode and
/// decode text on multiple threads simultaneously, although with Rust ownership rules it's
/// usually more convenient to hand each thread its own clone.
#[derive(Clone)]
pub struct Tokenizer {
    model: Arc<Model>,
}

impl Tokenizer {
    /// Train a new tokenizer on `corpus`.
    ///
    /// This is a blocking, one-shot setup cost: pay it once, then share the resulting tokenizer
    /// with however many callers need it.  See [`TrainOptions`] for the knobs.
    pub fn train(corpus: &str, options: TrainOptions) -> Result<Self> {
        let (vocab, merges) = trainer::train(corpus, options)?;
        Ok(Self::assemble(vocab, merges))
    }

    /// Assemble a tokenizer from externally held model parts, for callers that persist the
    /// vocabulary and merge list themselves and want to skip retraining.
    ///
    /// The parts must belong together: the vocabulary has to hold exactly one entry per possible
    /// byte plus one per merge.  This only checks that size relationship, not that every merged
    /// entry spells out its parents' bytes; garbage in, garbage out.
    pub fn from_parts(vocab: Vocab, merges: MergeTable) -> Result<Self> {
        snafu::ensure!(
            vocab.len() == BYTE_VOCAB_SIZE + merges.len(),
            MismatchedModelPartsSnafu {
                vocab_len: vocab.len(),
                merges_len: merges.len()
            }
        );

        Ok(Self::assemble(vocab, merges))
    }

    fn assemble(vocab: Vocab, merges: MergeTable) -> Self {
        Self {
            model: Arc::new(Model { vocab, merges }),
        }
    }

    /// The number of tokens this tokenizer can produce, learned merges included.
    pub fn vocab_size(&self) -> usize {
        self.model.vocab.len()
    }

    /// The vocabulary this tokenizer decodes with.
    pub fn vocab(&self) -> &Vocab {
        &self.model.vocab
    }

    /// The ordered merge table this tokenizer encodes with.
    pub fn merges(&self) -> &MergeTable {
        &self.model.merges
    }

    /// Encode text into a sequence of token IDs.
    ///
    /// The text's UTF-8 bytes start out one token each, then learned merges are applied in
    /// training order: of all adjacent pairs currently present in the sequence, the one learned
    /// *earliest* during training merges first.  Replaying merges in exactly the order training
    /// discovered them is what makes encoding reproduce the segmentation training itself settled
    /// on; picking by frequency-in-this-input instead would produce different, inconsistent
    /// splits.
    ///
    /// Encoding cannot fail; text with no learnable pairs simply comes back as one token per
    /// byte.
    pub fn encode(&self, text: impl AsRef<str>) -> Vec<TokenInt> {
        let mut ids: Vec<TokenInt> = text.as_ref().bytes().map(TokenInt::from).collect();

        while ids.len() >= 2 {
            let next = count_pairs(&ids)
                .into_keys()
                .filter_map(|pair| self.model.merges.rank(pair).map(|rank| (rank, pair)))
                .min_by_key(|&(rank, _)| rank);

            // No pair in the sequence was ever learned; nothing else can be merged
            let Some((rank, pair)) = next else { break };
            ids = merge_pair(&ids, pair, BYTE_VOCAB_SIZE + rank);
        }

        ids
    }

    /// Decode a sequence of token IDs back into text.
    ///
    /// Fails only if a token isn't in this tokenizer's vocabulary, which means the IDs came from
    /// a different (or bigger) model.  IDs that *are* in the vocabulary always decode to some
    /// string: a sequence that splits a multi-byte UTF-8 character across a token boundary can't
    /// come out of [`Self::encode`], but a caller can hand us one, and each invalid byte run is
    /// then replaced with U+FFFD rather than failing the whole decode.
    pub fn decode(&self, tokens: &[TokenInt]) -> Result<String> {
        let mut bytes = Vec::with_capacity(tokens.len() * 2);
        for &token in tokens {
            let seq = self
                .model
                .vocab
                .bytes_for_token(token)
                .with_context(|| UnknownTokenSnafu {
                    token,
                    vocab_size: self.model.vocab.len(),
                })?;
            bytes.extend_from_slice(seq);
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
