/// A token output by the tokenizer, represented in its integer form.
///
/// Each token is just a byte sequence that occurs in the training corpus, but in practice it's the
/// integer ID of that sequence in the vocabulary that gets fed into downstream models, so the
/// integer form is what encode produces and decode consumes.  IDs below
/// [`BYTE_VOCAB_SIZE`] stand for single raw bytes; everything above was learned by merging.
pub type TokenInt = usize;

/// A token represented in its byte string form.
///
/// Users of tokenizing libraries usually are interested in the integer representation, as defined
/// by [`TokenInt`], but internally we need to store the byte sequences as well so decode can map
/// IDs back to the bytes they came from.
pub type TokenString = Vec<u8>;

/// The number of tokens every vocabulary starts with: one per possible byte value.
///
/// IDs `0..BYTE_VOCAB_SIZE` are fixed and always decode to the single byte equal to the ID.  The
/// first learned merge is assigned ID `BYTE_VOCAB_SIZE`, the next one `BYTE_VOCAB_SIZE + 1`, and
/// so on.
pub const BYTE_VOCAB_SIZE: usize = 256;
