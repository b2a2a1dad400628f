//! WordPiece tokenization for BERT-family models.
//!
//! The pipeline is split into stages that can be used on their own:
//!
//! - [`normalizer`]: text cleanup, lowercasing and accent stripping.
//! - [`segmenter`]: whitespace, punctuation and CJK segmentation.
//! - [`vocab`]: the token/id vocabulary.
//! - [`wordpiece`]: greedy longest-match subword splitting.
//! - [`encoder`]: special tokens, truncation, padding and batching.
//!
//! [`BertTokenizer`] ties them together and implements the [`Tokenizer`] trait.

pub mod config;
pub mod encoder;
pub mod encoding;
pub mod normalizer;
pub mod segmenter;
pub mod truncation;
pub mod vocab;
pub mod wordpiece;

pub use config::{EncodeOptions, PaddingSide, PaddingStrategy, TokenizerConfig, TruncationStrategy};
pub use encoder::BertTokenizer;
pub use encoding::EncodedSequence;
pub use normalizer::Normalizer;
pub use segmenter::BasicSegmenter;
pub use vocab::{SpecialToken, SpecialTokens, Vocabulary};
pub use wordpiece::{Subword, UnkFallback, WordPiece};

/// A tokenizer that converts text to token IDs and back.
///
/// All implementations must be thread-safe (`Send + Sync`) for concurrent use
/// across multiple threads.
pub trait Tokenizer: Send + Sync {
    /// Encode text into a sequence of token IDs.
    ///
    /// When `add_special_tokens` is true the sequence is wrapped as
    /// `[CLS] ... [SEP]`. No truncation is applied.
    fn encode(&self, text: &str, add_special_tokens: bool) -> Vec<u32>;

    /// Decode a sequence of token IDs back into text, skipping special tokens.
    fn decode(&self, ids: &[u32]) -> String;

    /// Return the total vocabulary size.
    fn vocab_size(&self) -> usize;

    /// Classification token ID, if applicable.
    fn cls_token_id(&self) -> Option<u32>;

    /// Separator token ID, if applicable.
    fn sep_token_id(&self) -> Option<u32>;

    /// Padding token ID, if applicable.
    fn pad_token_id(&self) -> Option<u32>;
}
