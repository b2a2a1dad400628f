pub mod cli;
pub mod error;
pub mod tokenizer;

pub use error::TokenizerError;
pub use tokenizer::{
    BertTokenizer, EncodeOptions, EncodedSequence, PaddingSide, PaddingStrategy, Tokenizer,
    TokenizerConfig, TruncationStrategy, Vocabulary,
};
