//! Immutable WordPiece vocabulary.
//!
//! A vocabulary file is UTF-8 text with one token per line; the line order
//! defines the token id (0-indexed). Tokens starting with the continuation
//! prefix (conventionally `##`) are only valid as non-initial pieces of a word.
//!
//! The vocabulary is built once and never mutated, so a single
//! `Arc<Vocabulary>` can be shared by any number of encoders and threads.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::TokenizerError;

/// The reserved special tokens with structural meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialToken {
    Unk,
    Pad,
    Cls,
    Sep,
    Mask,
}

impl SpecialToken {
    pub const ALL: [SpecialToken; 5] = [
        SpecialToken::Unk,
        SpecialToken::Pad,
        SpecialToken::Cls,
        SpecialToken::Sep,
        SpecialToken::Mask,
    ];
}

impl fmt::Display for SpecialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpecialToken::Unk => "unk",
            SpecialToken::Pad => "pad",
            SpecialToken::Cls => "cls",
            SpecialToken::Sep => "sep",
            SpecialToken::Mask => "mask",
        };
        f.write_str(name)
    }
}

/// Surface strings of the special tokens as they appear in the vocabulary file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialTokens {
    pub unk: String,
    pub pad: String,
    pub cls: String,
    pub sep: String,
    pub mask: String,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            unk: "[UNK]".to_string(),
            pad: "[PAD]".to_string(),
            cls: "[CLS]".to_string(),
            sep: "[SEP]".to_string(),
            mask: "[MASK]".to_string(),
        }
    }
}

impl SpecialTokens {
    pub fn get(&self, which: SpecialToken) -> &str {
        match which {
            SpecialToken::Unk => &self.unk,
            SpecialToken::Pad => &self.pad,
            SpecialToken::Cls => &self.cls,
            SpecialToken::Sep => &self.sep,
            SpecialToken::Mask => &self.mask,
        }
    }
}

/// Bijective token <-> id mapping with dense ids `0..len()`.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Token string -> token ID lookup.
    token_to_id: HashMap<String, u32>,
    /// Token ID -> token string (for decoding).
    id_to_token: Vec<String>,
}

impl Vocabulary {
    /// Load a vocabulary file.
    ///
    /// Fails with [`TokenizerError::VocabLoad`] if the file cannot be read,
    /// is not UTF-8, holds no tokens, or repeats a token.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TokenizerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            TokenizerError::VocabLoad(format!(
                "failed to read vocabulary file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let vocab = Self::from_text(&text)?;
        info!(
            path = %path.display(),
            vocab_size = vocab.len(),
            "vocabulary loaded"
        );
        Ok(vocab)
    }

    /// Build a vocabulary from `vocab.txt` content.
    ///
    /// Trailing `\r` and surrounding ASCII whitespace are stripped from each
    /// line. Blank lines are skipped and do not consume an id.
    pub fn from_text(text: &str) -> Result<Self, TokenizerError> {
        let tokens = text
            .lines()
            .map(|line| line.trim_matches(|c: char| c.is_ascii_whitespace()))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::from_tokens(tokens)
    }

    /// Build a vocabulary from tokens indexed by id.
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self, TokenizerError> {
        if tokens.is_empty() {
            return Err(TokenizerError::VocabLoad(
                "vocabulary contains no tokens".to_string(),
            ));
        }
        if tokens.len() > u32::MAX as usize {
            return Err(TokenizerError::VocabLoad(format!(
                "vocabulary has {} tokens, more than a u32 id can address",
                tokens.len()
            )));
        }

        let mut token_to_id = HashMap::with_capacity(tokens.len());
        for (id, token) in tokens.iter().enumerate() {
            if let Some(previous) = token_to_id.insert(token.clone(), id as u32) {
                return Err(TokenizerError::VocabLoad(format!(
                    "duplicate token '{}' at ids {} and {}",
                    token, previous, id
                )));
            }
        }

        debug!(vocab_size = tokens.len(), "vocabulary built");

        Ok(Self {
            token_to_id,
            id_to_token: tokens,
        })
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    pub fn lookup(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    /// Token string for an id, or `None` if out of range.
    pub fn token(&self, id: u32) -> Option<&str> {
        self.id_to_token.get(id as usize).map(String::as_str)
    }

    /// Tokens in id order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.id_to_token.iter().map(String::as_str)
    }

    /// Resolve a special token to its id.
    ///
    /// Fails with [`TokenizerError::Config`] if the token named by `specials`
    /// is absent from the vocabulary.
    pub fn id_of_special(
        &self,
        which: SpecialToken,
        specials: &SpecialTokens,
    ) -> Result<u32, TokenizerError> {
        let token = specials.get(which);
        self.lookup(token).ok_or_else(|| {
            TokenizerError::Config(format!(
                "special token {} ('{}') is not in the vocabulary",
                which, token
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn test_from_tokens_dense_ids() {
        let vocab = Vocabulary::from_tokens(tokens(&["[PAD]", "[UNK]", "hello", "##s"])).unwrap();
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.lookup("[PAD]"), Some(0));
        assert_eq!(vocab.lookup("##s"), Some(3));
        assert_eq!(vocab.token(2), Some("hello"));
        assert_eq!(vocab.token(4), None);
        assert_eq!(vocab.lookup("world"), None);
    }

    #[test]
    fn test_from_tokens_empty_fails() {
        let err = Vocabulary::from_tokens(Vec::new()).unwrap_err();
        assert!(matches!(err, TokenizerError::VocabLoad(_)));
    }

    #[test]
    fn test_from_tokens_duplicate_fails() {
        let err = Vocabulary::from_tokens(tokens(&["a", "b", "a"])).unwrap_err();
        match err {
            TokenizerError::VocabLoad(msg) => assert!(msg.contains("duplicate token 'a'")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_text_strips_line_endings() {
        let vocab = Vocabulary::from_text("[PAD]\r\n[UNK]\r\nhello\r\n").unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.lookup("hello"), Some(2));
    }

    #[test]
    fn test_from_text_skips_blank_lines() {
        let vocab = Vocabulary::from_text("a\n\nb\n").unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.lookup("b"), Some(1));
    }

    #[test]
    fn test_from_text_whitespace_only_fails() {
        assert!(Vocabulary::from_text("\n\n  \n").is_err());
    }

    #[test]
    fn test_tokens_in_id_order() {
        let vocab = Vocabulary::from_text("x\ny\nz").unwrap();
        assert_eq!(vocab.tokens().collect::<Vec<_>>(), vec!["x", "y", "z"]);
    }

    // -----------------------------------------------------------------------
    // File loading
    // -----------------------------------------------------------------------

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[PAD]\n[UNK]\n[CLS]\n[SEP]\n泰\n##晤").unwrap();

        let vocab = Vocabulary::load(&path).unwrap();
        assert_eq!(vocab.len(), 6);
        assert_eq!(vocab.lookup("泰"), Some(4));
        assert_eq!(vocab.lookup("##晤"), Some(5));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Vocabulary::load("/nonexistent/vocab.txt").unwrap_err();
        match err {
            TokenizerError::VocabLoad(msg) => assert!(msg.contains("failed to read")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            Vocabulary::load(&path),
            Err(TokenizerError::VocabLoad(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Special tokens
    // -----------------------------------------------------------------------

    #[test]
    fn test_id_of_special() {
        let vocab = Vocabulary::from_text("[PAD]\n[UNK]\n[CLS]\n[SEP]\n[MASK]").unwrap();
        let specials = SpecialTokens::default();
        assert_eq!(vocab.id_of_special(SpecialToken::Pad, &specials).unwrap(), 0);
        assert_eq!(vocab.id_of_special(SpecialToken::Unk, &specials).unwrap(), 1);
        assert_eq!(vocab.id_of_special(SpecialToken::Cls, &specials).unwrap(), 2);
        assert_eq!(vocab.id_of_special(SpecialToken::Sep, &specials).unwrap(), 3);
        assert_eq!(vocab.id_of_special(SpecialToken::Mask, &specials).unwrap(), 4);
    }

    #[test]
    fn test_id_of_special_missing() {
        let vocab = Vocabulary::from_text("[UNK]\n[CLS]\n[SEP]").unwrap();
        let err = vocab
            .id_of_special(SpecialToken::Mask, &SpecialTokens::default())
            .unwrap_err();
        match err {
            TokenizerError::Config(msg) => assert!(msg.contains("mask")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_id_of_special_custom_names() {
        let vocab = Vocabulary::from_text("<unk>\n<s>\n</s>").unwrap();
        let specials = SpecialTokens {
            unk: "<unk>".to_string(),
            cls: "<s>".to_string(),
            sep: "</s>".to_string(),
            ..SpecialTokens::default()
        };
        assert_eq!(vocab.id_of_special(SpecialToken::Cls, &specials).unwrap(), 1);
        assert_eq!(vocab.id_of_special(SpecialToken::Sep, &specials).unwrap(), 2);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Vocabulary>();
    }
}
