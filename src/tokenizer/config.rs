//! Tokenizer configuration.
//!
//! [`TokenizerConfig`] enumerates every recognised option with its default.
//! It can be built in code or deserialized from JSON; missing fields take
//! their defaults.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::vocab::SpecialTokens;
use super::wordpiece::{DEFAULT_CONTINUATION_PREFIX, DEFAULT_MAX_INPUT_CHARS_PER_WORD};
use crate::error::TokenizerError;

/// Default maximum encoded length, special tokens included.
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// How to shorten a sequence (pair) that exceeds `max_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationStrategy {
    /// Drop the last token of the longer segment until the total fits; ties
    /// drop from the second segment.
    #[default]
    LongestFirst,
    /// Drop only from the first segment.
    OnlyFirst,
    /// Drop only from the second segment.
    OnlySecond,
    /// Never truncate; the output may exceed `max_length`.
    DoNotTruncate,
}

/// Whether and how to pad encoded sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingStrategy {
    #[default]
    DoNotPad,
    /// Pad every sequence to `max_length`.
    MaxLength,
    /// Pad every sequence of a batch to the longest one in that batch.
    Longest,
}

/// Which end of the sequence receives padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingSide {
    #[default]
    Right,
    Left,
}

macro_rules! snake_case_enum {
    ($ty:ident, $($variant:ident => $name:literal),+ $(,)?) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = TokenizerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(TokenizerError::Config(format!(
                        "unknown {} '{}'. Options: {}",
                        stringify!($ty),
                        s,
                        [$($name),+].join(", ")
                    ))),
                }
            }
        }
    };
}

snake_case_enum!(
    TruncationStrategy,
    LongestFirst => "longest_first",
    OnlyFirst => "only_first",
    OnlySecond => "only_second",
    DoNotTruncate => "do_not_truncate",
);

snake_case_enum!(
    PaddingStrategy,
    DoNotPad => "do_not_pad",
    MaxLength => "max_length",
    Longest => "longest",
);

snake_case_enum!(
    PaddingSide,
    Right => "right",
    Left => "left",
);

/// Per-call length, truncation and padding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Maximum encoded length including special tokens. `None` disables both
    /// truncation and `MaxLength` padding.
    pub max_length: Option<usize>,
    pub truncation: TruncationStrategy,
    pub padding: PaddingStrategy,
    pub padding_side: PaddingSide,
    /// Number of context tokens kept before the removed tail in
    /// `overflowing_tokens` (`only_first` / `only_second` only).
    pub stride: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_length: Some(DEFAULT_MAX_LENGTH),
            truncation: TruncationStrategy::default(),
            padding: PaddingStrategy::default(),
            padding_side: PaddingSide::default(),
            stride: 0,
        }
    }
}

impl EncodeOptions {
    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_truncation(mut self, truncation: TruncationStrategy) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn with_padding(mut self, padding: PaddingStrategy) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_padding_side(mut self, padding_side: PaddingSide) -> Self {
        self.padding_side = padding_side;
        self
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }
}

/// Full configuration of a [`BertTokenizer`](super::BertTokenizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Lower-case text before WordPiece.
    pub lowercase: bool,
    /// Strip accents. `None` follows `lowercase`.
    pub strip_accents: Option<bool>,
    pub continuation_prefix: String,
    pub max_input_chars_per_word: usize,
    pub special_tokens: SpecialTokens,
    /// Defaults used by `encode` and `encode_batch`.
    pub encode: EncodeOptions,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_accents: None,
            continuation_prefix: DEFAULT_CONTINUATION_PREFIX.to_string(),
            max_input_chars_per_word: DEFAULT_MAX_INPUT_CHARS_PER_WORD,
            special_tokens: SpecialTokens::default(),
            encode: EncodeOptions::default(),
        }
    }
}

impl TokenizerConfig {
    /// Read a JSON configuration file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TokenizerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            TokenizerError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_json_str(&text)?;
        debug!(path = %path.display(), "tokenizer config loaded");
        Ok(config)
    }

    /// Parse a JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, TokenizerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Effective accent stripping after resolving the `None` default.
    pub fn strip_accents(&self) -> bool {
        self.strip_accents.unwrap_or(self.lowercase)
    }

    /// Check option values that would make every encode call fail.
    pub fn validate(&self) -> Result<(), TokenizerError> {
        if self.continuation_prefix.is_empty() {
            return Err(TokenizerError::Config(
                "continuation_prefix must not be empty".to_string(),
            ));
        }
        if self.max_input_chars_per_word == 0 {
            return Err(TokenizerError::Config(
                "max_input_chars_per_word must be at least 1".to_string(),
            ));
        }
        let specials = &self.special_tokens;
        for (name, token) in [
            ("unk", &specials.unk),
            ("pad", &specials.pad),
            ("cls", &specials.cls),
            ("sep", &specials.sep),
            ("mask", &specials.mask),
        ] {
            if token.is_empty() {
                return Err(TokenizerError::Config(format!(
                    "special token '{}' must not be empty",
                    name
                )));
            }
        }
        if let Some(max_length) = self.encode.max_length {
            if max_length < 2 {
                return Err(TokenizerError::Config(format!(
                    "max_length {} cannot hold [CLS] and [SEP]",
                    max_length
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TokenizerConfig::default();
        assert!(config.lowercase);
        assert!(config.strip_accents());
        assert_eq!(config.continuation_prefix, "##");
        assert_eq!(config.max_input_chars_per_word, 100);
        assert_eq!(config.encode.max_length, Some(512));
        assert_eq!(config.encode.truncation, TruncationStrategy::LongestFirst);
        assert_eq!(config.encode.padding, PaddingStrategy::DoNotPad);
        assert_eq!(config.encode.padding_side, PaddingSide::Right);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strip_accents_follows_lowercase() {
        let config = TokenizerConfig {
            lowercase: false,
            ..TokenizerConfig::default()
        };
        assert!(!config.strip_accents());

        let config = TokenizerConfig {
            lowercase: false,
            strip_accents: Some(true),
            ..TokenizerConfig::default()
        };
        assert!(config.strip_accents());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "longest_first".parse::<TruncationStrategy>().unwrap(),
            TruncationStrategy::LongestFirst
        );
        assert_eq!(
            "only_second".parse::<TruncationStrategy>().unwrap(),
            TruncationStrategy::OnlySecond
        );
        assert_eq!(
            "max_length".parse::<PaddingStrategy>().unwrap(),
            PaddingStrategy::MaxLength
        );
        assert_eq!("left".parse::<PaddingSide>().unwrap(), PaddingSide::Left);
    }

    #[test]
    fn test_strategy_from_str_unknown() {
        let err = "shortest_first".parse::<TruncationStrategy>().unwrap_err();
        match err {
            TokenizerError::Config(msg) => {
                assert!(msg.contains("shortest_first"));
                assert!(msg.contains("longest_first"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strategy_display_roundtrip() {
        for s in [
            TruncationStrategy::LongestFirst,
            TruncationStrategy::OnlyFirst,
            TruncationStrategy::OnlySecond,
            TruncationStrategy::DoNotTruncate,
        ] {
            assert_eq!(s.to_string().parse::<TruncationStrategy>().unwrap(), s);
        }
    }

    #[test]
    fn test_from_json_partial() {
        let config = TokenizerConfig::from_json_str(
            r#"{"lowercase": false, "encode": {"max_length": 128, "padding": "max_length"}}"#,
        )
        .unwrap();
        assert!(!config.lowercase);
        assert_eq!(config.encode.max_length, Some(128));
        assert_eq!(config.encode.padding, PaddingStrategy::MaxLength);
        assert_eq!(config.encode.truncation, TruncationStrategy::LongestFirst);
        assert_eq!(config.special_tokens.unk, "[UNK]");
    }

    #[test]
    fn test_from_json_null_max_length() {
        let config = TokenizerConfig::from_json_str(r#"{"encode": {"max_length": null}}"#).unwrap();
        assert_eq!(config.encode.max_length, None);
    }

    #[test]
    fn test_from_json_bad_strategy() {
        let err = TokenizerConfig::from_json_str(r#"{"encode": {"truncation": "middle_out"}}"#)
            .unwrap_err();
        assert!(matches!(err, TokenizerError::Serde(_)));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenizer.json");
        std::fs::write(&path, r#"{"special_tokens": {"unk": "<unk>"}}"#).unwrap();
        let config = TokenizerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.special_tokens.unk, "<unk>");
        assert_eq!(config.special_tokens.cls, "[CLS]");
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = TokenizerConfig::from_json_file("/nonexistent/tokenizer.json").unwrap_err();
        assert!(matches!(err, TokenizerError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty_prefix = TokenizerConfig {
            continuation_prefix: String::new(),
            ..TokenizerConfig::default()
        };
        assert!(empty_prefix.validate().is_err());

        let zero_chars = TokenizerConfig {
            max_input_chars_per_word: 0,
            ..TokenizerConfig::default()
        };
        assert!(zero_chars.validate().is_err());

        let mut empty_special = TokenizerConfig::default();
        empty_special.special_tokens.sep = String::new();
        assert!(empty_special.validate().is_err());

        let tiny = TokenizerConfig {
            encode: EncodeOptions::default().with_max_length(Some(1)),
            ..TokenizerConfig::default()
        };
        assert!(tiny.validate().is_err());
    }

    #[test]
    fn test_options_builder() {
        let opts = EncodeOptions::default()
            .with_max_length(Some(6))
            .with_truncation(TruncationStrategy::OnlyFirst)
            .with_padding(PaddingStrategy::MaxLength)
            .with_padding_side(PaddingSide::Left)
            .with_stride(2);
        assert_eq!(opts.max_length, Some(6));
        assert_eq!(opts.truncation, TruncationStrategy::OnlyFirst);
        assert_eq!(opts.padding, PaddingStrategy::MaxLength);
        assert_eq!(opts.padding_side, PaddingSide::Left);
        assert_eq!(opts.stride, 2);
    }
}
