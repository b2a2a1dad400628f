//! Text cleaning and Unicode character classification.
//!
//! [`Normalizer`] performs the first stage of BERT-style tokenization:
//!
//! 1. [`Normalizer::clean`] drops NUL, U+FFFD and control characters and maps
//!    every whitespace character to a single ASCII space.
//! 2. [`Normalizer::normalize_token`] optionally lower-cases a whitespace
//!    delimited chunk and strips accents (NFD decomposition followed by
//!    removal of non-spacing marks).
//!
//! The classification helpers (`is_control`, `is_whitespace`,
//! `is_punctuation`, `is_cjk_char`, `is_nonspacing_mark`) operate on Unicode
//! code points, never on encoded bytes.

use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

/// Case folding and accent stripping options for a tokenizer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    lowercase: bool,
    strip_accents: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl Normalizer {
    pub fn new(lowercase: bool, strip_accents: bool) -> Self {
        Self {
            lowercase,
            strip_accents,
        }
    }

    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    pub fn strip_accents(&self) -> bool {
        self.strip_accents
    }

    /// Remove control characters and normalize whitespace.
    ///
    /// NUL, U+FFFD (replacement character) and characters in the Cc/Cf
    /// categories are dropped. Tab, newline and carriage return are treated
    /// as whitespace, not control. Every whitespace character becomes `' '`.
    pub fn clean(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        for ch in text.chars() {
            if ch == '\0' || ch == char::REPLACEMENT_CHARACTER || is_control(ch) {
                continue;
            }
            if is_whitespace(ch) {
                output.push(' ');
            } else {
                output.push(ch);
            }
        }
        output
    }

    /// Apply the configured case folding and accent stripping to one chunk.
    pub fn normalize_token(&self, token: &str) -> String {
        let lowered;
        let token = if self.lowercase {
            lowered = token.to_lowercase();
            lowered.as_str()
        } else {
            token
        };

        if self.strip_accents {
            token.nfd().filter(|c| !is_nonspacing_mark(*c)).collect()
        } else {
            token.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Character classification helpers
// ---------------------------------------------------------------------------

/// Whitespace: space, `\t`, `\n`, `\r` and the Zs (space separator) category.
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
        || get_general_category(ch) == GeneralCategory::SpaceSeparator
}

/// Control characters: categories Cc (control) and Cf (format).
///
/// `\t`, `\n` and `\r` are classified as whitespace instead.
pub fn is_control(ch: char) -> bool {
    if matches!(ch, '\t' | '\n' | '\r') {
        return false;
    }
    matches!(
        get_general_category(ch),
        GeneralCategory::Control | GeneralCategory::Format
    )
}

/// CJK ideographs per the CJK Unified Ideographs blocks and their extensions.
///
/// Hangul, Hiragana and Katakana are not included: those scripts are written
/// with spaces and go through the regular whitespace/WordPiece path.
pub fn is_cjk_char(ch: char) -> bool {
    let cp = ch as u32;
    (0x4E00..=0x9FFF).contains(&cp)
        || (0x3400..=0x4DBF).contains(&cp)
        || (0x20000..=0x2A6DF).contains(&cp)
        || (0x2A700..=0x2B73F).contains(&cp)
        || (0x2B740..=0x2B81F).contains(&cp)
        || (0x2B820..=0x2CEAF).contains(&cp)
        || (0xF900..=0xFAFF).contains(&cp)
        || (0x2F800..=0x2FA1F).contains(&cp)
}

/// Punctuation: all non-alphanumeric ASCII symbols plus the Unicode P*
/// categories (Pc, Pd, Ps, Pe, Pi, Pf, Po).
///
/// ASCII characters such as `$`, `^` and `` ` `` are not in the Unicode
/// punctuation categories but are treated as punctuation anyway.
pub fn is_punctuation(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_punctuation();
    }
    is_unicode_punctuation(get_general_category(ch))
}

fn is_unicode_punctuation(category: GeneralCategory) -> bool {
    matches!(
        category,
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
    )
}

/// Non-spacing marks (category Mn): the accents and diacritics left behind
/// by NFD decomposition.
///
/// Spacing combining marks (Mc) are vowel signs in Indic scripts and are kept.
pub fn is_nonspacing_mark(ch: char) -> bool {
    get_general_category(ch) == GeneralCategory::NonspacingMark
}
