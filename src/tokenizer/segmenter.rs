//! Basic segmentation of cleaned text into atomic tokens.
//!
//! An atomic token is a maximal run of non-whitespace, non-punctuation
//! characters, a single punctuation character, or a single CJK ideograph.
//! CJK text is not delimited by whitespace, so every ideograph is isolated
//! before the whitespace split.

use super::normalizer::{is_cjk_char, is_punctuation, Normalizer};

/// Splits text into atomic tokens ready for WordPiece.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSegmenter {
    normalizer: Normalizer,
}

impl BasicSegmenter {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Segment raw text into atomic tokens, in order.
    ///
    /// Returns an empty vector for empty or whitespace-only input.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let cleaned = self.normalizer.clean(text);
        let spaced = space_cjk_chars(&cleaned);

        let mut tokens = Vec::new();
        for chunk in spaced.split(' ').filter(|c| !c.is_empty()) {
            let chunk = self.normalizer.normalize_token(chunk);
            split_on_punctuation(&chunk, &mut tokens);
        }
        tokens
    }
}

/// Surround every CJK ideograph with spaces.
fn space_cjk_chars(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + text.len() / 2);
    for ch in text.chars() {
        if is_cjk_char(ch) {
            output.push(' ');
            output.push(ch);
            output.push(' ');
        } else {
            output.push(ch);
        }
    }
    output
}

/// Split a whitespace-free chunk so that every punctuation character becomes
/// its own token. Appends to `output`.
fn split_on_punctuation(chunk: &str, output: &mut Vec<String>) {
    let mut current = String::new();
    for ch in chunk.chars() {
        if is_punctuation(ch) {
            if !current.is_empty() {
                output.push(std::mem::take(&mut current));
            }
            output.push(ch.to_string());
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        output.push(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str) -> Vec<String> {
        BasicSegmenter::default().segment(text)
    }

    #[test]
    fn test_segment_empty() {
        assert!(seg("").is_empty());
        assert!(seg("   \t\n ").is_empty());
    }

    #[test]
    fn test_segment_whitespace() {
        assert_eq!(seg("hello   world"), vec!["hello", "world"]);
        assert_eq!(seg("  hello\tworld\n"), vec!["hello", "world"]);
    }

    #[test]
    fn test_segment_punctuation() {
        assert_eq!(seg("hello, world!"), vec!["hello", ",", "world", "!"]);
        assert_eq!(seg("!@#$"), vec!["!", "@", "#", "$"]);
        assert_eq!(seg("don't"), vec!["don", "'", "t"]);
    }

    #[test]
    fn test_segment_cjk_per_character() {
        assert_eq!(seg("泰晤士河"), vec!["泰", "晤", "士", "河"]);
    }

    #[test]
    fn test_segment_mixed_cjk_and_latin() {
        assert_eq!(
            seg("18世纪abc，林"),
            vec!["18", "世", "纪", "abc", "，", "林"]
        );
    }

    #[test]
    fn test_segment_cjk_pair_text() {
        let tokens = seg("梁思成问林徽因：“你上看这座教堂，有” ");
        assert_eq!(tokens[0], "梁");
        assert!(tokens.contains(&"：".to_string()));
        assert!(tokens.contains(&"“".to_string()));
        assert_eq!(tokens.last().map(String::as_str), Some("”"));
    }

    #[test]
    fn test_segment_lowercases_and_strips_accents() {
        assert_eq!(seg("Caf\u{00E9} HELLO"), vec!["cafe", "hello"]);
    }

    #[test]
    fn test_segment_cased() {
        let s = BasicSegmenter::new(Normalizer::new(false, false));
        assert_eq!(s.segment("Caf\u{00E9} HELLO"), vec!["Caf\u{00E9}", "HELLO"]);
    }

    #[test]
    fn test_segment_drops_control_chars() {
        assert_eq!(seg("he\u{0000}llo\u{200B}"), vec!["hello"]);
    }

    #[test]
    fn test_segment_is_restartable() {
        let s = BasicSegmenter::default();
        assert_eq!(s.segment("a b, c"), s.segment("a b, c"));
    }
}
