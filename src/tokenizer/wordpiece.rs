//! Greedy longest-match-first WordPiece subword splitting.
//!
//! For each atomic token the splitter repeatedly takes the longest prefix of
//! the remaining characters that is present in the vocabulary. Pieces after
//! the first are looked up with the continuation prefix (`##`). If any
//! position has no match at all, the whole atomic token becomes a single
//! unknown token; partial output is discarded.

use std::sync::Arc;

use super::vocab::Vocabulary;

/// Default continuation prefix for non-initial subwords.
pub const DEFAULT_CONTINUATION_PREFIX: &str = "##";

/// Atomic tokens longer than this many code points map straight to UNK.
pub const DEFAULT_MAX_INPUT_CHARS_PER_WORD: usize = 100;

/// One vocabulary piece of an atomic token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subword {
    pub id: u32,
    /// The vocabulary entry, including the continuation prefix if any.
    pub token: String,
    /// True for every piece after the first within an atomic token.
    pub continuation: bool,
}

/// An atomic token that could not be segmented against the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnkFallback {
    pub unk_id: u32,
}

/// WordPiece splitter bound to a shared vocabulary.
#[derive(Debug, Clone)]
pub struct WordPiece {
    vocab: Arc<Vocabulary>,
    unk_id: u32,
    continuation_prefix: String,
    max_input_chars_per_word: usize,
}

impl WordPiece {
    pub fn new(
        vocab: Arc<Vocabulary>,
        unk_id: u32,
        continuation_prefix: impl Into<String>,
        max_input_chars_per_word: usize,
    ) -> Self {
        Self {
            vocab,
            unk_id,
            continuation_prefix: continuation_prefix.into(),
            max_input_chars_per_word,
        }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn unk_id(&self) -> u32 {
        self.unk_id
    }

    pub fn continuation_prefix(&self) -> &str {
        &self.continuation_prefix
    }

    /// Split one atomic token into subwords.
    ///
    /// Returns [`UnkFallback`] if the token is longer than
    /// `max_input_chars_per_word` code points or cannot be fully covered by
    /// vocabulary pieces. An empty token yields no subwords.
    pub fn split(&self, token: &str) -> Result<Vec<Subword>, UnkFallback> {
        let fallback = UnkFallback { unk_id: self.unk_id };

        // Byte offset of every char boundary, including the end.
        let boundaries: Vec<usize> = token
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(token.len()))
            .collect();
        let char_len = boundaries.len() - 1;
        if char_len > self.max_input_chars_per_word {
            return Err(fallback);
        }

        let mut pieces = Vec::new();
        let mut candidate = String::with_capacity(self.continuation_prefix.len() + token.len());
        let mut start = 0;

        while start < char_len {
            let mut matched = None;

            for end in (start + 1..=char_len).rev() {
                let piece = &token[boundaries[start]..boundaries[end]];
                // Continuation-only entries never start an atomic token.
                if start == 0 && piece.starts_with(self.continuation_prefix.as_str()) {
                    continue;
                }
                candidate.clear();
                if start > 0 {
                    candidate.push_str(&self.continuation_prefix);
                }
                candidate.push_str(piece);

                if let Some(id) = self.vocab.lookup(&candidate) {
                    matched = Some((id, end));
                    break;
                }
            }

            let (id, end) = matched.ok_or(fallback)?;
            pieces.push(Subword {
                id,
                token: candidate.clone(),
                continuation: start > 0,
            });
            start = end;
        }

        Ok(pieces)
    }

    /// Split one atomic token and append the resulting ids to `output`,
    /// emitting the unknown-token id on fallback.
    pub fn split_into_ids(&self, token: &str, output: &mut Vec<u32>) {
        match self.split(token) {
            Ok(pieces) => output.extend(pieces.iter().map(|p| p.id)),
            Err(fallback) => output.push(fallback.unk_id),
        }
    }

    /// Split one atomic token and append the resulting token strings to
    /// `output`, emitting the unknown token on fallback.
    pub fn split_into_tokens(&self, token: &str, unk_token: &str, output: &mut Vec<String>) {
        match self.split(token) {
            Ok(pieces) => output.extend(pieces.into_iter().map(|p| p.token)),
            Err(_) => output.push(unk_token.to_string()),
        }
    }
}
