//! BERT-style sequence encoder and sentence-pair packer.
//!
//! [`BertTokenizer`] runs the full pipeline:
//!
//! 1. Clean and segment each input text into atomic tokens.
//! 2. Split every atomic token into WordPiece subword ids.
//! 3. Truncate the segment(s) to the length budget.
//! 4. Wrap with `[CLS] A [SEP]` or `[CLS] A [SEP] B [SEP]`.
//! 5. Build token-type ids, attention mask and special-tokens mask.
//! 6. Pad if requested.
//!
//! The tokenizer holds only immutable state, so one instance (or many
//! instances sharing one `Arc<Vocabulary>`) can encode from any number of
//! threads at once.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use super::config::{EncodeOptions, PaddingStrategy, TokenizerConfig, TruncationStrategy};
use super::encoding::EncodedSequence;
use super::normalizer::Normalizer;
use super::segmenter::BasicSegmenter;
use super::truncation::truncate_sequences;
use super::vocab::{SpecialToken, Vocabulary};
use super::wordpiece::WordPiece;
use super::Tokenizer;
use crate::error::TokenizerError;

/// Full WordPiece tokenizer with special-token handling for single sequences
/// and sequence pairs.
#[derive(Debug, Clone)]
pub struct BertTokenizer {
    config: TokenizerConfig,
    segmenter: BasicSegmenter,
    wordpiece: WordPiece,
    unk_id: u32,
    cls_id: u32,
    sep_id: u32,
    pad_id: Option<u32>,
    mask_id: Option<u32>,
    /// Every special id present in the vocabulary.
    special_ids: Vec<u32>,
}

impl BertTokenizer {
    /// Create a tokenizer over a shared vocabulary.
    ///
    /// `[UNK]`, `[CLS]` and `[SEP]` must be in the vocabulary. `[PAD]` is
    /// required only when the configured padding strategy pads; `[MASK]` is
    /// optional.
    pub fn new(vocab: Arc<Vocabulary>, config: TokenizerConfig) -> Result<Self, TokenizerError> {
        config.validate()?;

        let specials = &config.special_tokens;
        let unk_id = vocab.id_of_special(SpecialToken::Unk, specials)?;
        let cls_id = vocab.id_of_special(SpecialToken::Cls, specials)?;
        let sep_id = vocab.id_of_special(SpecialToken::Sep, specials)?;
        let pad_id = vocab.id_of_special(SpecialToken::Pad, specials).ok();
        let mask_id = vocab.id_of_special(SpecialToken::Mask, specials).ok();

        if pad_id.is_none() && config.encode.padding != PaddingStrategy::DoNotPad {
            return Err(TokenizerError::Config(format!(
                "padding strategy '{}' requires pad token '{}' in the vocabulary",
                config.encode.padding, specials.pad
            )));
        }

        let special_ids = SpecialToken::ALL
            .iter()
            .filter_map(|&which| vocab.id_of_special(which, specials).ok())
            .collect();

        let normalizer = Normalizer::new(config.lowercase, config.strip_accents());
        let wordpiece = WordPiece::new(
            vocab,
            unk_id,
            config.continuation_prefix.clone(),
            config.max_input_chars_per_word,
        );

        info!(
            vocab_size = wordpiece.vocab().len(),
            unk_id,
            cls_id,
            sep_id,
            ?pad_id,
            ?mask_id,
            lowercase = normalizer.lowercase(),
            strip_accents = normalizer.strip_accents(),
            "WordPiece tokenizer initialized"
        );

        Ok(Self {
            segmenter: BasicSegmenter::new(normalizer),
            wordpiece,
            unk_id,
            cls_id,
            sep_id,
            pad_id,
            mask_id,
            special_ids,
            config,
        })
    }

    /// Load a vocabulary file and create a tokenizer over it.
    pub fn from_vocab_file(
        path: impl AsRef<Path>,
        config: TokenizerConfig,
    ) -> Result<Self, TokenizerError> {
        let vocab = Vocabulary::load(path)?;
        Self::new(Arc::new(vocab), config)
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    pub fn vocab(&self) -> &Vocabulary {
        self.wordpiece.vocab()
    }

    pub fn unk_token_id(&self) -> u32 {
        self.unk_id
    }

    pub fn mask_token_id(&self) -> Option<u32> {
        self.mask_id
    }

    /// Ids of all special tokens present in the vocabulary.
    pub fn all_special_ids(&self) -> &[u32] {
        &self.special_ids
    }

    // -----------------------------------------------------------------------
    // Text -> tokens -> ids
    // -----------------------------------------------------------------------

    /// Split text into WordPiece token strings (no special tokens).
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let unk = &self.config.special_tokens.unk;
        let mut output = Vec::new();
        for word in self.segmenter.segment(text) {
            self.wordpiece.split_into_tokens(&word, unk, &mut output);
        }
        output
    }

    /// Split text into WordPiece ids (no special tokens).
    pub fn text_to_ids(&self, text: &str) -> Vec<u32> {
        let mut output = Vec::new();
        for word in self.segmenter.segment(text) {
            self.wordpiece.split_into_ids(&word, &mut output);
        }
        output
    }

    /// Map tokens to ids, using the unknown id for tokens not in the vocabulary.
    pub fn convert_tokens_to_ids<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        tokens
            .iter()
            .map(|t| self.vocab().lookup(t.as_ref()).unwrap_or(self.unk_id))
            .collect()
    }

    /// Map ids to tokens, using the unknown token for out-of-range ids.
    pub fn convert_ids_to_tokens(&self, ids: &[u32]) -> Vec<String> {
        ids.iter()
            .map(|&id| {
                self.vocab()
                    .token(id)
                    .unwrap_or(self.config.special_tokens.unk.as_str())
                    .to_string()
            })
            .collect()
    }

    /// Join tokens into text, gluing continuation pieces to the previous word.
    pub fn convert_tokens_to_string<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        let prefix = self.wordpiece.continuation_prefix();
        let mut text = String::new();
        for token in tokens {
            let token = token.as_ref();
            match token.strip_prefix(prefix) {
                Some(suffix) => text.push_str(suffix),
                None => {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(token);
                }
            }
        }
        text
    }

    /// Decode ids back to text.
    ///
    /// With `skip_special_tokens`, `[CLS]`, `[SEP]`, `[PAD]` and `[MASK]` are
    /// dropped; `[UNK]` is always kept so that lost content stays visible.
    pub fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> String {
        let kept: Vec<u32> = ids
            .iter()
            .copied()
            .filter(|&id| {
                !skip_special_tokens || id == self.unk_id || !self.special_ids.contains(&id)
            })
            .collect();
        let tokens = self.convert_ids_to_tokens(&kept);
        self.convert_tokens_to_string(&tokens)
    }

    // -----------------------------------------------------------------------
    // Special tokens
    // -----------------------------------------------------------------------

    /// Number of special tokens added around one sequence (2) or a pair (3).
    pub fn num_special_tokens_to_add(&self, pair: bool) -> usize {
        if pair {
            3
        } else {
            2
        }
    }

    /// `[CLS] A [SEP]` or `[CLS] A [SEP] B [SEP]`.
    pub fn build_inputs_with_special_tokens(&self, ids: &[u32], pair_ids: Option<&[u32]>) -> Vec<u32> {
        let extra = pair_ids.map_or(0, |p| p.len());
        let mut inputs = Vec::with_capacity(ids.len() + extra + 3);
        inputs.push(self.cls_id);
        inputs.extend_from_slice(ids);
        inputs.push(self.sep_id);
        if let Some(pair) = pair_ids {
            inputs.extend_from_slice(pair);
            inputs.push(self.sep_id);
        }
        inputs
    }

    /// Token-type ids matching [`build_inputs_with_special_tokens`](Self::build_inputs_with_special_tokens).
    pub fn create_token_type_ids(&self, ids: &[u32], pair_ids: Option<&[u32]>) -> Vec<u8> {
        let mut types = vec![0u8; ids.len() + 2];
        if let Some(pair) = pair_ids {
            types.resize(types.len() + pair.len() + 1, 1);
        }
        types
    }

    /// Special-tokens mask: 1 for special positions, 0 for text tokens.
    ///
    /// With `already_has_special_tokens`, `ids` is a full encoded sequence and
    /// every id in [`all_special_ids`](Self::all_special_ids) is flagged; a
    /// pair is then rejected with [`TokenizerError::InvalidInput`].
    pub fn special_tokens_mask(
        &self,
        ids: &[u32],
        pair_ids: Option<&[u32]>,
        already_has_special_tokens: bool,
    ) -> Result<Vec<u8>, TokenizerError> {
        if already_has_special_tokens {
            if pair_ids.is_some() {
                return Err(TokenizerError::InvalidInput(
                    "a second sequence cannot be given when the ids already contain special tokens"
                        .to_string(),
                ));
            }
            return Ok(ids
                .iter()
                .map(|id| u8::from(self.special_ids.contains(id)))
                .collect());
        }

        let mut mask = Vec::with_capacity(ids.len() + 3);
        mask.push(1);
        mask.resize(ids.len() + 1, 0);
        mask.push(1);
        if let Some(pair) = pair_ids {
            mask.resize(mask.len() + pair.len(), 0);
            mask.push(1);
        }
        Ok(mask)
    }

    // -----------------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------------

    /// Encode a text (and optional pair) with the configured default options.
    pub fn encode(&self, text: &str, pair: Option<&str>) -> Result<EncodedSequence, TokenizerError> {
        self.encode_with(text, pair, &self.config.encode)
    }

    /// Encode a text (and optional pair) with explicit options.
    ///
    /// A pair is present whenever `pair` is `Some`, even if it yields no
    /// tokens.
    pub fn encode_with(
        &self,
        text: &str,
        pair: Option<&str>,
        options: &EncodeOptions,
    ) -> Result<EncodedSequence, TokenizerError> {
        self.check_max_length(pair.is_some(), options)?;
        let ids = self.text_to_ids(text);
        let pair_ids = pair.map(|p| self.text_to_ids(p));
        self.encode_ids(ids, pair_ids, options)
    }

    /// Pack already-tokenized id segments into an [`EncodedSequence`].
    pub fn encode_ids(
        &self,
        mut ids: Vec<u32>,
        mut pair_ids: Option<Vec<u32>>,
        options: &EncodeOptions,
    ) -> Result<EncodedSequence, TokenizerError> {
        let is_pair = pair_ids.is_some();
        self.check_max_length(is_pair, options)?;

        let overhead = self.num_special_tokens_to_add(is_pair);
        let total_len = ids.len() + pair_ids.as_ref().map_or(0, Vec::len) + overhead;

        let mut overflowing_tokens = Vec::new();
        let mut num_truncated_tokens = 0;
        if let Some(max_length) = options.max_length {
            if total_len > max_length && options.truncation != TruncationStrategy::DoNotTruncate {
                num_truncated_tokens = total_len - max_length;
                overflowing_tokens = truncate_sequences(
                    &mut ids,
                    pair_ids.as_mut(),
                    num_truncated_tokens,
                    options.truncation,
                    options.stride,
                )?;
            }
        }

        let pair_slice = pair_ids.as_deref();
        let input_ids = self.build_inputs_with_special_tokens(&ids, pair_slice);
        let token_type_ids = self.create_token_type_ids(&ids, pair_slice);
        let special_tokens_mask = self.special_tokens_mask(&ids, pair_slice, false)?;
        let attention_mask = vec![1u8; input_ids.len()];

        let mut encoded = EncodedSequence {
            input_ids,
            token_type_ids,
            attention_mask,
            special_tokens_mask,
            overflowing_tokens,
            num_truncated_tokens,
        };

        if options.padding == PaddingStrategy::MaxLength {
            let max_length = options.max_length.ok_or_else(|| {
                TokenizerError::InvalidInput(
                    "'max_length' padding requires max_length to be set".to_string(),
                )
            })?;
            let pad_id = self.require_pad_id()?;
            encoded.pad_to(max_length, pad_id, options.padding_side);
        }

        Ok(encoded)
    }

    /// Encode many inputs in parallel with the configured default options.
    pub fn encode_batch<S>(&self, inputs: &[(S, Option<S>)]) -> Result<Vec<EncodedSequence>, TokenizerError>
    where
        S: AsRef<str> + Sync,
    {
        self.encode_batch_with(inputs, &self.config.encode)
    }

    /// Encode many inputs in parallel with explicit options.
    ///
    /// Results are in input order. If any input fails, the error of the
    /// earliest failing input is returned. With
    /// [`PaddingStrategy::Longest`] every sequence is padded to the longest
    /// one in the batch.
    pub fn encode_batch_with<S>(
        &self,
        inputs: &[(S, Option<S>)],
        options: &EncodeOptions,
    ) -> Result<Vec<EncodedSequence>, TokenizerError>
    where
        S: AsRef<str> + Sync,
    {
        let results: Vec<Result<EncodedSequence, TokenizerError>> = inputs
            .par_iter()
            .map(|(text, pair)| {
                self.encode_with(text.as_ref(), pair.as_ref().map(|p| p.as_ref()), options)
            })
            .collect();
        let mut batch = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        if options.padding == PaddingStrategy::Longest {
            let pad_id = self.require_pad_id()?;
            let longest = batch.iter().map(EncodedSequence::len).max().unwrap_or(0);
            for encoded in &mut batch {
                encoded.pad_to(longest, pad_id, options.padding_side);
            }
        }

        debug!(batch_size = batch.len(), "batch encoded");
        Ok(batch)
    }

    fn check_max_length(&self, is_pair: bool, options: &EncodeOptions) -> Result<(), TokenizerError> {
        let overhead = self.num_special_tokens_to_add(is_pair);
        match options.max_length {
            Some(max_length) if max_length < overhead => Err(TokenizerError::InvalidInput(format!(
                "max_length {} is smaller than the {} special tokens a {} needs",
                max_length,
                overhead,
                if is_pair { "sequence pair" } else { "single sequence" }
            ))),
            _ => Ok(()),
        }
    }

    fn require_pad_id(&self) -> Result<u32, TokenizerError> {
        self.pad_id.ok_or_else(|| {
            TokenizerError::Config(format!(
                "padding requires pad token '{}' in the vocabulary",
                self.config.special_tokens.pad
            ))
        })
    }
}

impl Tokenizer for BertTokenizer {
    fn encode(&self, text: &str, add_special_tokens: bool) -> Vec<u32> {
        let ids = self.text_to_ids(text);
        if add_special_tokens {
            self.build_inputs_with_special_tokens(&ids, None)
        } else {
            ids
        }
    }

    fn decode(&self, ids: &[u32]) -> String {
        BertTokenizer::decode(self, ids, true)
    }

    fn vocab_size(&self) -> usize {
        self.vocab().len()
    }

    fn cls_token_id(&self) -> Option<u32> {
        Some(self.cls_id)
    }

    fn sep_token_id(&self) -> Option<u32> {
        Some(self.sep_id)
    }

    fn pad_token_id(&self) -> Option<u32> {
        self.pad_id
    }
}
