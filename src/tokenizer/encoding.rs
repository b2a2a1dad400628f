//! The structured output of an encode call.

use serde::Serialize;

use super::config::PaddingSide;

/// Model-ready ids and the parallel arrays that describe them.
///
/// `input_ids`, `token_type_ids`, `attention_mask` and `special_tokens_mask`
/// always have the same length.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EncodedSequence {
    pub input_ids: Vec<u32>,
    /// 0 for the first segment (through its `[SEP]`), 1 for the second.
    pub token_type_ids: Vec<u8>,
    /// 1 for real tokens, 0 for padding.
    pub attention_mask: Vec<u8>,
    /// 1 for `[CLS]`, `[SEP]` and padding, 0 for text tokens.
    pub special_tokens_mask: Vec<u8>,
    /// Ids removed by truncation, in original order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overflowing_tokens: Vec<u32>,
    pub num_truncated_tokens: usize,
}

impl EncodedSequence {
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Number of non-padding positions.
    pub fn num_real_tokens(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }

    /// Position index of every slot: `0..len()`.
    pub fn position_ids(&self) -> Vec<u32> {
        (0..self.len() as u32).collect()
    }

    /// Pad to `target_len` with `pad_id`. No-op if already that long.
    ///
    /// Padded positions get attention 0 and special-tokens mask 1. Their
    /// token-type id is that of the adjacent real position: the last one for
    /// right padding, the first one for left padding (0 if there is none).
    pub fn pad_to(&mut self, target_len: usize, pad_id: u32, side: PaddingSide) {
        let len = self.len();
        if len >= target_len {
            return;
        }
        let difference = target_len - len;

        match side {
            PaddingSide::Right => {
                let type_id = self.token_type_ids.last().copied().unwrap_or(0);
                self.input_ids.resize(target_len, pad_id);
                self.token_type_ids.resize(target_len, type_id);
                self.attention_mask.resize(target_len, 0);
                self.special_tokens_mask.resize(target_len, 1);
            }
            PaddingSide::Left => {
                let type_id = self.token_type_ids.first().copied().unwrap_or(0);
                prepend(&mut self.input_ids, difference, pad_id);
                prepend(&mut self.token_type_ids, difference, type_id);
                prepend(&mut self.attention_mask, difference, 0);
                prepend(&mut self.special_tokens_mask, difference, 1);
            }
        }
    }
}

fn prepend<T: Copy>(values: &mut Vec<T>, count: usize, value: T) {
    values.splice(0..0, std::iter::repeat(value).take(count));
}
