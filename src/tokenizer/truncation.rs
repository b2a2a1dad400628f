//! Truncation of one or two id segments to a length budget.

use tracing::debug;

use super::config::TruncationStrategy;
use crate::error::TokenizerError;

/// Remove `num_tokens_to_remove` ids from the tail of `ids` and/or `pair_ids`.
///
/// Returns the overflowing ids in their original order. For `OnlyFirst` and
/// `OnlySecond` the overflow also starts with up to `stride` ids of context
/// that remain in the truncated segment.
///
/// Fails with [`TokenizerError::Truncation`] if the strategy cannot remove
/// enough ids. Segments are left untouched on failure.
pub fn truncate_sequences(
    ids: &mut Vec<u32>,
    mut pair_ids: Option<&mut Vec<u32>>,
    num_tokens_to_remove: usize,
    strategy: TruncationStrategy,
    stride: usize,
) -> Result<Vec<u32>, TokenizerError> {
    if num_tokens_to_remove == 0 {
        return Ok(Vec::new());
    }

    let overflow = match strategy {
        TruncationStrategy::DoNotTruncate => Vec::new(),
        TruncationStrategy::LongestFirst => {
            let available = ids.len() + pair_ids.as_ref().map_or(0, |p| p.len());
            if available < num_tokens_to_remove {
                return Err(TokenizerError::Truncation(format!(
                    "need to remove {} tokens but the segments only hold {}",
                    num_tokens_to_remove, available
                )));
            }

            let mut removed_first = Vec::new();
            let mut removed_second = Vec::new();
            for _ in 0..num_tokens_to_remove {
                match pair_ids.as_deref_mut() {
                    Some(pair) if pair.len() >= ids.len() => {
                        if let Some(id) = pair.pop() {
                            removed_second.push(id);
                        }
                    }
                    _ => {
                        if let Some(id) = ids.pop() {
                            removed_first.push(id);
                        }
                    }
                }
            }
            removed_first.reverse();
            removed_second.reverse();
            removed_first.extend(removed_second);
            removed_first
        }
        TruncationStrategy::OnlyFirst => {
            truncate_one(ids, num_tokens_to_remove, stride).ok_or_else(|| {
                TokenizerError::Truncation(format!(
                    "need to remove {} tokens but the first sequence has length {}; \
                     use another strategy such as 'longest_first' or 'only_second'",
                    num_tokens_to_remove,
                    ids.len()
                ))
            })?
        }
        TruncationStrategy::OnlySecond => {
            let pair = pair_ids.ok_or_else(|| {
                TokenizerError::Truncation(
                    "'only_second' truncation requires a second sequence".to_string(),
                )
            })?;
            let pair_len = pair.len();
            truncate_one(pair, num_tokens_to_remove, stride).ok_or_else(|| {
                TokenizerError::Truncation(format!(
                    "need to remove {} tokens but the second sequence has length {}; \
                     use another strategy such as 'longest_first' or 'only_first'",
                    num_tokens_to_remove, pair_len
                ))
            })?
        }
    };

    debug!(
        strategy = %strategy,
        removed = num_tokens_to_remove,
        overflow = overflow.len(),
        "sequence truncated"
    );

    Ok(overflow)
}

/// Drop `n` ids from the tail of one segment, returning the overflow window.
fn truncate_one(seq: &mut Vec<u32>, n: usize, stride: usize) -> Option<Vec<u32>> {
    if seq.len() < n {
        return None;
    }
    let window = (n + stride).min(seq.len());
    let overflow = seq[seq.len() - window..].to_vec();
    seq.truncate(seq.len() - n);
    Some(overflow)
}
