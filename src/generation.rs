//! The token-sampling loop that turns a prompt into raw text.
//!
//! Generation fails softly: a missing model, tokenizer error or failed
//! first decode all yield an empty string, which downstream parsers absorb
//! through their fallbacks. Partial text from a mid-stream decode failure
//! is still returned.

use std::time::Instant;

use tracing::{debug, trace};

use crate::config::GenerationConfig;
use crate::model::ModelSlot;

/// Text is considered a complete question once the answer marker has
/// appeared and a minimum amount of content exists.
const ANSWER_MARKER: &str = "Answer:";
const MIN_COMPLETE_LEN: usize = 50;

/// Run one generation against a slot, holding its exclusive lock for the
/// call's full duration. Generation against other slots proceeds in
/// parallel; two calls on the same slot serialize.
pub(crate) fn generate(slot: &ModelSlot, prompt: &str, config: &GenerationConfig) -> String {
    let mut state = slot.lock();

    // Usage accounting happens under the lock even when the call goes on
    // to fail, so counters stay consistent with the observed slot state.
    state.usage_count += 1;
    state.last_used_at = Some(Instant::now());

    let Some(model) = state.model.as_mut() else {
        debug!(slot = slot.name(), "generation requested on empty slot");
        return String::new();
    };

    let tokens = match model.tokenize(prompt) {
        Ok(tokens) if !tokens.is_empty() => tokens,
        Ok(_) => {
            debug!(slot = slot.name(), "prompt tokenized to nothing");
            return String::new();
        }
        Err(err) => {
            debug!(slot = slot.name(), error = %err, "prompt tokenization failed");
            return String::new();
        }
    };

    if let Err(err) = model.reset_context() {
        debug!(slot = slot.name(), error = %err, "context reset failed");
        return String::new();
    }

    // Decode the full prompt in one batch.
    let mut logits = match model.decode(&tokens) {
        Ok(logits) => logits,
        Err(err) => {
            debug!(slot = slot.name(), error = %err, "prompt decode failed");
            return String::new();
        }
    };

    let eos = model.eos_token();
    let mut response = String::new();

    for _ in 0..config.max_tokens() {
        let token = select_token(&logits, config.temperature());
        if token == eos {
            break;
        }

        response.push_str(&model.token_text(token));

        // Advance the context by the new token; a failure here ends the
        // loop but keeps the partial text.
        match model.decode(&[token]) {
            Ok(next) => logits = next,
            Err(err) => {
                trace!(slot = slot.name(), error = %err, "token decode failed, stopping");
                break;
            }
        }

        if response.len() >= MIN_COMPLETE_LEN && response.contains(ANSWER_MARKER) {
            break;
        }
    }

    response
}

/// Pick the next token from a logit vector.
///
/// At `temperature <= 0` this is plain argmax. Otherwise the logits go
/// through a numerically stable softmax at the given temperature and the
/// most probable candidate wins. Both paths are deterministic top-1
/// selection with ties broken by first occurrence; there is no random
/// draw.
pub(crate) fn select_token(logits: &[f32], temperature: f32) -> u32 {
    if logits.is_empty() {
        return 0;
    }

    if temperature <= 0.0 {
        let mut best = 0usize;
        for (id, logit) in logits.iter().enumerate().skip(1) {
            if *logit > logits[best] {
                best = id;
            }
        }
        return best as u32;
    }

    let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let mut candidates: Vec<(u32, f32)> = logits
        .iter()
        .enumerate()
        .map(|(id, logit)| (id as u32, ((logit - max_logit) / temperature).exp()))
        .collect();
    let sum: f32 = candidates.iter().map(|(_, p)| p).sum();
    if sum > 0.0 {
        for (_, p) in candidates.iter_mut() {
            *p /= sum;
        }
    }

    // Stable sort keeps the first occurrence ahead on equal probability.
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates[0].0
}
