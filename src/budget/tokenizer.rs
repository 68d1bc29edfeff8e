//! Token counting using tiktoken

use crate::error::{Result, TranscriptError};
use std::sync::Arc;
use tiktoken_rs::{get_bpe_from_model, CoreBPE};

/// Token counter trait for different tokenization strategies
///
/// Counters are stateless and safe to invoke repeatedly without
/// coordination.
pub trait TokenCounter: Send + Sync {
    /// Count the tokens the given text would consume
    fn count(&self, text: &str) -> usize;
}

/// Tiktoken-based counter bound to a specific model's encoding
pub struct TiktokenCounter {
    bpe: Arc<CoreBPE>,
    model: String,
}

impl TiktokenCounter {
    /// Create a counter for the given model identifier
    ///
    /// Fails with [`TranscriptError::UnsupportedModel`] when no encoding
    /// is known for the model. There is no fallback: counting with a
    /// wrong tokenizer would make budget decisions silently mis-fire.
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = get_bpe_from_model(model).map_err(|_| TranscriptError::UnsupportedModel {
            model: model.to_string(),
        })?;

        Ok(Self {
            bpe: Arc::new(bpe),
            model: model.to_string(),
        })
    }

    /// The model identifier this counter is bound to
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

/// Character-ratio counter (~4 chars per token)
///
/// An explicit, opt-in alternative for offline use. Never substituted
/// implicitly for a missing tiktoken encoding.
pub struct HeuristicCounter {
    chars_per_token: f64,
}

impl HeuristicCounter {
    pub fn new(chars_per_token: f64) -> Self {
        Self { chars_per_token }
    }
}

impl Default for HeuristicCounter {
    fn default() -> Self {
        Self::new(4.0)
    }
}

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        (text.chars().count() as f64 / self.chars_per_token).ceil() as usize
    }
}
