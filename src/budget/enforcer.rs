//! Budget-enforcing post-processor

use super::accounting::transcript_tokens;
use super::eviction::{trim_to_budget, TrimReport};
use super::tokenizer::TokenCounter;
use crate::transcript::Transcript;
use std::sync::Arc;
use tracing::info;

/// Orchestrates the check-and-trim cycle after each model turn
///
/// The counter is an explicit dependency, constructed once by the caller
/// and shared by reference; there is no hidden global tokenizer state.
pub struct BudgetEnforcer {
    max_tokens: usize,
    counter: Arc<dyn TokenCounter>,
}

impl BudgetEnforcer {
    /// Create an enforcer with a token ceiling and a bound counter
    pub fn new(max_tokens: usize, counter: Arc<dyn TokenCounter>) -> Self {
        Self {
            max_tokens,
            counter,
        }
    }

    /// The configured token ceiling
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Check the transcript after a model turn and trim if needed
    ///
    /// When the model call reported a total-token usage figure it is used
    /// as the trigger; otherwise the transcript is counted locally. The
    /// eviction loop itself always recounts with the local tokenizer.
    pub fn enforce(
        &self,
        transcript: &mut Transcript,
        reported_total: Option<usize>,
    ) -> TrimReport {
        let trigger =
            reported_total.unwrap_or_else(|| transcript_tokens(transcript, &*self.counter));

        if trigger <= self.max_tokens {
            return TrimReport::noop(trigger);
        }

        let report = trim_to_budget(transcript, self.max_tokens, &*self.counter);
        if report.evicted > 0 {
            info!(
                evicted = report.evicted,
                tokens = report.tokens,
                max = self.max_tokens,
                "transcript trimmed after model turn"
            );
        }
        report
    }
}
