//! Oldest-first eviction policy

use super::accounting::transcript_tokens;
use super::tokenizer::TokenCounter;
use crate::metrics::METRICS;
use crate::transcript::Transcript;
use tracing::{debug, warn};

/// Outcome of a trim pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimReport {
    /// Messages removed during this pass
    pub evicted: usize,
    /// Transcript token count after the pass
    pub tokens: usize,
    /// True when only pinned messages remain and they alone exceed the
    /// budget; the transcript is left as-is
    pub over_budget: bool,
}

impl TrimReport {
    /// A pass that removed nothing and left `tokens` within budget
    pub fn noop(tokens: usize) -> Self {
        Self {
            evicted: 0,
            tokens,
            over_budget: false,
        }
    }
}

/// Reduce a transcript to at or below `budget` tokens by removing the
/// oldest non-system messages
///
/// Each removal is followed by a full recount of the remaining
/// transcript. When no non-system message remains the loop stops and the
/// transcript is left over budget; that is a reported condition, not an
/// error, so a conversation with a large pinned prompt keeps running.
pub fn trim_to_budget(
    transcript: &mut Transcript,
    budget: usize,
    counter: &dyn TokenCounter,
) -> TrimReport {
    let mut tokens = transcript_tokens(transcript, counter);
    let mut evicted = 0;

    while tokens > budget {
        let Some(index) = transcript.first_unpinned_index() else {
            warn!(
                tokens,
                budget, "budget unsatisfiable: only system messages remain"
            );
            METRICS.record_unsatisfiable();
            METRICS.record_trim(evicted, tokens);
            return TrimReport {
                evicted,
                tokens,
                over_budget: true,
            };
        };

        let removed = transcript.remove(index);
        evicted += 1;
        debug!(role = ?removed.role, index, "evicted oldest message");

        // Full recount: token boundaries are not additive across removals
        tokens = transcript_tokens(transcript, counter);
    }

    if evicted > 0 {
        debug!(evicted, tokens, budget, "transcript trimmed to budget");
    }
    METRICS.record_trim(evicted, tokens);

    TrimReport {
        evicted,
        tokens,
        over_budget: false,
    }
}
