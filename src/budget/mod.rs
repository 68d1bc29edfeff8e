//! Token budget enforcement
//!
//! Counts tokens across a transcript with a model-bound tokenizer and
//! evicts the oldest non-system messages until the transcript fits the
//! configured ceiling.

pub mod accounting;
pub mod enforcer;
pub mod eviction;
pub mod tokenizer;

pub use accounting::{message_tokens, transcript_tokens};
pub use enforcer::BudgetEnforcer;
pub use eviction::{trim_to_budget, TrimReport};
pub use tokenizer::{HeuristicCounter, TiktokenCounter, TokenCounter};
