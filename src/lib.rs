//! Conversation transcript management with token budget enforcement.
//!
//! Keeps a running chat transcript under a maximum token count by evicting
//! the oldest non-system messages, recounting with a model-bound tokenizer
//! after every removal. System messages are pinned and never evicted.
//!
//! The crate also ships the thin conversation loop the trimmer lives in:
//! an OpenAI-compatible chat completion client and a per-session turn
//! processor that enforces the budget after each model turn.

pub mod budget;
pub mod chat;
pub mod config;
pub mod error;
pub mod metrics;
pub mod transcript;

pub use budget::{
    transcript_tokens, trim_to_budget, BudgetEnforcer, HeuristicCounter, TiktokenCounter,
    TokenCounter, TrimReport,
};
pub use chat::{ChatClient, ChatCompletion, ChatSession, CompletionBackend, TokenUsage};
pub use config::{BudgetConfig, ChatConfig, Config, LoggingConfig};
pub use error::{Result, TranscriptError};
pub use transcript::{ContentPart, Message, MessageContent, Role, Transcript};

/// Commonly used types, re-exported for convenience
pub mod prelude {
    pub use crate::budget::{
        BudgetEnforcer, TiktokenCounter, TokenCounter, TrimReport,
    };
    pub use crate::chat::{ChatClient, ChatCompletion, ChatSession, CompletionBackend};
    pub use crate::config::Config;
    pub use crate::error::{Result, TranscriptError};
    pub use crate::transcript::{Message, MessageContent, Role, Transcript};
}

/// Initialize tracing from the logging configuration
///
/// Falls back to the `RUST_LOG` environment variable when set.
pub fn init_tracing(config: &config::LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
