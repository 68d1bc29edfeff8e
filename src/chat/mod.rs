//! Chat completion client and per-session turn processing

pub mod client;
pub mod session;

pub use client::{
    ChatClient, ChatCompletion, CompletionBackend, FunctionCall, FunctionSpec, TokenUsage,
    ToolCall, ToolDefinition,
};
pub use session::ChatSession;
