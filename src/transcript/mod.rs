//! Chat message and transcript data model
//!
//! Messages follow the OpenAI chat wire shapes: a role tag, content that
//! is either a plain string or an ordered list of typed parts, and an
//! optional tool call correlation id.

pub mod message;
pub mod transcript;

pub use message::{ContentPart, ImageUrl, Message, MessageContent, Role};
pub use transcript::Transcript;
