//! Transcript token accounting

use super::tokenizer::TokenCounter;
use crate::transcript::{ContentPart, Message, MessageContent, Transcript};

/// Count the tokens of a single message's textual content
///
/// Multi-part content sums only the text-typed parts; non-text parts
/// (e.g. images) contribute zero, a known limitation for multi-modal
/// budget accuracy.
pub fn message_tokens(message: &Message, counter: &dyn TokenCounter) -> usize {
    match &message.content {
        MessageContent::Text(text) => counter.count(text),
        MessageContent::Parts(parts) => parts
            .iter()
            .map(|part| match part {
                ContentPart::Text { text } => counter.count(text),
                ContentPart::ImageUrl { .. } => 0,
            })
            .sum(),
    }
}

/// Count the total tokens across a transcript
///
/// Pure function over the current transcript state. Callers recompute
/// after every edit; counts are never decremented incrementally because
/// token boundaries can shift in ways not strictly additive across
/// removals.
pub fn transcript_tokens(transcript: &Transcript, counter: &dyn TokenCounter) -> usize {
    transcript
        .messages()
        .iter()
        .map(|m| message_tokens(m, counter))
        .sum()
}
