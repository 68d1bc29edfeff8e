//! Ordered conversation transcript

use super::message::{Message, Role};
use serde::{Deserialize, Serialize};

/// An ordered sequence of chat messages, insertion order = conversation
/// order
///
/// The transcript is exclusively owned by its session's turn-processing
/// loop; there is exactly one writer and no background eviction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript seeded with a system message
    pub fn with_system(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
        }
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All messages in conversation order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Index of the oldest message eligible for eviction
    ///
    /// Returns `None` when only pinned (system) messages remain.
    pub fn first_unpinned_index(&self) -> Option<usize> {
        self.messages.iter().position(|m| !m.is_pinned())
    }

    /// Remove and return the message at `index`
    ///
    /// Panics if `index` is out of bounds; callers obtain indices from
    /// [`first_unpinned_index`](Self::first_unpinned_index).
    pub fn remove(&mut self, index: usize) -> Message {
        self.messages.remove(index)
    }

    /// Count of messages with the given role
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

impl FromIterator<Message> for Transcript {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_transcript() {
        let transcript = Transcript::with_system("You are a helpful chatbot.");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, Role::System);
    }

    #[test]
    fn test_first_unpinned_skips_system() {
        let mut transcript = Transcript::with_system("rules");
        transcript.push(Message::user("hi"));
        transcript.push(Message::assistant("hello"));

        assert_eq!(transcript.first_unpinned_index(), Some(1));
    }

    #[test]
    fn test_first_unpinned_with_multiple_system_messages() {
        let transcript: Transcript = [
            Message::system("rules"),
            Message::system("more rules"),
            Message::user("hi"),
        ]
        .into_iter()
        .collect();

        assert_eq!(transcript.first_unpinned_index(), Some(2));
    }

    #[test]
    fn test_first_unpinned_none_when_only_system() {
        let transcript = Transcript::with_system("rules");
        assert_eq!(transcript.first_unpinned_index(), None);

        let empty = Transcript::new();
        assert_eq!(empty.first_unpinned_index(), None);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut transcript: Transcript = [
            Message::system("rules"),
            Message::user("first"),
            Message::assistant("second"),
        ]
        .into_iter()
        .collect();

        let removed = transcript.remove(1);
        assert_eq!(removed.role, Role::User);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[1].role, Role::Assistant);
    }
}
