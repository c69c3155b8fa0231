//! Common types shared by the client API: messages, threads, stream modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input
    User,
    /// AI assistant response
    Assistant,
    /// System prompt
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Create a new user message from text.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message from text.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Create a new system message from text.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Input payload for one graph run: an ordered sequence of messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    /// Conversation messages, oldest first.
    pub messages: Vec<Message>,
}

impl GraphInput {
    /// Build an input from a list of messages.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Build an input holding a single user message.
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(content)],
        }
    }
}

/// Opaque handle to a server-side conversation thread.
///
/// Created once per conversation via [`crate::RemoteGraphClient::create_thread`]
/// and passed by value into every subsequent call; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Thread {
    thread_id: String,
}

impl Thread {
    /// Adopt an existing server-side thread by its identifier.
    pub fn from_id(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
        }
    }

    /// The thread identifier.
    pub fn id(&self) -> &str {
        &self.thread_id
    }
}

impl fmt::Display for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.thread_id)
    }
}

/// Granularity of incremental output frames from a streaming run.
///
/// Fixed for the lifetime of one call; determines the chunk schema the
/// caller decodes. The client itself never interprets chunk contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamMode {
    /// Each chunk is a diff of changed state keys since the previous chunk.
    Updates,
    /// Each chunk is a `[message, metadata]` pair, one per emitted token
    /// or completed message.
    Messages,
}

impl fmt::Display for StreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamMode::Updates => write!(f, "updates"),
            StreamMode::Messages => write!(f, "messages"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::User).unwrap();
        assert_eq!(json, "\"user\"");

        let role: Role = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(role, Role::Assistant);
    }

    #[test]
    fn test_user_message() {
        let msg = Message::user("Hello, world!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello, world!");
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::system("You are a helpful assistant.");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are a helpful assistant.");
    }

    #[test]
    fn test_graph_input_from_user() {
        let input = GraphInput::from_user("ping");
        assert_eq!(input.messages.len(), 1);
        assert_eq!(input.messages[0].role, Role::User);

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["messages"][0]["content"], "ping");
    }

    #[test]
    fn test_thread_from_id() {
        let thread = Thread::from_id("th-123");
        assert_eq!(thread.id(), "th-123");
        assert_eq!(thread.to_string(), "th-123");
    }

    #[test]
    fn test_thread_deserialization() {
        let thread: Thread = serde_json::from_str(r#"{"thread_id":"th-9"}"#).unwrap();
        assert_eq!(thread.id(), "th-9");
    }

    #[test]
    fn test_stream_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&StreamMode::Updates).unwrap(),
            "\"updates\""
        );
        assert_eq!(
            serde_json::to_string(&StreamMode::Messages).unwrap(),
            "\"messages\""
        );
        assert_eq!(StreamMode::Messages.to_string(), "messages");
    }
}
