use serde::{Deserialize, Serialize};

use crate::FunctionCall;

/// The author of a [`Message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that steer the model.
    System,
    /// An end-user turn.
    User,
    /// A model turn.
    Assistant,
}

impl Role {
    /// Returns the wire name of the role.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single chat message.
///
/// The content may be empty when the message carries tool calls instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// The author of the message.
    pub role: Role,
    /// The text of the message.
    #[serde(default, deserialize_with = "crate::de::null_as_empty")]
    pub content: String,
    /// Calls requested by the model in this turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<FunctionCall>,
}

impl Message {
    /// Creates a message with the given role and content.
    #[inline]
    pub fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Creates a system message.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Creates an assistant message that replays the calls a model made, so
    /// that a reply can be appended to the history as it was received.
    #[inline]
    pub fn assistant_with_calls<S: Into<String>>(
        content: S,
        tool_calls: Vec<FunctionCall>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_plain_message_omits_tool_calls() {
        let value = serde_json::to_value(Message::user("Hello")).unwrap();
        assert_eq!(value, json!({ "role": "user", "content": "Hello" }));
    }

    #[test]
    fn test_null_content_is_empty() {
        let msg: Message = serde_json::from_value(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": { "name": "lookup", "arguments": "{}" }
            }]
        }))
        .unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "");
        assert_eq!(msg.tool_calls.len(), 1);
        assert_eq!(msg.tool_calls[0].name, "lookup");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_value::<Message>(json!({
            "role": "tool",
            "content": "x"
        }));
        assert!(result.is_err());
    }
}
