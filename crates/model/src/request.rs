use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Message, Tool};

/// A chat completion request, sent verbatim as the request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model identifier.
    pub model: String,
    /// The conversation, oldest message first.
    pub messages: Vec<Message>,
    /// Tools that are available to the model.
    ///
    /// Omitted from the body when empty, since some endpoints treat an
    /// explicit empty array differently from a missing field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

/// The inputs of a [`QnARequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QnAInputs {
    /// The text to search for an answer.
    pub context: String,
    /// The question to answer.
    pub question: String,
}

/// An extractive question answering request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QnARequest {
    /// The context and the question.
    pub inputs: QnAInputs,
    /// Model specific knobs, passed through unvalidated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}
