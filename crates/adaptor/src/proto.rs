use hf_adaptor_model::{
    ChatRequest, FunctionCall, Message, QnAInputs, QnARequest, Role, Tool,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::AdaptorConfig;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<FunctionCall>>,
    /// The single call sent by endpoints that predate `tool_calls`.
    pub function_call: Option<FunctionCall>,
}

impl ChoiceMessage {
    /// Splits the message into its text and an ordered list of calls, no
    /// matter which of the two call fields the endpoint used.
    pub fn into_parts(self) -> (String, Vec<FunctionCall>) {
        let mut calls = self.tool_calls.unwrap_or_default();
        calls.extend(self.function_call);
        (self.content.unwrap_or_default(), calls)
    }
}

// -----------
// Conversions
// -----------

/// Frames a chat request as the base instruction, then the history, then the
/// new message.
pub fn create_request(
    config: &AdaptorConfig,
    role: Role,
    message: &str,
    history: &[Message],
    tools: &[Tool],
) -> ChatRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(unescape(&config.instruction)));
    messages.extend_from_slice(history);
    messages.push(Message::new(role, unescape(message)));
    ChatRequest {
        model: config.model.clone(),
        messages,
        tools: tools.to_vec(),
    }
}

#[inline]
pub fn create_question(
    context: &str,
    question: &str,
    parameters: Option<Map<String, Value>>,
) -> QnARequest {
    QnARequest {
        inputs: QnAInputs {
            context: context.to_owned(),
            question: question.to_owned(),
        },
        parameters,
    }
}

// Text may arrive HTML-escaped from upstream producers.
#[inline]
fn unescape(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
