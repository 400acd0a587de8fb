use hf_adaptor_model::FunctionCall;

use crate::Error;
use crate::io::Body;
use crate::proto::ChatCompletion;

/// What a chat call produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatReply {
    /// The text of the reply. May be empty when the model only made calls.
    pub content: String,
    /// Calls requested by the model, in the order it sent them.
    pub function_calls: Vec<FunctionCall>,
    /// Why the model stopped, when the endpoint reports it.
    pub finish_reason: Option<String>,
}

/// Strategy for decoding a chat response body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Extractor {
    /// Returns the body as the reply text. Invalid UTF-8 is replaced with
    /// U+FFFD, so only valid UTF-8 bodies come back byte for byte.
    #[default]
    Raw,
    /// Decodes an OpenAI-style chat completion and keeps the first choice.
    Chat,
    /// Like [`Extractor::Raw`], echoing the body to the wire log.
    DebugRaw,
    /// Like [`Extractor::Chat`], echoing the body to the wire log.
    DebugChat,
}

impl Extractor {
    /// Whether the body is echoed to the `hf_adaptor::wire` tracing target
    /// while it is read.
    #[inline]
    pub fn is_debug(self) -> bool {
        matches!(self, Extractor::DebugRaw | Extractor::DebugChat)
    }

    /// Reads `body` to the end and decodes it.
    pub async fn extract(self, body: Body) -> Result<ChatReply, Error> {
        let bytes = body.read_all(self.is_debug()).await?;
        match self {
            Extractor::Raw | Extractor::DebugRaw => Ok(extract_raw(&bytes)),
            Extractor::Chat | Extractor::DebugChat => extract_chat(&bytes),
        }
    }
}

/// Returns `bytes` as the reply text, without any calls.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn extract_raw(bytes: &[u8]) -> ChatReply {
    ChatReply {
        content: String::from_utf8_lossy(bytes).into_owned(),
        ..Default::default()
    }
}

/// Decodes a chat completion and returns the content and calls of its first
/// choice.
pub fn extract_chat(bytes: &[u8]) -> Result<ChatReply, Error> {
    if is_blank(bytes) {
        return Err(Error::empty_body());
    }
    let completion: ChatCompletion =
        serde_json::from_slice(bytes).map_err(Error::decode)?;
    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(Error::no_choices());
    };
    let (content, function_calls) = choice.message.into_parts();
    Ok(ChatReply {
        content,
        function_calls,
        finish_reason: choice.finish_reason,
    })
}

#[inline]
pub(crate) fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}
