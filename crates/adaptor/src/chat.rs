use hf_adaptor_model::{Message, Role, Tool};
use tracing::Instrument;

use crate::extract::{ChatReply, Extractor};
use crate::sender::Sender;
use crate::{AdaptorConfig, Error, proto};

/// Adaptor for chat completion endpoints.
///
/// Every request opens with the configured system instruction, followed by
/// the caller's history and the new message. The adaptor keeps no
/// conversation state of its own, and it is cheap to clone and safe to
/// share between tasks.
#[derive(Clone, Debug)]
pub struct ChatAdaptor {
    sender: Sender,
    extractor: Extractor,
}

impl ChatAdaptor {
    /// Creates an adaptor that decodes responses with `extractor`.
    #[inline]
    pub fn new(config: AdaptorConfig, extractor: Extractor) -> Self {
        Self {
            sender: Sender::new(config),
            extractor,
        }
    }

    /// Returns the configuration of this adaptor.
    #[inline]
    pub fn config(&self) -> &AdaptorConfig {
        self.sender.config()
    }

    /// Returns the extractor responses are decoded with.
    #[inline]
    pub fn extractor(&self) -> Extractor {
        self.extractor
    }

    /// Sends a single user message without history or tools.
    pub async fn send_request(&self, message: &str) -> Result<ChatReply, Error> {
        self.send_with_role(message, Role::User, &[], &[]).await
    }

    /// Sends a user message after `history`, offering `tools` to the model.
    pub async fn send_request_with_history(
        &self,
        message: &str,
        history: &[Message],
        tools: &[Tool],
    ) -> Result<ChatReply, Error> {
        self.send_with_role(message, Role::User, history, tools).await
    }

    /// Sends a system message after `history`, offering `tools` to the model.
    ///
    /// Use this to steer the conversation rather than to speak for the user.
    pub async fn send_system_request_with_history(
        &self,
        message: &str,
        history: &[Message],
        tools: &[Tool],
    ) -> Result<ChatReply, Error> {
        self.send_with_role(message, Role::System, history, tools).await
    }

    async fn send_with_role(
        &self,
        message: &str,
        role: Role,
        history: &[Message],
        tools: &[Tool],
    ) -> Result<ChatReply, Error> {
        let req =
            proto::create_request(self.config(), role, message, history, tools);
        async move {
            trace!(
                "sending {} messages and {} tools",
                req.messages.len(),
                req.tools.len()
            );
            let body = self.sender.send(&req).await?;
            let reply = self.extractor.extract(body).await.inspect_err(|err| {
                error!("failed to extract response: {err}");
            })?;
            debug!(
                "got a reply with {} function calls",
                reply.function_calls.len()
            );
            Ok(reply)
        }
        .instrument(debug_span!("chat request", role = role.as_str()))
        .await
    }
}
