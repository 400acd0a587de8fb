use hf_adaptor_model::QnAResponse;
use serde_json::{Map, Value};
use tracing::Instrument;

use crate::extract::is_blank;
use crate::io::Body;
use crate::sender::Sender;
use crate::{AdaptorConfig, Error, proto};

/// Strategy for decoding a question answering response body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QnaExtractor {
    /// Decodes a JSON array of answers.
    #[default]
    Json,
    /// Like [`QnaExtractor::Json`], echoing the body to the wire log.
    DebugJson,
}

impl QnaExtractor {
    /// Reads `body` to the end and decodes it.
    pub async fn extract(self, body: Body) -> Result<Vec<QnAResponse>, Error> {
        let bytes = body
            .read_all(matches!(self, QnaExtractor::DebugJson))
            .await?;
        extract_answers(&bytes)
    }
}

/// Decodes a JSON array of answer candidates, keeping the endpoint's order.
pub fn extract_answers(bytes: &[u8]) -> Result<Vec<QnAResponse>, Error> {
    if is_blank(bytes) {
        return Err(Error::empty_body());
    }
    serde_json::from_slice(bytes).map_err(Error::decode)
}

/// Adaptor for extractive question answering endpoints.
#[derive(Clone, Debug)]
pub struct QnAAdaptor {
    sender: Sender,
    extractor: QnaExtractor,
}

impl QnAAdaptor {
    /// Creates an adaptor that decodes responses with `extractor`.
    #[inline]
    pub fn new(config: AdaptorConfig, extractor: QnaExtractor) -> Self {
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

    /// Asks `question` about `context`.
    ///
    /// `parameters` are passed to the endpoint as they are. The answers come
    /// back in the order the endpoint ranked them; an empty list means no
    /// answer was found.
    pub async fn send_question(
        &self,
        context: &str,
        question: &str,
        parameters: Option<Map<String, Value>>,
    ) -> Result<Vec<QnAResponse>, Error> {
        let req = proto::create_question(context, question, parameters);
        async move {
            let body = self.sender.send(&req).await?;
            let answers = self.extractor.extract(body).await?;
            debug!("got {} answers", answers.len());
            Ok(answers)
        }
        .instrument(debug_span!("qna request"))
        .await
    }
}
