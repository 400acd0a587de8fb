use serde::{Deserialize, Serialize};

/// One answer candidate returned by a question answering endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QnAResponse {
    /// The answer text, a span of the context.
    pub answer: String,
    /// Confidence in `[0, 1]`.
    pub score: f64,
    /// Character offset where the span starts.
    pub start: usize,
    /// Character offset where the span ends.
    pub end: usize,
}
