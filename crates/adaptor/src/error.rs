use std::error::Error as StdError;
use std::fmt::{self, Display};

type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

/// The stage at which a call failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request payload could not be encoded.
    Request,
    /// The request could not be delivered (connection, DNS, timeout).
    Transport,
    /// The endpoint answered with a status that is not retried.
    Status,
    /// Every attempt was answered with `503 Service Unavailable`.
    RetriesExceeded,
    /// The response body could not be read.
    Io,
    /// The response body was empty where JSON was expected.
    EmptyBody,
    /// A chat response carried no choices.
    NoChoices,
    /// The response body did not have the expected shape.
    Decode,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Request => write!(f, "request construction"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::Status => write!(f, "service"),
            ErrorKind::RetriesExceeded => write!(f, "retries exceeded"),
            ErrorKind::Io => write!(f, "body read"),
            ErrorKind::EmptyBody => write!(f, "empty body"),
            ErrorKind::NoChoices => write!(f, "no choices"),
            ErrorKind::Decode => write!(f, "decode"),
        }
    }
}

/// Error type for the adaptors.
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
    status: Option<u16>,
    body: Option<String>,
    source: Option<BoxedSource>,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
            status: None,
            body: None,
            source: None,
        }
    }

    fn with_source(
        mut self,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub(crate) fn request(source: serde_json::Error) -> Self {
        Self::new(format!("error encoding request: {source}"), ErrorKind::Request)
            .with_source(source)
    }

    pub(crate) fn transport(source: reqwest::Error) -> Self {
        Self::new(format!("error sending request: {source}"), ErrorKind::Transport)
            .with_source(source)
    }

    pub(crate) fn bad_status(status: u16, body: String) -> Self {
        let mut err = Self::new(
            format!("API request failed with status {status}"),
            ErrorKind::Status,
        );
        err.status = Some(status);
        err.body = Some(body);
        err
    }

    pub(crate) fn retries_exceeded(attempts: u32) -> Self {
        let mut err = Self::new(
            format!("retries exceeded after {attempts} attempts"),
            ErrorKind::RetriesExceeded,
        );
        if attempts > 0 {
            err.status = Some(503);
        }
        err
    }

    pub(crate) fn io(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::new(message, ErrorKind::Io).with_source(source)
    }

    pub(crate) fn empty_body() -> Self {
        Self::new("response body is empty", ErrorKind::EmptyBody)
    }

    pub(crate) fn no_choices() -> Self {
        Self::new("no choices found in response", ErrorKind::NoChoices)
    }

    pub(crate) fn decode(source: serde_json::Error) -> Self {
        Self::new(format!("error decoding response: {source}"), ErrorKind::Decode)
            .with_source(source)
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status that caused the error, if any.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the response body sent along with a failing status.
    #[inline]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error() {
        let err = Error::bad_status(404, "not found".to_owned());
        assert_eq!(err.kind(), ErrorKind::Status);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some("not found"));
        assert!(err.to_string().contains("404"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_retries_exceeded_status() {
        let err = Error::retries_exceeded(3);
        assert_eq!(err.kind(), ErrorKind::RetriesExceeded);
        assert_eq!(err.status(), Some(503));

        let err = Error::retries_exceeded(0);
        assert_eq!(err.kind(), ErrorKind::RetriesExceeded);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_decode_error_has_source() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = Error::decode(source);
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.source().is_some());
    }
}
