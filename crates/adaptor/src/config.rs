use std::fmt::Debug;
use std::time::Duration;

const DEFAULT_URL: &str = "https://router.huggingface.co/v1/chat/completions";
const DEFAULT_MODEL: &str = "tgi";
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(30);

/// Builder for [`AdaptorConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AdaptorConfigBuilder {
    api_key: String,
    url: Option<String>,
    model: Option<String>,
    instruction: Option<String>,
    max_retries: Option<u32>,
    retry_interval: Option<Duration>,
    timeout: Option<Duration>,
}

impl AdaptorConfigBuilder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            url: None,
            model: None,
            instruction: None,
            max_retries: None,
            retry_interval: None,
            timeout: None,
        }
    }

    /// Sets the endpoint URL requests are posted to.
    #[inline]
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the model to use.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the system instruction that opens every chat request.
    #[inline]
    pub fn with_instruction<S: Into<String>>(mut self, instruction: S) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Sets how many attempts a request gets while the service answers
    /// `503 Service Unavailable`.
    #[inline]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the fixed wait between two attempts.
    #[inline]
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = Some(interval);
        self
    }

    /// Sets a deadline for each attempt, covering the whole exchange.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> AdaptorConfig {
        AdaptorConfig {
            api_key: self.api_key,
            url: self.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            instruction: self.instruction.unwrap_or_default(),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_interval: self
                .retry_interval
                .unwrap_or(DEFAULT_RETRY_INTERVAL),
            timeout: self.timeout,
        }
    }
}

impl Debug for AdaptorConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptorConfigBuilder")
            .field("api_key", &"<deducted>")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("instruction", &self.instruction)
            .field("max_retries", &self.max_retries)
            .field("retry_interval", &self.retry_interval)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Configuration shared by the chat and question answering adaptors.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AdaptorConfig {
    pub(crate) api_key: String,
    pub(crate) url: String,
    pub(crate) model: String,
    pub(crate) instruction: String,
    pub(crate) max_retries: u32,
    pub(crate) retry_interval: Duration,
    pub(crate) timeout: Option<Duration>,
}

impl AdaptorConfig {
    /// Returns the endpoint URL.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the model identifier.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the base system instruction.
    #[inline]
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Returns the attempt budget.
    #[inline]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl Debug for AdaptorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptorConfig")
            .field("api_key", &"<deducted>")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("instruction", &self.instruction)
            .field("max_retries", &self.max_retries)
            .field("retry_interval", &self.retry_interval)
            .field("timeout", &self.timeout)
            .finish()
    }
}
