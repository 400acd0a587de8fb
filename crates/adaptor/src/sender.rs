use std::sync::Arc;
use std::time::Duration;

use backoff::backoff::Backoff;
use bytes::Bytes;
use reqwest::{Client, Response, StatusCode, header};
use serde::Serialize;

use crate::io::Body;
use crate::{AdaptorConfig, Error};

/// Waits a fixed interval between attempts and gives up after a fixed
/// number of attempts.
#[derive(Clone, Copy, Debug)]
struct FixedInterval {
    interval: Duration,
    max_attempts: u32,
    failed: u32,
}

impl FixedInterval {
    #[inline]
    fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            failed: 0,
        }
    }
}

impl Backoff for FixedInterval {
    fn reset(&mut self) {
        self.failed = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.failed += 1;
        (self.failed < self.max_attempts).then_some(self.interval)
    }
}

enum Failure {
    /// `503 Service Unavailable`, worth another attempt.
    Unavailable,
    Fatal(Error),
}

/// Posts JSON payloads to the configured endpoint.
///
/// A `503 Service Unavailable` answer is retried after a fixed interval until
/// the attempt budget is used up. Any other failure ends the call at once.
#[derive(Clone, Debug)]
pub struct Sender {
    client: Client,
    config: Arc<AdaptorConfig>,
}

impl Sender {
    /// Creates a sender with the given configuration.
    #[inline]
    pub fn new(config: AdaptorConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this sender.
    #[inline]
    pub fn config(&self) -> &AdaptorConfig {
        &self.config
    }

    /// Sends `payload` and returns the body of the `200 OK` response.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future aborts the in-flight
    /// request or the pending wait between attempts.
    pub async fn send<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<Body, Error> {
        let max_attempts = self.config.max_retries;
        if max_attempts == 0 {
            return Err(Error::retries_exceeded(0));
        }
        let body = Bytes::from(serde_json::to_vec(payload).map_err(Error::request)?);

        let mut attempt = 0;
        let result = backoff::future::retry_notify(
            FixedInterval::new(self.config.retry_interval, max_attempts),
            move || {
                attempt += 1;
                self.attempt(body.clone(), attempt)
            },
            |_: Failure, wait: Duration| {
                warn!(
                    "status code 503 - service not ready - retrying in \
                     {wait:?} with max {max_attempts} attempts"
                );
            },
        )
        .await;

        match result {
            Ok(resp) => Ok(Body::from_response(resp)),
            Err(Failure::Unavailable) => {
                error!("service still unavailable after {max_attempts} attempts");
                Err(Error::retries_exceeded(max_attempts))
            }
            Err(Failure::Fatal(err)) => Err(err),
        }
    }

    async fn attempt(
        &self,
        body: Bytes,
        attempt: u32,
    ) -> Result<Response, backoff::Error<Failure>> {
        trace!("attempt {attempt}: posting {} bytes", body.len());
        let mut req = self
            .client
            .post(&self.config.url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .body(body);
        if let Some(timeout) = self.config.timeout {
            req = req.timeout(timeout);
        }

        let resp = req.send().await.map_err(|err| {
            error!("got a transport error: {err}");
            backoff::Error::permanent(Failure::Fatal(Error::transport(err)))
        })?;

        match resp.status() {
            StatusCode::OK => Ok(resp),
            StatusCode::SERVICE_UNAVAILABLE => {
                // The body of a 503 carries nothing useful.
                drop(resp);
                Err(backoff::Error::transient(Failure::Unavailable))
            }
            status => {
                let text = match resp.text().await {
                    Ok(text) => text,
                    Err(err) => {
                        warn!("could not read error body: {err}");
                        String::new()
                    }
                };
                warn!("request failed with status {status}: {text}");
                let err = Error::bad_status(status.as_u16(), text);
                Err(backoff::Error::permanent(Failure::Fatal(err)))
            }
        }
    }
}
