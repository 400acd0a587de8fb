#[cfg(test)]
use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use reqwest::Response;

use crate::Error;

const WIRE_TARGET: &str = "hf_adaptor::wire";

enum Chunks {
    Response(Response),
    #[cfg(test)]
    VecDeque(VecDeque<Bytes>),
    #[cfg(test)]
    Broken,
}

impl Chunks {
    #[inline]
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, Error> {
        match self {
            Chunks::Response(response) => response
                .chunk()
                .await
                .map_err(|err| Error::io("failed to read response body", err)),
            #[cfg(test)]
            Chunks::VecDeque(vec) => Ok(vec.pop_front()),
            #[cfg(test)]
            Chunks::Broken => Err(Error::io(
                "failed to read response body",
                std::io::Error::from(std::io::ErrorKind::ConnectionReset),
            )),
        }
    }
}

/// The body of a successful response, not yet read.
///
/// It is consumed by an extractor. Dropping it releases the connection.
pub struct Body {
    chunks: Chunks,
}

impl Body {
    #[inline]
    pub(crate) fn from_response(response: Response) -> Self {
        Self {
            chunks: Chunks::Response(response),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_vec_deque(vec: VecDeque<Bytes>) -> Self {
        Self {
            chunks: Chunks::VecDeque(vec),
        }
    }

    #[cfg(test)]
    pub(crate) fn broken() -> Self {
        Self {
            chunks: Chunks::Broken,
        }
    }

    /// Reads the whole body. When `echo` is set, the body is also written to
    /// the `hf_adaptor::wire` tracing target as it arrives.
    ///
    /// A character split across chunks is echoed once its last byte arrives.
    pub(crate) async fn read_all(mut self, echo: bool) -> Result<Bytes, Error> {
        let mut buf = BytesMut::new();
        let mut echoed = 0;
        while let Some(chunk) = self.chunks.next_chunk().await? {
            buf.extend_from_slice(&chunk);
            if echo {
                let end = echoed + complete_prefix(&buf[echoed..]);
                echo_text(&buf[echoed..end]);
                echoed = end;
            }
        }
        if echo {
            echo_text(&buf[echoed..]);
        }
        trace!("read {} bytes of response body", buf.len());
        Ok(buf.freeze())
    }
}

/// Length of the longest prefix of `bytes` that does not end inside a
/// character. Invalid sequences count as complete.
fn complete_prefix(bytes: &[u8]) -> usize {
    let mut start = 0;
    loop {
        match std::str::from_utf8(&bytes[start..]) {
            Ok(_) => return bytes.len(),
            Err(err) => match err.error_len() {
                Some(len) => start += err.valid_up_to() + len,
                None => return start + err.valid_up_to(),
            },
        }
    }
}

#[inline]
fn echo_text(bytes: &[u8]) {
    if !bytes.is_empty() {
        debug!(target: WIRE_TARGET, "{}", String::from_utf8_lossy(bytes));
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}

/// Runs `fut` with a subscriber that records every event, returning the
/// output of `fut` together with the formatted log.
#[cfg(test)]
pub(crate) async fn capture_wire<F: Future>(fut: F) -> (F::Output, String) {
    use std::sync::{Arc, Mutex};

    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let log = Arc::new(Mutex::new(Vec::new()));
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_target(true)
        .with_writer(move || Capture(writer.clone()))
        .finish();

    let output = {
        let _guard = tracing::subscriber::set_default(subscriber);
        fut.await
    };
    let log = String::from_utf8_lossy(&log.lock().unwrap()).into_owned();
    (output, log)
}
