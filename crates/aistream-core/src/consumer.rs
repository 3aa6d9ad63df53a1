//! Stream consumer
//!
//! Drives one byte source at a time to completion, exposing the decoded text
//! as it arrives and settling into a success or error state.

use std::time::Instant;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::decoder::Utf8Decoder;
use crate::error::StreamError;
use crate::options::StreamOptions;
use crate::session::{SessionSnapshot, StreamSession};
use crate::source::{ByteStream, StreamSource};

/// How a pull loop ended without an error
enum Pumped {
    Finished { bytes: usize, chunks: usize },
    /// A reset or newer session took over
    Superseded,
}

/// Incremental consumer of a streamed text response
///
/// All methods take `&self`, so a consumer can sit behind an `Arc` while one
/// task awaits [`start`](Self::start) and others read state or call
/// [`reset`](Self::reset). The state lock is never held across a pull or
/// while a callback runs.
pub struct StreamConsumer {
    session: Mutex<StreamSession>,
    options: StreamOptions,
}

impl StreamConsumer {
    pub fn new() -> Self {
        Self::with_options(StreamOptions::default())
    }

    pub fn with_options(options: StreamOptions) -> Self {
        Self {
            session: Mutex::new(StreamSession::new()),
            options,
        }
    }

    /// Consume `source` until it ends or fails
    ///
    /// Any previous session is discarded first. Failures never escape: they
    /// end up in [`last_error`](Self::last_error) and the error callback.
    pub async fn start(&self, source: impl Into<StreamSource>) {
        let (generation, cancel) = self.session.lock().begin();
        let started = Instant::now();
        debug!("Stream session {} started", generation);

        let stream = match source.into().into_stream() {
            Ok(stream) => stream,
            Err(err) => {
                self.fail(generation, err);
                return;
            }
        };

        match self.pump(generation, &cancel, stream).await {
            Ok(Pumped::Finished { bytes, chunks }) => {
                let text = {
                    let mut session = self.session.lock();
                    if !session.complete(generation) {
                        debug!("Stream session {} superseded before completion", generation);
                        return;
                    }
                    self.options
                        .on_complete
                        .as_ref()
                        .map(|_| session.text().to_owned())
                };
                info!(
                    "Stream session {} complete: {} chunks, {} bytes in {:?}",
                    generation,
                    chunks,
                    bytes,
                    started.elapsed()
                );
                if let (Some(callback), Some(text)) = (&self.options.on_complete, text) {
                    callback(&text);
                }
            }
            Ok(Pumped::Superseded) => {
                debug!("Stream session {} superseded, dropping its source", generation);
            }
            Err(err) => self.fail(generation, err),
        }
    }

    /// Clear all state and orphan any session still in flight
    pub fn reset(&self) {
        self.session.lock().clear();
    }

    /// All text received so far
    pub fn text(&self) -> String {
        self.session.lock().text().to_owned()
    }

    pub fn chunks(&self) -> Vec<String> {
        self.session.lock().chunks().to_vec()
    }

    pub fn is_active(&self) -> bool {
        self.session.lock().is_active()
    }

    pub fn last_error(&self) -> Option<StreamError> {
        self.session.lock().error().cloned()
    }

    /// All four observable fields read under one lock
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().snapshot()
    }

    /// Pull, decode and deliver until the stream ends
    ///
    /// A pull still waiting when the session is superseded is abandoned, so
    /// the source and decoder are dropped right away.
    async fn pump(
        &self,
        generation: u64,
        cancel: &CancellationToken,
        mut stream: ByteStream,
    ) -> Result<Pumped, StreamError> {
        let mut decoder = Utf8Decoder::new(self.options.strict_utf8);
        let mut bytes = 0;
        let mut chunks = 0;

        loop {
            let item = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(Pumped::Superseded),
                item = stream.next() => item,
            };
            let Some(item) = item else {
                break;
            };
            let data = item.map_err(StreamError::source_error)?;
            bytes += data.len();
            let chunk = decoder.decode(&data)?;
            if !self.deliver(generation, &chunk) {
                return Ok(Pumped::Superseded);
            }
            chunks += 1;
        }

        let tail = decoder.finish()?;
        if !tail.is_empty() {
            if !self.deliver(generation, &tail) {
                return Ok(Pumped::Superseded);
            }
            chunks += 1;
        }

        Ok(Pumped::Finished { bytes, chunks })
    }

    /// Record one fragment, then notify
    fn deliver(&self, generation: u64, chunk: &str) -> bool {
        let total = {
            let mut session = self.session.lock();
            if !session.push_chunk(generation, chunk) {
                return false;
            }
            session.text().len()
        };
        debug!(
            "Stream session {}: chunk of {} chars (total: {} bytes)",
            generation,
            chunk.chars().count(),
            total
        );
        if let Some(callback) = &self.options.on_chunk {
            callback(chunk);
        }
        true
    }

    fn fail(&self, generation: u64, err: StreamError) {
        if !self.session.lock().fail(generation, err.clone()) {
            debug!("Stream session {} superseded, dropping error: {}", generation, err);
            return;
        }
        warn!("Stream session {} failed: {}", generation, err);
        if let Some(callback) = &self.options.on_error {
            callback(&err);
        }
    }
}

impl Default for StreamConsumer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StreamConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamConsumer")
            .field("session", &*self.session.lock())
            .field("options", &self.options)
            .finish()
    }
}
