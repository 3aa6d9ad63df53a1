//! Consumer options
//!
//! Observer callbacks and decoding behaviour, fixed when a consumer is built.

use std::fmt;

use crate::error::StreamError;

pub type ChunkCallback = Box<dyn Fn(&str) + Send + Sync>;
pub type CompleteCallback = Box<dyn Fn(&str) + Send + Sync>;
pub type ErrorCallback = Box<dyn Fn(&StreamError) + Send + Sync>;

/// Configuration for a [`StreamConsumer`](crate::StreamConsumer)
///
/// Any subset of the callbacks may be set; unset ones are skipped.
#[derive(Default)]
pub struct StreamOptions {
    pub(crate) on_chunk: Option<ChunkCallback>,
    pub(crate) on_complete: Option<CompleteCallback>,
    pub(crate) on_error: Option<ErrorCallback>,
    pub(crate) strict_utf8: bool,
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with each decoded fragment, in arrival order
    pub fn on_chunk(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_chunk = Some(Box::new(callback));
        self
    }

    /// Called once with the full text when the stream ends cleanly
    pub fn on_complete(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Called once with the error when a session fails
    pub fn on_error(mut self, callback: impl Fn(&StreamError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Fail on invalid UTF-8 instead of substituting U+FFFD
    pub fn strict_utf8(mut self, strict: bool) -> Self {
        self.strict_utf8 = strict;
        self
    }
}

impl fmt::Debug for StreamOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamOptions")
            .field("on_chunk", &self.on_chunk.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("strict_utf8", &self.strict_utf8)
            .finish()
    }
}
