//! Stream session state
//!
//! The mutable state behind a consumer, guarded by a session generation so
//! that work belonging to a superseded session cannot touch it.

use tokio_util::sync::CancellationToken;

use crate::error::StreamError;

/// State of the current (or last) stream session
///
/// Every mutation takes the generation the caller was started with and is a
/// no-op when that generation is no longer current. The cancellation token
/// wakes a session that is parked waiting on its source once it is superseded.
#[derive(Debug, Default)]
pub(crate) struct StreamSession {
    generation: u64,
    cancel: CancellationToken,
    text: String,
    chunks: Vec<String>,
    active: bool,
    error: Option<StreamError>,
}

impl StreamSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Drop all state and invalidate any session still in flight
    pub(crate) fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.text = String::new();
        self.chunks = Vec::new();
        self.active = false;
        self.error = None;
    }

    /// Start a fresh session, returning its generation and the token that
    /// fires when it is superseded
    pub(crate) fn begin(&mut self) -> (u64, CancellationToken) {
        self.clear();
        self.active = true;
        (self.generation, self.cancel.clone())
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Append one decoded fragment to both the text and the chunk list
    pub(crate) fn push_chunk(&mut self, generation: u64, chunk: &str) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.text.push_str(chunk);
        self.chunks.push(chunk.to_owned());
        true
    }

    /// Enter the success terminal state
    pub(crate) fn complete(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.active = false;
        true
    }

    /// Enter the error terminal state, keeping whatever text arrived
    pub(crate) fn fail(&mut self, generation: u64, error: StreamError) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.active = false;
        self.error = Some(error);
        true
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn error(&self) -> Option<&StreamError> {
        self.error.as_ref()
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generation: self.generation,
            text: self.text.clone(),
            chunks: self.chunks.clone(),
            is_active: self.active,
            error: self.error.clone(),
        }
    }
}

/// Owned copy of a session, taken atomically
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub text: String,
    pub chunks: Vec<String>,
    pub is_active: bool,
    pub error: Option<StreamError>,
}

impl SessionSnapshot {
    /// Ended without error and nothing is in flight
    pub fn is_complete(&self) -> bool {
        !self.is_active && self.error.is_none()
    }
}
