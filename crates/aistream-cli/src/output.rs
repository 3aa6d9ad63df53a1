//! Terminal output
//!
//! Writes chunks to stdout as they arrive and the end-of-stream summary.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use aistream_core::SessionSnapshot;
use serde::Serialize;
use tracing::warn;

/// Prints chunks from the consumer's on-chunk callback
pub struct ChunkPrinter<W> {
    out: parking_lot::Mutex<W>,
    show_chunks: bool,
    printed: AtomicUsize,
}

impl ChunkPrinter<io::Stdout> {
    pub fn stdout(show_chunks: bool) -> Self {
        Self::new(io::stdout(), show_chunks)
    }
}

impl<W: Write> ChunkPrinter<W> {
    pub fn new(out: W, show_chunks: bool) -> Self {
        Self {
            out: parking_lot::Mutex::new(out),
            show_chunks,
            printed: AtomicUsize::new(0),
        }
    }

    pub fn chunk(&self, chunk: &str) {
        let index = self.printed.fetch_add(1, Ordering::Relaxed);
        let mut out = self.out.lock();
        let result = if self.show_chunks {
            writeln!(out, "[{}] {}", index, chunk.escape_debug())
        } else {
            write!(out, "{}", chunk)
        };
        if let Err(e) = result.and_then(|()| out.flush()) {
            warn!("Failed to write chunk {}: {}", index, e);
        }
    }

    /// Close the streamed text with a newline if it didn't end with one
    pub fn finish(&self, text: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        if !self.show_chunks && !text.is_empty() && !text.ends_with('\n') {
            writeln!(out)?;
        }
        out.flush()
    }

    pub fn printed(&self) -> usize {
        self.printed.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

/// End-of-stream report for `--summary`
#[derive(Debug, Serialize)]
pub struct Summary {
    pub chunks: usize,
    pub text_bytes: usize,
    pub chars: usize,
    pub error: Option<String>,
}

impl Summary {
    /// One-line JSON record
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&SessionSnapshot> for Summary {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            chunks: snapshot.chunks.len(),
            text_bytes: snapshot.text.len(),
            chars: snapshot.text.chars().count(),
            error: snapshot.error.as_ref().map(ToString::to_string),
        }
    }
}
