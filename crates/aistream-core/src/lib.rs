//! Core library for aistream
//!
//! Consumes a streamed byte response incrementally: decodes it to text as it
//! arrives, exposes the accumulated text and per-chunk notifications, and
//! settles into a success or error state without ever raising to the caller.

pub mod consumer;
pub mod decoder;
pub mod error;
pub mod options;
pub mod session;
pub mod source;

pub use consumer::StreamConsumer;
pub use decoder::Utf8Decoder;
pub use error::{BoxError, StreamError};
pub use options::StreamOptions;
pub use session::SessionSnapshot;
pub use source::{ByteStream, ResponseLike, StreamResponse, StreamSource};
