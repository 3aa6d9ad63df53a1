//! Byte sources
//!
//! What a stream session can read from: an open byte stream, or a completed
//! response that may or may not carry one.

use std::fmt;

use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::error::{BoxError, StreamError};

/// Pull-based byte source: each item is the next unit of bytes or a failure
pub type ByteStream = BoxStream<'static, Result<Bytes, BoxError>>;

/// A completed response exposing its body as a byte stream
pub trait ResponseLike {
    /// Take the body, or `None` when the response has none
    fn into_body(self) -> Option<ByteStream>;
}

/// Transport-neutral response wrapper
pub struct StreamResponse {
    pub status: u16,
    pub body: Option<ByteStream>,
}

impl StreamResponse {
    /// Response with a body stream
    pub fn new<S, B, E>(status: u16, body: S) -> Self
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: Into<Bytes>,
        E: Into<BoxError>,
    {
        Self {
            status,
            body: Some(into_byte_stream(body)),
        }
    }

    /// Response whose body is absent (e.g. 204, or already consumed)
    pub fn without_body(status: u16) -> Self {
        Self { status, body: None }
    }
}

impl ResponseLike for StreamResponse {
    fn into_body(self) -> Option<ByteStream> {
        self.body
    }
}

impl fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamResponse")
            .field("status", &self.status)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

#[cfg(feature = "reqwest")]
impl ResponseLike for reqwest::Response {
    fn into_body(self) -> Option<ByteStream> {
        Some(into_byte_stream(self.bytes_stream()))
    }
}

/// Input accepted by [`StreamConsumer::start`](crate::StreamConsumer::start)
pub enum StreamSource {
    /// An already-open byte stream
    Stream(ByteStream),
    /// The body taken from a response; `None` means it had no body
    Response(Option<ByteStream>),
}

impl StreamSource {
    /// Wrap any fallible stream of byte buffers
    pub fn stream<S, B, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: Into<Bytes>,
        E: Into<BoxError>,
    {
        Self::Stream(into_byte_stream(stream))
    }

    pub fn response<R: ResponseLike>(response: R) -> Self {
        Self::Response(response.into_body())
    }

    /// Read from an async reader, one pull per read
    pub fn reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self::stream(ReaderStream::new(reader))
    }

    /// In-memory fragments, delivered one per pull
    pub fn from_chunks<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        I::IntoIter: Send + 'static,
        B: Into<Bytes>,
    {
        Self::Stream(
            stream::iter(
                chunks
                    .into_iter()
                    .map(|chunk| -> Result<Bytes, BoxError> { Ok(chunk.into()) }),
            )
            .boxed(),
        )
    }

    /// Resolve to the stream to pull from
    pub(crate) fn into_stream(self) -> Result<ByteStream, StreamError> {
        match self {
            Self::Stream(stream) | Self::Response(Some(stream)) => Ok(stream),
            Self::Response(None) => Err(StreamError::MissingBody),
        }
    }
}

impl From<ByteStream> for StreamSource {
    fn from(stream: ByteStream) -> Self {
        Self::Stream(stream)
    }
}

impl From<StreamResponse> for StreamSource {
    fn from(response: StreamResponse) -> Self {
        Self::response(response)
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Response> for StreamSource {
    fn from(response: reqwest::Response) -> Self {
        Self::response(response)
    }
}

impl fmt::Debug for StreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(_) => f.write_str("StreamSource::Stream(..)"),
            Self::Response(Some(_)) => f.write_str("StreamSource::Response(Some(..))"),
            Self::Response(None) => f.write_str("StreamSource::Response(None)"),
        }
    }
}

fn into_byte_stream<S, B, E>(stream: S) -> ByteStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: Into<Bytes>,
    E: Into<BoxError>,
{
    stream
        .map(|item| -> Result<Bytes, BoxError> { item.map(Into::into).map_err(Into::into) })
        .boxed()
}
