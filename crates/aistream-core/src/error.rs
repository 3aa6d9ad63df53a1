//! Stream errors
//!
//! Everything a session can end with when it does not end successfully.

use std::sync::Arc;

/// Error type yielded by byte sources
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal failure of a stream session
///
/// Cloneable so the value stored as the session's last error and the one
/// handed to the error callback are the same error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StreamError {
    /// A response wrapper was given but carried no body to read
    #[error("response body is missing")]
    MissingBody,

    /// The byte source failed while being pulled
    #[error("stream source failed: {0}")]
    Source(#[source] Arc<dyn std::error::Error + Send + Sync + 'static>),

    /// Strict decoding hit bytes that are not UTF-8
    ///
    /// `offset` counts bytes from the start of the session.
    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: usize },
}

impl StreamError {
    /// Normalize any source failure into a [`StreamError::Source`]
    ///
    /// Plain strings are accepted too and become an error carrying that text.
    pub fn source_error<E: Into<BoxError>>(err: E) -> Self {
        Self::Source(Arc::from(err.into()))
    }

    pub fn is_missing_body(&self) -> bool {
        matches!(self, Self::MissingBody)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_string_failure_becomes_error() {
        let err = StreamError::source_error("connection reset");
        assert_eq!(err.to_string(), "stream source failed: connection reset");
        assert!(err.source().is_some());
        assert!(!err.is_missing_body());
    }

    #[test]
    fn test_io_failure_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = StreamError::source_error(io);
        let source = err.source().expect("source kept");
        assert_eq!(source.to_string(), "pipe closed");
    }

    #[test]
    fn test_clone_shares_source() {
        let err = StreamError::source_error("boom");
        let cloned = err.clone();
        match (&err, &cloned) {
            (StreamError::Source(a), StreamError::Source(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected source errors"),
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            StreamError::MissingBody.to_string(),
            "response body is missing"
        );
        assert_eq!(
            StreamError::InvalidUtf8 { offset: 7 }.to_string(),
            "invalid UTF-8 sequence at byte 7"
        );
        assert!(StreamError::MissingBody.is_missing_body());
    }
}
