//! Incremental UTF-8 decoding
//!
//! Turns byte pulls into text while carrying partial multi-byte sequences
//! from one pull to the next.

use std::borrow::Cow;

use crate::error::StreamError;

const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Stateful UTF-8 decoder, one per stream session
///
/// A leading byte-order mark is dropped. Invalid sequences are replaced with
/// U+FFFD unless the decoder is strict, in which case they are an error.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Bytes of an incomplete sequence held back from the previous pull
    pending: Vec<u8>,
    strict: bool,
    /// Whether the start of the stream has been checked for a BOM
    bom_seen: bool,
    /// Bytes fully consumed so far (excludes `pending`)
    offset: usize,
}

impl Utf8Decoder {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    /// Decode one pull worth of bytes
    ///
    /// Returns the text completed by this pull, which may be empty when the
    /// pull only carried part of a character.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<String, StreamError> {
        let input: Cow<'_, [u8]> = if self.pending.is_empty() {
            Cow::Borrowed(bytes)
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(bytes);
            Cow::Owned(joined)
        };

        let mut rest: &[u8] = &input;

        if !self.bom_seen {
            if rest.len() < BOM.len() && BOM.starts_with(rest) {
                // Could still turn out to be a BOM
                self.pending = rest.to_vec();
                return Ok(String::new());
            }
            self.bom_seen = true;
            if rest.starts_with(&BOM) {
                rest = &rest[BOM.len()..];
                self.offset += BOM.len();
            }
        }

        let mut out = String::with_capacity(rest.len());
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    self.offset += rest.len();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&rest[..valid]));
                    match err.error_len() {
                        Some(len) => {
                            if self.strict {
                                return Err(StreamError::InvalidUtf8 {
                                    offset: self.offset + valid,
                                });
                            }
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.offset += valid + len;
                            rest = &rest[valid + len..];
                        }
                        None => {
                            // Truncated sequence, wait for the next pull
                            self.offset += valid;
                            self.pending = rest[valid..].to_vec();
                            break;
                        }
                    }
                }
            }
        }

        Ok(out)
    }

    /// Flush whatever is still buffered once the stream has ended
    ///
    /// A dangling partial sequence becomes a single U+FFFD, or an error when
    /// strict.
    pub fn finish(&mut self) -> Result<String, StreamError> {
        self.bom_seen = true;
        if self.pending.is_empty() {
            return Ok(String::new());
        }
        if self.strict {
            return Err(StreamError::InvalidUtf8 {
                offset: self.offset,
            });
        }
        self.offset += self.pending.len();
        self.pending.clear();
        Ok(char::REPLACEMENT_CHARACTER.to_string())
    }

    /// Whether a partial sequence is waiting for more bytes
    #[cfg(test)]
    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
