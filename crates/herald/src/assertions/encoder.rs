//! Back-to-back framing of signed documents.

use std::borrow::Cow;
use std::io::{self, Write};

use thiserror::Error;

/// A document that carries its own canonical signed encoding.
///
/// The encoding already includes the signature block; the response layer
/// never re-signs or inspects it.
pub trait SignedDocument: Send {
    /// Returns the canonical signed encoding.
    fn signed_encoding(&self) -> Cow<'_, [u8]>;
}

/// A signed document held as pre-encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    encoding: Vec<u8>,
}

impl RawDocument {
    /// Wraps an already encoded document.
    #[must_use]
    pub fn new(encoding: impl Into<Vec<u8>>) -> Self {
        Self {
            encoding: encoding.into(),
        }
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoding
    }
}

impl SignedDocument for RawDocument {
    fn signed_encoding(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.encoding)
    }
}

/// Errors raised while writing a document stream.
#[derive(Debug, Error)]
pub enum DocumentEncodeError {
    /// The document produced no bytes.
    #[error("cannot encode an empty document")]
    Empty,
    /// The sink rejected the write.
    #[error("cannot write document: {0}")]
    Io(#[from] io::Error),
}

/// Writes documents one after another, separated by a blank line.
///
/// Every document ends in a line feed; one is appended when the encoding
/// lacks it. Documents after the first are preceded by an extra line feed so
/// a reader can split the stream on the empty line.
#[derive(Debug)]
pub struct DocumentEncoder<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> DocumentEncoder<W> {
    /// Creates an encoder over `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Returns how many documents have been written.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Appends `document` to the stream.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentEncodeError::Empty`] for an empty encoding and
    /// [`DocumentEncodeError::Io`] when the sink fails. A failed write may
    /// leave a partial document behind.
    pub fn encode(&mut self, document: &dyn SignedDocument) -> Result<(), DocumentEncodeError> {
        let encoding = document.signed_encoding();
        if encoding.is_empty() {
            return Err(DocumentEncodeError::Empty);
        }
        if self.written > 0 {
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(&encoding)?;
        if !encoding.ends_with(b"\n") {
            self.writer.write_all(b"\n")?;
        }
        self.written += 1;
        Ok(())
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}
