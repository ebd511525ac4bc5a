//! Error types for the decant crate.

use std::fmt;
use std::io;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Which code table a symbol was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// Literal/length alphabet (symbols 257-285 carry a match length).
    Length,
    /// Distance alphabet (codes 0-29).
    Distance,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::Length => f.write_str("length"),
            CodeKind::Distance => f.write_str("distance"),
        }
    }
}

/// Errors that can occur during extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structurally corrupted input: bad magic, reserved block type,
    /// a Huffman prefix that never resolves, or a truncated stream.
    #[error("corrupted input at byte {offset}: {reason}")]
    InputCorrupted { offset: u64, reason: String },

    /// Length or distance code outside its defined range.
    #[error("invalid {kind} code {code}")]
    InvalidCode { kind: CodeKind, code: u16 },

    /// Compression method byte other than DEFLATE (8).
    #[error("unsupported compression method {method:#04x}")]
    UnsupportedMethod { method: u8 },

    /// The method was asked to extract a format it does not handle.
    #[error("format not handled by this extraction method")]
    UnsupportedFormat,

    /// An external command strategy failed to run or exited non-zero.
    #[error("external command failed: {0}")]
    Command(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a corruption error anchored at a byte offset.
    pub fn corrupted(offset: u64, reason: impl Into<String>) -> Self {
        Self::InputCorrupted {
            offset,
            reason: reason.into(),
        }
    }

    /// Create an out-of-range code error.
    pub fn invalid_code(kind: CodeKind, code: u16) -> Self {
        Self::InvalidCode { kind, code }
    }

    /// Create an external-command error.
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command(message.into())
    }
}
