use std::fmt;

use thiserror::Error;

use crate::codec::Format;

/// Top-level error for a single conversion. Every failure is terminal and
/// deterministic for the same inputs; nothing is retried internally.
///
/// `Display` renders `"<stage>: <detail>"`, which is the flattened message the
/// foreign-call boundary hands back. In-process callers match on the variants.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported format: {name}")]
    UnsupportedFormat { name: String },
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
    #[error("path: {0}")]
    Path(#[from] PathError),
    #[error("encode: {0}")]
    Encode(#[from] EncodeError),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed input for the declared format.
#[derive(Debug)]
pub struct DecodeError {
    pub format: Format,
    pub line: Option<usize>,
    pub message: String,
}

impl DecodeError {
    pub(crate) fn new(format: Format, message: impl fmt::Display) -> Self {
        Self {
            format,
            line: None,
            message: message.to_string(),
        }
    }

    pub(crate) fn with_line(format: Format, line: usize, message: impl fmt::Display) -> Self {
        Self {
            format,
            line: (line > 0).then_some(line),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "{} parsing error at line {}: {}",
                self.format, line, self.message
            ),
            None => write!(f, "{} parsing error: {}", self.format, self.message),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Value shape the target format cannot represent.
#[derive(Debug, Error)]
#[error("{format} encoding error: {message}")]
pub struct EncodeError {
    pub format: Format,
    pub message: String,
}

impl EncodeError {
    pub(crate) fn new(format: Format, message: impl fmt::Display) -> Self {
        Self {
            format,
            message: message.to_string(),
        }
    }
}

/// Structural navigation failure. `position` is the zero-based index of the
/// offending segment within the path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("no value at segment `{segment}` (position {position})")]
    NotFound { segment: String, position: usize },
    #[error("segment `{segment}` (position {position}) cannot address a {found}")]
    TypeMismatch {
        segment: String,
        position: usize,
        found: &'static str,
    },
}
