use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read content: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Message safe to show to the uploader
    pub fn user_message(&self) -> &'static str {
        match self {
            ParseError::UnsupportedFormat(_) => "format not supported",
            ParseError::Io(_) => "could not read file",
        }
    }

    /// Whether retrying the same source could succeed
    ///
    /// Unsupported formats never are. Read failures are only when the
    /// underlying error kind is transient; the registry itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            ParseError::UnsupportedFormat(_) => false,
            ParseError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::Interrupted
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::WouldBlock
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
            ),
        }
    }

    /// The rejected MIME type, if this is an unsupported-format error
    pub fn rejected_mime(&self) -> Option<&str> {
        match self {
            ParseError::UnsupportedFormat(mime) => Some(mime),
            ParseError::Io(_) => None,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Metadata key {0:?} is reserved")]
    ReservedKey(String),
}
