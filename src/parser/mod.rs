mod binary;
mod content;
mod error;
mod image;
pub mod mime;
mod registry;
mod result;
mod text;


pub use binary::BinaryParser;
pub use content::{ContentSource, RawContent};
pub use error::{MetadataError, ParseError};
pub use image::{ImageParser, DEFAULT_IMAGE_LABEL};
pub use registry::ParserRegistry;
pub use result::{FileMetadata, ParsedFile, RESERVED_METADATA_KEYS};
pub use text::{TextParser, DEFAULT_MAX_TEXT_CHARS};

use async_trait::async_trait;

/// Core trait that all parsing strategies implement
#[async_trait]
pub trait FileParser: Send + Sync {
    /// Short label used in logs and reports
    fn name(&self) -> &'static str;

    /// Whether this strategy is authoritative for `mime_type`
    ///
    /// Must be pure and total: any string, including empty or malformed
    /// ones, yields a boolean.
    fn can_parse(&self, content: &RawContent, mime_type: &str) -> bool;

    /// Read `content` to the end and normalize it
    ///
    /// # Arguments
    /// * `content` - Raw upload; consumed by the read
    /// * `mime_type` - Declared type, already accepted by `can_parse`
    ///
    /// # Errors
    /// Only [`ParseError::Io`] when the source cannot be fully read.
    async fn parse(&self, content: RawContent, mime_type: &str) -> Result<ParsedFile, ParseError>;
}
