// Public API exports
pub mod config;
pub mod parser;
pub mod report;
pub mod scan;

// Re-export main types for convenience
pub use config::{ConfigError, ParserConfig};

pub use parser::{
    BinaryParser, ContentSource, FileMetadata, FileParser, ImageParser, MetadataError, ParseError,
    ParsedFile, ParserRegistry, RawContent, TextParser,
};

pub use report::{FileReport, IngestReport, IngestStats, ScannedFile};
pub use scan::scan_dir;
