use super::text::{truncate_text, DEFAULT_MAX_TEXT_CHARS};
use super::{mime, FileMetadata, FileParser, ParseError, ParsedFile, RawContent};
use async_trait::async_trait;

/// Shortest printable run worth keeping
const MIN_RUN_LEN: usize = 4;

/// Catch-all for any well-formed MIME type
///
/// Claims everything, so it must be registered after every specific parser.
pub struct BinaryParser {
    max_chars: usize,
}

impl BinaryParser {
    pub fn new() -> Self {
        Self::with_max_chars(DEFAULT_MAX_TEXT_CHARS)
    }

    pub fn with_max_chars(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    /// Extract printable ASCII runs, one per line
    fn extract_printable(bytes: &[u8]) -> String {
        let mut runs = Vec::new();
        let mut current = String::new();

        for &b in bytes {
            if b.is_ascii_graphic() || b == b' ' || b == b'\t' {
                current.push(b as char);
            } else {
                Self::flush_run(&mut runs, &mut current);
            }
        }
        Self::flush_run(&mut runs, &mut current);

        runs.join("\n")
    }

    fn flush_run(runs: &mut Vec<String>, current: &mut String) {
        let trimmed = current.trim();
        if trimmed.len() >= MIN_RUN_LEN {
            runs.push(trimmed.to_string());
        }
        current.clear();
    }
}

impl Default for BinaryParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileParser for BinaryParser {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn can_parse(&self, _content: &RawContent, mime_type: &str) -> bool {
        mime::is_well_formed(mime_type)
    }

    async fn parse(&self, content: RawContent, mime_type: &str) -> Result<ParsedFile, ParseError> {
        let (name, bytes) = content.into_named_bytes().await?;

        let salvaged = Self::extract_printable(&bytes);
        let (text, truncated) = truncate_text(&salvaged, self.max_chars);

        let mut metadata = FileMetadata::new(mime_type, bytes.len());
        metadata.is_utf8 = Some(std::str::from_utf8(&bytes).is_ok());
        metadata.truncated = Some(truncated);
        metadata.set_text_stats(&text);

        tracing::debug!(
            "[BinaryParser] Salvaged {} printable chars from {} bytes",
            text.chars().count(),
            bytes.len()
        );

        if text.is_empty() {
            let label = name.unwrap_or_else(|| "binary".to_string());
            return Ok(ParsedFile::new(format!("[Binary: {}]", label), metadata));
        }

        Ok(ParsedFile::new(text, metadata))
    }
}
