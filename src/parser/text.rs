use super::{mime, FileMetadata, FileParser, ParseError, ParsedFile, RawContent};
use async_trait::async_trait;

/// Default cap on extracted characters (~500 KB of ASCII text)
pub const DEFAULT_MAX_TEXT_CHARS: usize = 500_000;

/// `application/*` subtypes that are really text
const TEXT_APPLICATION_SUBTYPES: &[&str] = &[
    "json",
    "xml",
    "javascript",
    "x-yaml",
    "yaml",
    "toml",
    "x-sh",
    "sql",
    "csv",
];

/// Decodes text-like uploads (plain text, markdown, JSON, CSV, source code)
pub struct TextParser {
    max_chars: usize,
}

impl TextParser {
    pub fn new() -> Self {
        Self::with_max_chars(DEFAULT_MAX_TEXT_CHARS)
    }

    pub fn with_max_chars(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    fn is_text_mime(mime_type: &str) -> bool {
        let Some((ty, subtype)) = mime::essence(mime_type) else {
            return false;
        };

        match ty.as_str() {
            "text" => true,
            "application" => {
                TEXT_APPLICATION_SUBTYPES.contains(&subtype.as_str())
                    || subtype.ends_with("+json")
                    || subtype.ends_with("+xml")
            }
            _ => false,
        }
    }
}

impl Default for TextParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileParser for TextParser {
    fn name(&self) -> &'static str {
        "text"
    }

    fn can_parse(&self, _content: &RawContent, mime_type: &str) -> bool {
        Self::is_text_mime(mime_type)
    }

    async fn parse(&self, content: RawContent, mime_type: &str) -> Result<ParsedFile, ParseError> {
        let (name, bytes) = content.into_named_bytes().await?;

        let is_utf8 = std::str::from_utf8(&bytes).is_ok();
        let lossy = String::from_utf8_lossy(&bytes);
        let decoded: &str = lossy.strip_prefix('\u{feff}').unwrap_or(&lossy);

        let (text, truncated) = truncate_text(decoded, self.max_chars);

        let mut metadata = FileMetadata::new(mime_type, bytes.len());
        metadata.is_utf8 = Some(is_utf8);
        metadata.truncated = Some(truncated);
        metadata.set_text_stats(&text);

        tracing::debug!(
            "[TextParser] Decoded {}: {} chars, {} lines{}",
            name.as_deref().unwrap_or("<unnamed>"),
            text.chars().count(),
            metadata.line_count.unwrap_or(0),
            if truncated { " (truncated)" } else { "" }
        );

        if text.trim().is_empty() {
            let label = name.unwrap_or_else(|| mime_type.to_string());
            return Ok(ParsedFile::new(format!("[Empty file: {}]", label), metadata));
        }

        Ok(ParsedFile::new(text, metadata))
    }
}

/// Cut `text` to at most `max_chars` characters
///
/// Prefers a paragraph, sentence or word break in the back half of the
/// window. Returns the text and whether anything was dropped.
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> (String, bool) {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return (text.to_string(), false);
    };

    let window = &text[..cut];
    let min_break = window.len() / 2;

    if let Some(pos) = window.rfind("\n\n").filter(|&p| p >= min_break) {
        return (window[..pos].to_string(), true);
    }

    if let Some(pos) = window.rfind(". ").filter(|&p| p >= min_break) {
        return (window[..=pos].to_string(), true);
    }

    if let Some(pos) = window.rfind(' ').filter(|&p| p >= min_break) {
        return (window[..pos].to_string(), true);
    }

    (window.to_string(), true)
}
