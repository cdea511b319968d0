use super::MetadataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Serialized names of the typed metadata fields; `extra` may not use them
pub const RESERVED_METADATA_KEYS: &[&str] = &[
    "mimeType",
    "size",
    "base64",
    "isImage",
    "isUtf8",
    "lineCount",
    "wordCount",
    "truncated",
];

/// Normalized output of any parser
///
/// `text` is never empty: it holds either extracted content or a bracketed
/// placeholder such as `[Image: photo.jpg]`. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParsedFileRepr")]
pub struct ParsedFile {
    text: String,
    metadata: FileMetadata,
}

/// Wire shape; deserialization goes back through `ParsedFile::new`
#[derive(Deserialize)]
struct ParsedFileRepr {
    text: String,
    metadata: FileMetadata,
}

impl From<ParsedFileRepr> for ParsedFile {
    fn from(repr: ParsedFileRepr) -> Self {
        ParsedFile::new(repr.text, repr.metadata)
    }
}

/// Metadata recorded during parsing
///
/// Serializes as a flat camelCase mapping; `mimeType` and `size` are always
/// present, everything else only when a parser sets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Declared MIME type, verbatim
    pub mime_type: String,
    /// Exact byte length of the input
    pub size: u64,
    /// Data URL (`data:<mime>;base64,<payload>`) for image content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_image: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_utf8: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// Set when extracted text was cut at the configured limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    /// Parser-specific keys not covered above; never a reserved name
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl ParsedFile {
    /// Build a result; blank text is replaced by an `[Empty file: ...]` placeholder
    pub fn new(text: impl Into<String>, metadata: FileMetadata) -> Self {
        let text = text.into();
        let text = if text.trim().is_empty() {
            format!("[Empty file: {}]", metadata.mime_type)
        } else {
            text
        };
        Self { text, metadata }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn into_parts(self) -> (String, FileMetadata) {
        (self.text, self.metadata)
    }

    pub fn is_image(&self) -> bool {
        self.metadata.is_image.unwrap_or(false)
    }
}

impl FileMetadata {
    /// Metadata with only the mandatory keys set
    pub fn new(mime_type: impl Into<String>, size: usize) -> Self {
        Self {
            mime_type: mime_type.into(),
            size: size as u64,
            base64: None,
            is_image: None,
            is_utf8: None,
            line_count: None,
            word_count: None,
            truncated: None,
            extra: BTreeMap::new(),
        }
    }

    /// Attach a parser-specific key
    ///
    /// # Errors
    /// [`MetadataError::ReservedKey`] when `key` names a typed field such as
    /// `size` or `mimeType`.
    pub fn with_extra(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, MetadataError> {
        self.insert_extra(key, value)?;
        Ok(self)
    }

    /// In-place form of [`with_extra`](Self::with_extra)
    pub fn insert_extra(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), MetadataError> {
        let key = key.into();
        if RESERVED_METADATA_KEYS.contains(&key.as_str()) {
            return Err(MetadataError::ReservedKey(key));
        }
        self.extra.insert(key, value.into());
        Ok(())
    }

    /// Parser-specific keys
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Record line and word counts for extracted text
    pub fn set_text_stats(&mut self, text: &str) {
        self.line_count = Some(text.lines().count());
        self.word_count = Some(text.split_whitespace().count());
    }

    /// Look up any key by its serialized (camelCase) name
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "mimeType" => Some(Value::from(self.mime_type.clone())),
            "size" => Some(Value::from(self.size)),
            "base64" => self.base64.clone().map(Value::from),
            "isImage" => self.is_image.map(Value::from),
            "isUtf8" => self.is_utf8.map(Value::from),
            "lineCount" => self.line_count.map(Value::from),
            "wordCount" => self.word_count.map(Value::from),
            "truncated" => self.truncated.map(Value::from),
            other => self.extra.get(other).cloned(),
        }
    }
}
