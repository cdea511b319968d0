use super::{FileMetadata, FileParser, ParseError, ParsedFile, RawContent};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Label used when the upload has no file name
pub const DEFAULT_IMAGE_LABEL: &str = "image";

/// Encodes images as data URLs for multimodal models
pub struct ImageParser {
    label: String,
}

impl ImageParser {
    pub fn new() -> Self {
        Self::with_label(DEFAULT_IMAGE_LABEL)
    }

    /// Use a different placeholder name for unnamed uploads
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
    }
}

impl Default for ImageParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileParser for ImageParser {
    fn name(&self) -> &'static str {
        "image"
    }

    fn can_parse(&self, _content: &RawContent, mime_type: &str) -> bool {
        mime_type.starts_with("image/")
    }

    async fn parse(&self, content: RawContent, mime_type: &str) -> Result<ParsedFile, ParseError> {
        let (name, bytes) = content.into_named_bytes().await?;
        let name = name.unwrap_or_else(|| self.label.clone());

        let mut metadata = FileMetadata::new(mime_type, bytes.len());
        metadata.base64 = Some(Self::to_data_url(mime_type, &bytes));
        metadata.is_image = Some(true);

        tracing::debug!(
            "[ImageParser] Encoded {} ({} bytes, {})",
            name,
            bytes.len(),
            mime_type
        );

        Ok(ParsedFile::new(format!("[Image: {}]", name), metadata))
    }
}
