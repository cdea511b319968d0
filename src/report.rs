use crate::parser::{ParseError, ParsedFile};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Characters of extracted text kept per entry
pub const PREVIEW_CHARS: usize = 200;

/// Summary of a directory ingestion run
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub generated_at: String,
    pub generator: String,
    pub stats: IngestStats,
    pub files: Vec<FileReport>,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    pub file_count: u32,
    pub parsed_count: u32,
    pub unsupported_count: u32,
    pub failed_count: u32,
    pub image_count: u32,
    pub total_size_bytes: u64,
}

/// What was known about a file before its parse outcome
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: String,
    pub mime_type: String,
    pub size: u64,
    pub sha256: String,
    /// Parser that claimed the type, if any
    pub parser: Option<&'static str>,
}

impl ScannedFile {
    pub fn from_bytes(
        path: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: &[u8],
        parser: Option<&'static str>,
    ) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            sha256: sha256_hex(bytes),
            parser,
        }
    }
}

/// One line of the report
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: String,
    pub mime_type: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    /// Leading characters of the extracted text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestReport {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            generator: format!("study-ingest v{}", env!("CARGO_PKG_VERSION")),
            stats: IngestStats::default(),
            files: Vec::new(),
        }
    }

    /// Record the outcome of parsing one file
    pub fn record(&mut self, file: ScannedFile, outcome: &Result<ParsedFile, ParseError>) {
        self.stats.file_count += 1;
        self.stats.total_size_bytes += file.size;

        let mut entry = FileReport {
            path: file.path,
            mime_type: file.mime_type,
            size: file.size,
            sha256: Some(file.sha256),
            parser: file.parser.map(str::to_string),
            text: None,
            error: None,
        };

        match outcome {
            Ok(parsed) => {
                self.stats.parsed_count += 1;
                if parsed.is_image() {
                    self.stats.image_count += 1;
                }
                entry.text = Some(parsed.text().chars().take(PREVIEW_CHARS).collect());
            }
            Err(e) => {
                self.count_error(e);
                entry.error = Some(e.user_message().to_string());
            }
        }

        self.files.push(entry);
    }

    /// Record a file whose bytes could not be read at all
    pub fn record_unreadable(
        &mut self,
        path: impl Into<String>,
        mime_type: impl Into<String>,
        error: &ParseError,
    ) {
        self.stats.file_count += 1;
        self.count_error(error);
        self.files.push(FileReport {
            path: path.into(),
            mime_type: mime_type.into(),
            size: 0,
            sha256: None,
            parser: None,
            text: None,
            error: Some(error.user_message().to_string()),
        });
    }

    fn count_error(&mut self, error: &ParseError) {
        match error {
            ParseError::UnsupportedFormat(_) => self.stats.unsupported_count += 1,
            ParseError::Io(_) => self.stats.failed_count += 1,
        }
    }
}

impl Default for IngestReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Hex-encoded SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
