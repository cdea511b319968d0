use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Where the raw bytes of an upload come from
pub enum ContentSource {
    /// Already-buffered bytes
    Bytes(Vec<u8>),
    /// A stream that is drained on parse
    Reader(Box<dyn AsyncRead + Send + Unpin>),
    /// A file on disk, opened lazily on parse
    Path(PathBuf),
}

/// Raw upload handed to a parser: an optional file name plus its bytes
pub struct RawContent {
    name: Option<String>,
    source: ContentSource,
}

impl RawContent {
    /// Unnamed in-memory buffer
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: None,
            source: ContentSource::Bytes(bytes.into()),
        }
    }

    /// Named in-memory buffer (e.g. a multipart upload field)
    pub fn named(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: Some(name.into()),
            source: ContentSource::Bytes(bytes.into()),
        }
    }

    /// Stream source; the whole stream is read when parsed
    pub fn from_reader(
        name: Option<String>,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            name,
            source: ContentSource::Reader(Box::new(reader)),
        }
    }

    /// File on disk, named after its final path component
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            source: ContentSource::Path(path.to_path_buf()),
        }
    }

    /// Override the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    /// Byte length when known without reading
    pub fn known_len(&self) -> Option<usize> {
        match &self.source {
            ContentSource::Bytes(b) => Some(b.len()),
            _ => None,
        }
    }

    /// Read the whole source into memory
    ///
    /// Either every byte is returned or an error is; a failed read never
    /// yields the bytes collected so far.
    pub async fn read_all(self) -> std::io::Result<Vec<u8>> {
        match self.source {
            ContentSource::Bytes(bytes) => Ok(bytes),
            ContentSource::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf).await?;
                Ok(buf)
            }
            ContentSource::Path(path) => tokio::fs::read(&path).await,
        }
    }

    /// Read the source and keep the name alongside the bytes
    pub async fn into_named_bytes(self) -> std::io::Result<(Option<String>, Vec<u8>)> {
        let name = self.name.clone();
        let bytes = self.read_all().await?;
        Ok((name, bytes))
    }
}

impl fmt::Debug for RawContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            ContentSource::Bytes(b) => format!("Bytes({} bytes)", b.len()),
            ContentSource::Reader(_) => "Reader".to_string(),
            ContentSource::Path(p) => format!("Path({})", p.display()),
        };
        f.debug_struct("RawContent")
            .field("name", &self.name)
            .field("source", &source)
            .finish()
    }
}
