use super::{BinaryParser, FileParser, ImageParser, ParseError, ParsedFile, RawContent, TextParser};
use crate::config::ParserConfig;
use futures::stream::{self, StreamExt};
use std::io;
use std::time::Duration;

/// Ordered dispatch table of parsing strategies
///
/// Strategies are tried in registration order and the first one whose
/// `can_parse` accepts the MIME type wins. A catch-all such as
/// [`BinaryParser`] therefore has to be registered last. No state is kept
/// between calls.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn FileParser>>,
}

impl ParserRegistry {
    /// Create an empty registry; every parse fails until something is registered
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Image then text, with default limits
    pub fn with_defaults() -> Self {
        Self::from_config(&ParserConfig::default())
    }

    /// Image, text, and the binary catch-all when `accept_unknown` is set
    pub fn from_config(config: &ParserConfig) -> Self {
        let mut registry = Self::new();
        registry.register(ImageParser::with_label(config.image_label.clone()));
        registry.register(TextParser::with_max_chars(config.max_text_chars));
        if config.accept_unknown {
            registry.register(BinaryParser::with_max_chars(config.max_text_chars));
        }
        registry
    }

    /// Append a parser; it only sees types no earlier parser claimed
    ///
    /// # Example
    /// ```ignore
    /// registry.register(ImageParser::new());
    /// registry.register(BinaryParser::new()); // catch-all goes last
    /// ```
    pub fn register(&mut self, parser: impl FileParser + 'static) {
        self.parsers.push(Box::new(parser));
    }

    /// First parser that claims `mime_type`, if any
    pub fn select(&self, content: &RawContent, mime_type: &str) -> Option<&dyn FileParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(content, mime_type))
            .map(|p| &**p)
    }

    /// Select a parser and delegate to it
    ///
    /// # Errors
    /// [`ParseError::UnsupportedFormat`] with the exact `mime_type` when no
    /// parser claims it, or whatever the selected parser returns.
    pub async fn parse(&self, content: RawContent, mime_type: &str) -> Result<ParsedFile, ParseError> {
        let Some(parser) = self.select(&content, mime_type) else {
            tracing::warn!("[ParserRegistry] No parser for MIME type {:?}", mime_type);
            return Err(ParseError::UnsupportedFormat(mime_type.to_string()));
        };

        tracing::debug!(
            "[ParserRegistry] {:?} ({}) -> {}",
            content.name().unwrap_or("<unnamed>"),
            mime_type,
            parser.name()
        );

        parser.parse(content, mime_type).await.inspect_err(|e| {
            tracing::warn!("[ParserRegistry] {} parser failed: {}", parser.name(), e);
        })
    }

    /// [`parse`](Self::parse) bounded by a deadline
    ///
    /// On expiry the in-flight read is dropped and a `TimedOut` I/O error is
    /// returned.
    pub async fn parse_with_timeout(
        &self,
        content: RawContent,
        mime_type: &str,
        limit: Duration,
    ) -> Result<ParsedFile, ParseError> {
        match tokio::time::timeout(limit, self.parse(content, mime_type)).await {
            Ok(result) => result,
            Err(_) => Err(ParseError::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("parse did not finish within {:?}", limit),
            ))),
        }
    }

    /// Parse many uploads with at most `concurrency` in flight
    ///
    /// Results come back in input order and fail independently.
    pub async fn parse_batch(
        &self,
        items: Vec<(RawContent, String)>,
        concurrency: usize,
    ) -> Vec<Result<ParsedFile, ParseError>> {
        stream::iter(items)
            .map(|(content, mime_type)| async move { self.parse(content, &mime_type).await })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    /// Number of registered parsers
    pub fn parser_count(&self) -> usize {
        self.parsers.len()
    }

    /// Parser names in evaluation order
    pub fn parser_names(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
