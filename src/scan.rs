use crate::parser::{mime, ParseError, ParsedFile, ParserRegistry, RawContent};
use crate::report::{sha256_hex, IngestReport, ScannedFile};
use futures::stream::{self, StreamExt};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of visiting one directory entry, in walk order
enum Visited {
    Parsed(ScannedFile, Result<ParsedFile, ParseError>),
    Unreadable {
        path: String,
        mime_type: String,
        error: ParseError,
    },
}

/// Parse every file under `dir` and summarize the outcomes
///
/// Entries are visited in file-name order and symlinks are followed. Up to
/// `concurrency` files are read and parsed at once; each file's bytes are
/// held only while its own parse runs. Walk failures (unreadable
/// directories, broken links, a missing root) are recorded as failed
/// entries rather than skipped.
pub async fn scan_dir(registry: &ParserRegistry, dir: &Path, concurrency: usize) -> IngestReport {
    let entries: Vec<Result<PathBuf, walkdir::Error>> = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter(|entry| match entry {
            Ok(e) => e.file_type().is_file(),
            Err(_) => true,
        })
        .map(|entry| entry.map(walkdir::DirEntry::into_path))
        .collect();

    tracing::info!(
        "Scanning {} entries under {} with parsers {:?}",
        entries.len(),
        dir.display(),
        registry.parser_names()
    );

    let visited: Vec<Visited> = stream::iter(entries)
        .map(|entry| visit(registry, dir, entry))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut report = IngestReport::new();
    for outcome in visited {
        match outcome {
            Visited::Parsed(file, result) => report.record(file, &result),
            Visited::Unreadable {
                path,
                mime_type,
                error,
            } => {
                tracing::warn!("[scan] Could not read {}: {}", path, error);
                report.record_unreadable(path, mime_type, &error);
            }
        }
    }

    tracing::info!(
        "Parsed {}/{} files ({} unsupported, {} failed)",
        report.stats.parsed_count,
        report.stats.file_count,
        report.stats.unsupported_count,
        report.stats.failed_count
    );

    report
}

async fn visit(
    registry: &ParserRegistry,
    dir: &Path,
    entry: Result<PathBuf, walkdir::Error>,
) -> Visited {
    let path = match entry {
        Ok(path) => path,
        Err(e) => {
            let failed = e.path().unwrap_or(dir).to_path_buf();
            return Visited::Unreadable {
                path: relative(dir, &failed),
                mime_type: mime::guess_from_path(&failed),
                error: ParseError::Io(io::Error::from(e)),
            };
        }
    };

    let rel = relative(dir, &path);
    let mime_type = mime::guess_from_path(&path);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Visited::Unreadable {
                path: rel,
                mime_type,
                error: ParseError::Io(e),
            }
        }
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| rel.clone());
    let scanned = ScannedFile {
        sha256: sha256_hex(&bytes),
        size: bytes.len() as u64,
        path: rel,
        mime_type,
        parser: None,
    };

    let content = RawContent::named(name, bytes);
    let parser = registry.select(&content, &scanned.mime_type).map(|p| p.name());
    let result = registry.parse(content, &scanned.mime_type).await;

    Visited::Parsed(ScannedFile { parser, ..scanned }, result)
}

/// Path shown in the report; the root itself keeps its full form
fn relative(dir: &Path, path: &Path) -> String {
    match path.strip_prefix(dir) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
        _ => path.display().to_string(),
    }
}
