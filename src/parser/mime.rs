use std::path::Path;

/// Fallback when nothing better is known
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Split a MIME string into lowercased `(type, subtype)`
///
/// Parameters after `;` are dropped. Returns `None` for anything that is not
/// a well-formed `type/subtype` pair; never panics.
pub fn essence(mime_type: &str) -> Option<(String, String)> {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    let (ty, subtype) = essence.split_once('/')?;

    if !is_token(ty) || !is_token(subtype) {
        return None;
    }

    Some((ty.to_ascii_lowercase(), subtype.to_ascii_lowercase()))
}

/// Whether the string is a well-formed `type/subtype`
pub fn is_well_formed(mime_type: &str) -> bool {
    essence(mime_type).is_some()
}

/// RFC 2045 token: non-empty, visible ASCII, no tspecials
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')'
                        | b'<'
                        | b'>'
                        | b'@'
                        | b','
                        | b';'
                        | b':'
                        | b'\\'
                        | b'"'
                        | b'/'
                        | b'['
                        | b']'
                        | b'?'
                        | b'='
                )
        })
}

/// Guess a MIME type from a file extension
pub fn guess_from_path(path: impl AsRef<Path>) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}
