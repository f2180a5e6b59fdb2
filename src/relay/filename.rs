//! Filename derivation for attachment downloads.
//!
//! Produces a safe, display-ready filename from a validated URL and a
//! content type. The result is embedded into a `Content-Disposition`
//! response header, so the output alphabet is restricted to
//! `[A-Za-z0-9._-]` — no path separators, no control characters, nothing
//! that needs quoting or escaping.

use tracing::debug;

use super::validate::ValidatedUrl;

/// Base name used when the URL path has no usable last segment.
pub const FALLBACK_BASENAME: &str = "video";

/// Derives a safe filename from a URL and the resource's content type.
///
/// Algorithm: take the last path segment of the URL (query and fragment are
/// never part of path segments), percent-decoded; fall back to `"video"`
/// when the segment is empty; replace every character outside
/// `[A-Za-z0-9._-]` with `_`. If the base name already carries a `.`
/// extension it is returned unchanged, otherwise an extension is appended
/// from the content-type lookup (unknown types append nothing).
#[must_use]
pub fn derive_filename(url: &ValidatedUrl, content_type: &str) -> String {
    let base = last_path_segment(url);
    let base = if base.is_empty() {
        FALLBACK_BASENAME.to_string()
    } else {
        sanitize(&base)
    };

    if base.contains('.') {
        return base;
    }

    match extension_for_content_type(content_type) {
        Some(extension) => format!("{base}{extension}"),
        None => base,
    }
}

/// Last path segment of the URL, percent-decoded.
///
/// Decoding failures (invalid UTF-8 in the escape sequence) fall back to
/// the raw segment; sanitization still bounds the output alphabet.
fn last_path_segment(url: &ValidatedUrl) -> String {
    let Some(last) = url.path_segments().and_then(|mut s| s.next_back()) else {
        return String::new();
    };
    urlencoding::decode(last)
        .unwrap_or_else(|e| {
            debug!(segment = %last, error = %e, "percent-decoding failed, using raw segment");
            last.into()
        })
        .into_owned()
}

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

/// Maps a content type to a file extension, or `None` for unknown types.
fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    match mime.as_str() {
        "video/mp4" => Some(".mp4"),
        "video/webm" => Some(".webm"),
        "video/ogg" => Some(".ogv"),
        "video/quicktime" => Some(".mov"),
        "video/x-matroska" => Some(".mkv"),
        "video/x-msvideo" => Some(".avi"),
        "video/x-flv" => Some(".flv"),
        "video/mpeg" => Some(".mpg"),
        "video/mp2t" => Some(".ts"),
        "video/3gpp" => Some(".3gp"),
        "audio/mpeg" => Some(".mp3"),
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "text/html" => Some(".html"),
        "text/plain" => Some(".txt"),
        "application/json" => Some(".json"),
        "application/pdf" => Some(".pdf"),
        "application/zip" => Some(".zip"),
        "application/gzip" => Some(".gz"),
        _ => None,
    }
}
