use std::path::Path;

/// Content type used when the extension has no known mapping.
pub const FALLBACK_CONTENT_TYPE: &str = "binary/octet-stream";

/// Guess the MIME type of a file from its extension alone.
///
/// Never looks at file contents. Files without an extension, or with one
/// that has no mapping, get [`FALLBACK_CONTENT_TYPE`].
pub fn content_type_for<P: AsRef<Path>>(path: P) -> String {
    mime_guess::from_path(path.as_ref())
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}
