use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters that are not allowed in a stored file name
    /// - Kept: ASCII letters, digits, underscore, hyphen and dot
    /// - Everything else (path separators, quotes, control chars) is dropped
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.\-]").unwrap();
}

/// Turn an uploaded file name into something safe to place in the shared folder.
///
/// Whitespace becomes `_`, any other disallowed character is removed and leading
/// dots are stripped so the result can never be `.`, `..` or a hidden file.
/// Returns `None` when nothing usable is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    // Browsers on Windows may send the full client path
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);
    let spaced: String = base
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(&spaced, "");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
