//! Path segment parsing and normalization utilities

use unicode_normalization::UnicodeNormalization;

/// Separator between segments in a structure path and in cache keys.
pub const SEPARATOR: char = '/';

/// Normalize a single segment for comparison
///
/// Trims surrounding whitespace and normalizes Unicode to NFC so that a name
/// typed with combining characters matches the stored composed form.
pub fn normalize_segment(segment: &str) -> String {
    segment.trim().nfc().collect()
}

/// Split a `/`-joined structure path into normalized segments
///
/// Empty segments (leading, trailing, or doubled separators) are dropped, so
/// `""`, `"/"` and `"//"` all address the root.
pub fn parse_path(path: &str) -> Vec<String> {
    path.split(SEPARATOR)
        .map(normalize_segment)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Join segments into the canonical path key. The root is the empty string.
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| normalize_segment(s.as_ref()))
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

/// Every prefix key of a path, from the path itself up to the root (`""`).
pub fn ancestor_keys<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    (0..=segments.len())
        .rev()
        .map(|len| join_segments(&segments[..len]))
        .collect()
}

/// Check that a name can be used as a path segment
pub fn validate_name(name: &str) -> Result<(), String> {
    let normalized = normalize_segment(name);
    if normalized.is_empty() {
        return Err("name cannot be empty".to_string());
    }
    if normalized.contains(SEPARATOR) {
        return Err(format!("name '{}' cannot contain '{}'", name, SEPARATOR));
    }
    if normalized.chars().any(char::is_whitespace) {
        return Err(format!("name '{}' cannot contain whitespace", name));
    }
    Ok(())
}
