//! Result extraction — normalize raw engine output into a usable result.

/// Treat absent or blank output as "no result"; pass anything else through
/// unchanged (interior whitespace untouched).
pub fn extract(raw: Option<String>) -> Option<String> {
    raw.filter(|text| !text.trim().is_empty())
}
