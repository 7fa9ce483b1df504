//! Existence markers in backend error output
//!
//! Neither the CLI nor the shell report "already exists" as a structured
//! code, so idempotency falls back to a case-insensitive substring scan.
//! This is fragile: a change in the backend's wording turns a reuse into a
//! failure.

const EXISTENCE_MARKERS: [&str; 2] = ["already exists", "duplicate"];

/// True if `text` says the resource already exists
pub fn has_existence_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    EXISTENCE_MARKERS.iter().any(|marker| lower.contains(marker))
}
