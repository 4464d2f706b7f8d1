//! Utility functions for content hashing and text normalization.

use sha2::{Digest, Sha256};

/// Collapse runs of whitespace and trim both ends.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compute a SHA-256 content hash for exact-duplicate detection.
///
/// Concatenates the layer name and the normalized, lowercased text, then
/// returns the hex-encoded digest.
#[must_use]
pub fn content_hash(layer: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(layer.as_bytes());
    hasher.update(b":");
    hasher.update(normalize_text(text).to_lowercase().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Shorten text for log lines, respecting char boundaries.
#[must_use]
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
