//! SHA-256 content fingerprints
//!
//! Provides the single canonical fingerprint format (`sha256:<hex>`) used to
//! detect DDL content changes between the warehouse and the on-disk tree.
//! Both inventory sides hash the *normalized* text, so a fingerprint match
//! means the files would be byte-identical after normalization.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Prefix for all fingerprints produced by this module
const PREFIX: &str = "sha256:";

/// Normalize DDL text before hashing or writing.
///
/// Converts CRLF to LF, strips trailing whitespace from each line, and
/// guarantees exactly one trailing newline. Applied in exactly one place so
/// the warehouse-side and disk-side fingerprints agree.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.replace("\r\n", "\n").split('\n') {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    // split('\n') yields a trailing empty segment when the input ends with a
    // newline; drop the duplicate it produced.
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// Compute the fingerprint of already-normalized content.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn fingerprint_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Normalize then fingerprint DDL text.
pub fn fingerprint_ddl(text: &str) -> String {
    fingerprint_content(&normalize_text(text))
}

/// Compute the fingerprint of a file's contents, normalizing first.
///
/// # Errors
///
/// Returns an error if the file cannot be read as UTF-8 text.
pub fn fingerprint_file(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read_to_string(path)?;
    Ok(fingerprint_ddl(&content))
}
