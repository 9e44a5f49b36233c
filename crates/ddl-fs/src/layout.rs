//! DDL file-tree layout
//!
//! Every extracted object is materialized at a deterministic relative path:
//!
//! ```text
//! <database>/<schema>/<object_type_plural>/<object_name>.sql
//! ```
//!
//! All four segments are sanitized (lowercased, runs of characters outside
//! `[A-Za-z0-9_]` replaced with a single underscore) so the tree is portable
//! across filesystems. Sanitization can collapse distinct names onto one
//! path; callers that build a full tree are responsible for treating such a
//! collision as a fatal error rather than overwriting.

use std::fs;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::path::NormalizedPath;

/// File extension for all materialized DDL files
pub const DDL_EXTENSION: &str = "sql";

static NON_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("static regex"));

/// Sanitize one path segment of the DDL tree.
///
/// Lowercases and replaces every run of non `[A-Za-z0-9_]` characters with a
/// single underscore, mirroring how object names are normalized for the
/// filesystem.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if nothing identifier-like survives
/// sanitization (empty input, or punctuation only).
pub fn sanitize_segment(name: &str) -> Result<String> {
    let sanitized = NON_IDENTIFIER.replace_all(name, "_").to_lowercase();
    if sanitized.chars().all(|c| c == '_') {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "no identifier characters left after sanitization".to_string(),
        });
    }
    Ok(sanitized)
}

/// Derive the relative path for a DDL object.
///
/// `type_dir` is the plural object-type directory segment (`tables`,
/// `views`, `stored_procedures`, ...), already filesystem-safe by
/// construction; the other three segments are sanitized here.
pub fn ddl_rel_path(
    database: &str,
    schema: &str,
    type_dir: &str,
    object_name: &str,
) -> Result<NormalizedPath> {
    let db = sanitize_segment(database)?;
    let sch = sanitize_segment(schema)?;
    let name = sanitize_segment(object_name)?;
    Ok(NormalizedPath::new(format!(
        "{db}/{sch}/{type_dir}/{name}.{DDL_EXTENSION}"
    )))
}

/// One `.sql` file found in a DDL tree, decomposed into its layout segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the tree root, forward slashes
    pub rel_path: NormalizedPath,
    pub database: String,
    pub schema: String,
    /// Plural object-type directory segment
    pub type_dir: String,
    /// Object name as stored on disk (already sanitized)
    pub object_name: String,
}

impl TreeEntry {
    /// Decompose a relative path into layout segments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTreePath`] if the path does not have the
    /// `database/schema/type/name.sql` shape.
    pub fn parse(rel_path: &NormalizedPath) -> Result<Self> {
        let malformed = || Error::MalformedTreePath {
            path: rel_path.as_str().to_string(),
        };

        let segments: Vec<&str> = rel_path.as_str().split('/').collect();
        let &[database, schema, type_dir, file_name] = segments.as_slice() else {
            return Err(malformed());
        };
        let object_name = file_name
            .strip_suffix(&format!(".{DDL_EXTENSION}"))
            .ok_or_else(malformed)?;
        if object_name.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            rel_path: rel_path.clone(),
            database: database.to_string(),
            schema: schema.to_string(),
            type_dir: type_dir.to_string(),
            object_name: object_name.to_string(),
        })
    }
}

/// Scan a DDL tree root for materialized `.sql` files.
///
/// Only files at exactly the `database/schema/type/name.sql` depth are
/// returned; anything else under the root (the lock file, `.git`, stray
/// notes) is ignored. A missing root is an empty tree, not an error.
///
/// Results are sorted for deterministic planning.
pub fn scan_tree(root: &NormalizedPath) -> Result<Vec<TreeEntry>> {
    let native_root = root.to_native();
    if !native_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    let mut stack = vec![(native_root.clone(), 0usize)];

    while let Some((dir, depth)) = stack.pop() {
        let read = fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;
        for item in read {
            let item = item.map_err(|e| Error::io(&dir, e))?;
            let path = item.path();
            let file_type = item.file_type().map_err(|e| Error::io(&path, e))?;

            if file_type.is_dir() {
                let hidden = path
                    .file_name()
                    .map(|n| n.to_string_lossy().starts_with('.'))
                    .unwrap_or(false);
                if depth < 3 && !hidden {
                    stack.push((path, depth + 1));
                }
            } else if depth == 3
                && path.extension().map(|e| e == DDL_EXTENSION).unwrap_or(false)
            {
                let rel = path
                    .strip_prefix(&native_root)
                    .map_err(|_| Error::MalformedTreePath {
                        path: path.to_string_lossy().to_string(),
                    })?;
                let rel_path = NormalizedPath::new(rel);
                entries.push(TreeEntry::parse(&rel_path)?);
            }
        }
    }

    entries.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(entries)
}
