//! Stored-procedure DDL reconstruction
//!
//! The platform returns a procedure body as a single-quoted string literal
//! with escaped control characters, which is neither readable nor
//! re-executable as multi-statement DDL. Reconstruction recovers the
//! signature from structured catalog fields, de-stringifies the body exactly
//! once, and reassembles a `CREATE OR REPLACE PROCEDURE` statement using the
//! `$$` delimited form so the body never needs escaping again.

use crate::record::{RawObjectRecord, ReconstructedDdl, fields};

/// Delimiter used for the reassembled body
const BODY_DELIMITER: &str = "$$";

/// One procedure parameter recovered from the catalog signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub data_type: String,
}

/// Parse a catalog argument signature like `(ID VARCHAR, PRICE NUMBER(10,2))`
/// into an ordered parameter list.
///
/// Splits on commas at parenthesis depth zero only, so parameterized types
/// survive. Returns `None` when the field is not a parenthesized list at
/// all; an empty list `()` parses to `Some(vec![])`.
pub fn parse_signature(signature: &str) -> Option<Vec<Param>> {
    let trimmed = signature.trim();
    let inner = trimmed.strip_prefix('(')?.strip_suffix(')')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in inner.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                params.push(parse_param(&current)?);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    params.push(parse_param(&current)?);

    Some(params)
}

fn parse_param(raw: &str) -> Option<Param> {
    let trimmed = raw.trim();
    let (name, data_type) = trimmed.split_once(char::is_whitespace)?;
    Some(Param {
        name: name.to_string(),
        data_type: data_type.trim().to_string(),
    })
}

/// Render a parameter list back into `NAME TYPE, NAME TYPE` form.
pub fn render_params(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", p.name, p.data_type))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Recover the literal procedure body from its catalog representation.
///
/// The catalog view normally returns the body unescaped, so the common case
/// is a pass-through. When the source field was itself escaped the body
/// arrives as a single line carrying literal `\n` markers; only then is it
/// unescaped, and only once. A body that already contains real line breaks
/// is never touched, so a genuine two-character `\n` sequence inside a
/// multi-line body survives. Converting twice or zero times are both bugs
/// guarded by round-trip tests.
pub fn destringify_body(body: &str) -> String {
    if body.contains('\n') || !body.contains('\\') {
        return body.to_string();
    }
    unescape_once(body)
}

fn unescape_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            // Unknown escape: keep it verbatim rather than guessing
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Reassemble a stored procedure into canonical `CREATE OR REPLACE` DDL.
///
/// Language-specific header lines (`RUNTIME_VERSION`, `PACKAGES`,
/// `HANDLER`) are emitted only for non-SQL languages. The `$$` delimited
/// body form is used unconditionally. Missing structured fields degrade to
/// best-effort output with `complete = false`; the record is surfaced, not
/// discarded.
pub fn reconstruct_procedure(record: &RawObjectRecord) -> ReconstructedDdl {
    let identity = record.identity.clone();

    let params = record
        .field(fields::ARGUMENT_SIGNATURE)
        .and_then(parse_signature);
    let returns = record.field(fields::RETURNS);
    let language = record.field(fields::LANGUAGE);
    let body = record.field(fields::BODY).map(destringify_body);

    let mut complete =
        params.is_some() && returns.is_some() && language.is_some() && body.is_some();

    // A body containing the delimiter cannot be emitted as re-executable
    // DDL in the unconditional $$ form; keep the output but flag it.
    if body.as_deref().is_some_and(|b| b.contains(BODY_DELIMITER)) {
        complete = false;
    }

    let mut text = String::new();
    text.push_str(&format!(
        "CREATE OR REPLACE PROCEDURE {}.{}({})\n",
        identity.schema,
        identity.name,
        params.as_deref().map(render_params).unwrap_or_default()
    ));

    if let Some(returns) = returns {
        text.push_str(&format!("RETURNS {returns}\n"));
    }

    if let Some(language) = language {
        text.push_str(&format!("LANGUAGE {}\n", language.to_uppercase()));

        if !language.eq_ignore_ascii_case("sql") {
            if let Some(runtime) = record.field(fields::RUNTIME_VERSION) {
                text.push_str(&format!("RUNTIME_VERSION = '{runtime}'\n"));
            }
            if let Some(packages) = record.field(fields::PACKAGES) {
                text.push_str(&format!("PACKAGES = ({packages})\n"));
            }
            if let Some(handler) = record.field(fields::HANDLER) {
                text.push_str(&format!("HANDLER = '{handler}'\n"));
            }
        }
    }

    text.push_str("AS\n");
    text.push_str(BODY_DELIMITER);
    text.push('\n');
    if let Some(body) = &body {
        text.push_str(body);
        if !body.ends_with('\n') {
            text.push('\n');
        }
    }
    text.push_str(BODY_DELIMITER);
    text.push_str(";\n");

    ReconstructedDdl::new(identity, &text, complete)
}
