//! Rewriting of named placeholders into the positional markers PostgreSQL
//! understands.
//!
//! Annotated SQL sources use `:name` placeholders; the server only accepts
//! `$1`, `$2`, …. Rewriting happens client-side, before the probe, and the
//! order in which names appear is recorded so parameter types can be mapped
//! back to names after introspection.

use std::fmt::Write;
use std::ops::Range;

/// A single named placeholder found in a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// The byte range in the source query, including the leading `:`.
    pub token: Range<usize>,

    /// The placeholder name; may be empty for a bare `:`.
    pub name: &'a str,
}

/// A query rewritten to positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesugaredQuery {
    /// The query text with each placeholder replaced by `$k`.
    pub sql: String,

    /// Placeholder names in order of appearance. Duplicates are preserved:
    /// the same name used twice yields two distinct positional parameters
    /// and two entries here.
    pub names: Vec<String>,
}

fn is_ident_char(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Scans `query` left to right for placeholders: a `:` followed by zero or
/// more identifier characters.
///
/// A bare `:` (empty name) is accepted silently and produces an empty name;
/// this keeps casts like `::int` from being rejected outright, though they
/// will still be rewritten. Annotated sources are expected to avoid casts in
/// favor of explicit column types.
pub fn placeholders(query: &str) -> Vec<Placeholder<'_>> {
    let bytes = query.as_bytes();
    let mut matches = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b':' {
            let start = i + 1;
            let mut end = start;

            while end < bytes.len() && is_ident_char(bytes[end]) {
                end += 1;
            }

            matches.push(Placeholder {
                token: i..end,
                name: &query[start..end],
            });

            i = end;
        } else {
            i += 1;
        }
    }

    matches
}

/// Rewrites every placeholder in `query` to a positional marker `$k`, where
/// `k` is the 1-based occurrence index, and records the name order.
pub fn desugar(query: &str) -> DesugaredQuery {
    let matches = placeholders(query);

    let mut sql = String::with_capacity(query.len());
    let mut names = Vec::with_capacity(matches.len());
    let mut tail = 0;

    for placeholder in matches {
        sql.push_str(&query[tail..placeholder.token.start]);

        // unwrap-free: writing into a String cannot fail
        let _ = write!(sql, "${}", names.len() + 1);

        names.push(placeholder.name.to_owned());
        tail = placeholder.token.end;
    }

    sql.push_str(&query[tail..]);

    DesugaredQuery { sql, names }
}
