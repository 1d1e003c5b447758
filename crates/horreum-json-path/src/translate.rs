//! PostgreSQL JSONPath dialect to native dialect.
//!
//! The rewrite is best effort and total: anything it does not recognise is
//! passed through untouched and left for the evaluator to reject.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::scanner::{matching_close, unquoted_chars};

static QUOTED_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\.{1,2})"([^"]*)""#).expect("quoted member pattern"));

static FILTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\?\s*\(").expect("filter marker pattern"));

/// Translate a PostgreSQL-flavoured path (`$.a.**.b ? (@.c > 1)`) into the
/// native dialect (`$.a..b[?(@.c > 1)]`).
pub fn translate(pg_path: &str) -> String {
    let collapsed = collapse_recursive_descent(pg_path);
    let bracketed = QUOTED_MEMBER.replace_all(&collapsed, |caps: &Captures<'_>| {
        let descent = if &caps[1] == ".." { ".." } else { "" };
        format!("{descent}['{}']", caps[2].replace('\'', "\\'"))
    });
    let spaced = FILTER_MARKER.replace_all(&bracketed, "?(");
    let native = wrap_filters(&spaced);
    tracing::trace!(input = pg_path, output = %native, "translated path");
    native
}

fn collapse_recursive_descent(input: &str) -> String {
    input.replace(".**.", "..").replace(".**", "..")
}

/// Wrap every bare `?(...)` filter in `[...]`. An unclosed filter only gets
/// its opening bracket.
fn wrap_filters(input: &str) -> String {
    let mut opens = Vec::new();
    let mut closes = Vec::new();

    for (idx, c) in unquoted_chars(input) {
        if c == '?' && input[idx + 1..].starts_with('(') && !input[..idx].ends_with('[') {
            opens.push(idx);
            if let Some(close) = matching_close(input, idx + 1, '(', ')') {
                closes.push(close + 1);
            }
        }
    }

    if opens.is_empty() {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len() + opens.len() + closes.len());
    for (idx, c) in input.char_indices() {
        for _ in closes.iter().filter(|&&at| at == idx) {
            out.push(']');
        }
        if opens.contains(&idx) {
            out.push('[');
        }
        out.push(c);
    }
    for _ in closes.iter().filter(|&&at| at == input.len()) {
        out.push(']');
    }
    out
}
