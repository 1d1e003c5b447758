//! Path completion for partially typed queries.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::scanner::{first_unquoted, last_unquoted, matching_close};
use crate::{translate, JsonPathEval, JsonPathParser, PathComponent};

const CONDITION_TERMINATORS: [&str; 6] = ["<", ">", "!=", "==", " ", ")"];

/// Completion candidates for the token under the cursor.
///
/// `valid` is a hint for the input field: `Some(false)` when the query could
/// not be enumerated, `Some(true)` when there is nothing to check against and
/// `None` when validity should be left as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    pub candidates: Vec<String>,
    pub valid: Option<bool>,
}

impl Suggestions {
    fn empty(valid: Option<bool>) -> Self {
        Self {
            candidates: Vec::new(),
            valid,
        }
    }
}

/// Suggest the property names and array accessors that can follow `input`.
///
/// Candidates are de-duplicated and sorted. Keys that are not plain
/// `[a-zA-Z0-9_]+` words are offered wrapped in double quotes.
pub fn suggest(doc: Option<&Value>, input: &str) -> Suggestions {
    let Some(doc) = doc else {
        return Suggestions::empty(Some(true));
    };

    let translated = translate(input.trim());
    let isolated = isolate_filter(&translated);
    let query = isolated.trim();

    let (base, fragment) = match last_unquoted(query, |c| c == '.' || c == ']') {
        Some(idx) => (normalize_base(&query[..=idx]), &query[idx + 1..]),
        None if query == "$" => return Suggestions::empty(None),
        None => ("$..*".to_string(), query),
    };

    let path = match JsonPathParser::parse(&base) {
        Ok(path) => path,
        Err(error) => {
            tracing::debug!(%base, %error, "cannot enumerate suggestion base");
            return Suggestions::empty(Some(false));
        }
    };

    let result = JsonPathEval::eval_query(&path, doc);
    let candidates: BTreeSet<String> = result
        .paths
        .iter()
        .filter_map(|components| components.last())
        .filter_map(|last| candidate(last, fragment))
        .collect();

    tracing::trace!(%base, fragment, count = candidates.len(), "computed suggestions");
    Suggestions {
        candidates: candidates.into_iter().collect(),
        valid: None,
    }
}

/// Replace the filter around the first `@` condition so that completion runs
/// on the filtered node rather than inside the predicate.
///
/// `$.runs[?(@.na` becomes `$.runs[*].na`; a closed filter becomes `[*]`
/// followed by whatever came after it.
fn isolate_filter(query: &str) -> String {
    let Some(at) = first_unquoted(query, |c| c == '@') else {
        return query.to_string();
    };

    let rest = &query[at + 1..];
    let end = CONDITION_TERMINATORS
        .iter()
        .filter_map(|t| rest.find(t))
        .min()
        .unwrap_or(rest.len());
    let condition = &rest[..end];

    let before = &query[..at];
    let Some(start) = before.rfind("[?").or_else(|| before.rfind('?')) else {
        return format!("$..*{condition}");
    };
    let prefix = &query[..start];

    let close = query[start..]
        .starts_with('[')
        .then(|| matching_close(query, start, '[', ']'))
        .flatten();
    match close {
        Some(close) => format!("{prefix}[*]{}", isolate_filter(&query[close + 1..])),
        None => format!("{prefix}[*]{condition}"),
    }
}

/// Turn the text up to the last delimiter into a query over candidate nodes.
fn normalize_base(base: &str) -> String {
    let mut base = base.to_string();
    if base.ends_with('.') {
        base.push('*');
    }
    if base == "$" {
        "$.*".to_string()
    } else if base.starts_with('$') {
        base
    } else if base.starts_with('.') {
        format!("${base}")
    } else {
        format!("$..{base}")
    }
}

fn candidate(component: &PathComponent, fragment: &str) -> Option<String> {
    let (raw, display) = match component {
        PathComponent::Index(index) => (index.to_string(), format!("[{index}]")),
        PathComponent::Key(key) if is_plain_key(key) => (key.clone(), key.clone()),
        PathComponent::Key(key) => (key.clone(), format!("\"{key}\"")),
    };
    let keep = fragment == "*" || raw.starts_with(fragment) || display.starts_with(fragment);
    keep.then_some(display)
}

fn is_plain_key(key: &str) -> bool {
    key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_isolation() {
        assert_eq!(isolate_filter("$.runs[?(@.na"), "$.runs[*].na");
        assert_eq!(isolate_filter("$.runs[?(@.id > 1)].n"), "$.runs[*].n");
        assert_eq!(isolate_filter("@.x == 1"), "$..*.x");
        assert_eq!(isolate_filter("$.a.b"), "$.a.b");
        assert_eq!(isolate_filter(r#"$."@x".b"#), r#"$."@x".b"#);
    }

    #[test]
    fn base_normalization() {
        assert_eq!(normalize_base("$."), "$.*");
        assert_eq!(normalize_base("$"), "$.*");
        assert_eq!(normalize_base("$.a[0]"), "$.a[0]");
        assert_eq!(normalize_base(".foo."), "$.foo.*");
        assert_eq!(normalize_base("foo."), "$..foo.*");
    }

    #[test]
    fn candidates_render_by_kind() {
        assert_eq!(candidate(&PathComponent::Index(3), ""), Some("[3]".into()));
        assert_eq!(candidate(&PathComponent::Key("a-b".into()), "a"), Some("\"a-b\"".into()));
        assert_eq!(candidate(&PathComponent::Key("".into()), ""), Some(String::new()));
        assert_eq!(candidate(&PathComponent::Key("abc".into()), "b"), None);
        assert_eq!(candidate(&PathComponent::Key("abc".into()), "*"), Some("abc".into()));
    }

    #[test]
    fn absent_document_is_provisionally_valid() {
        assert_eq!(suggest(None, "$.a"), Suggestions::empty(Some(true)));
    }

    #[test]
    fn nested_root_children() {
        let doc = json!({"b": 1, "a": {"c": 1}});
        let s = suggest(Some(&doc), "$.");
        assert_eq!(s.candidates, vec!["a", "b"]);
        assert_eq!(s.valid, None);
    }
}
