//! Local evaluation of user-entered queries.

use regex::Regex;
use serde_json::Value;

use crate::{
    EvaluationError, FilterExpression, JSONPath, JsonPathEval, JsonPathParser, MatchResult,
    Selector, ValueExpression,
};

/// Evaluate a user query against `doc`.
///
/// The query is normalized first (see [`normalize_query`]). Every match carries
/// the structural path that re-selects it.
pub fn evaluate(doc: &Value, query: &str) -> Result<Vec<MatchResult>, EvaluationError> {
    let normalized = normalize_query(query);
    let path = JsonPathParser::parse_with_position(&normalized).map_err(|(error, position)| {
        tracing::debug!(query = %normalized, %error, position, "rejected query");
        EvaluationError::Syntax { error, position }
    })?;
    check_patterns(&path)?;

    let result = JsonPathEval::eval_query(&path, doc);
    let matches: Vec<MatchResult> = result
        .values
        .into_iter()
        .zip(&result.paths)
        .map(|(value, components)| MatchResult::new(components, value.clone()))
        .collect();
    tracing::debug!(query = %normalized, matches = matches.len(), "evaluated query");
    Ok(matches)
}

/// Strip trailing dots, turn a bare `@` condition into a filter over every
/// descendant and treat anything not rooted at `$` as "search anywhere".
pub fn normalize_query(query: &str) -> String {
    let trimmed = query.trim().trim_end_matches('.');
    if trimmed.starts_with('@') {
        format!("$..*[?({trimmed})]")
    } else if !trimmed.starts_with('$') {
        format!("$..{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Reject `match`/`search` calls whose literal pattern does not compile.
fn check_patterns(path: &JSONPath) -> Result<(), EvaluationError> {
    for selector in path.segments.iter().flat_map(|s| &s.selectors) {
        if let Selector::Filter(expr) = selector {
            check_filter(expr)?;
        }
    }
    Ok(())
}

fn check_filter(expr: &FilterExpression) -> Result<(), EvaluationError> {
    match expr {
        FilterExpression::Comparison { left, right, .. } => {
            check_value(left)?;
            check_value(right)
        }
        FilterExpression::Logical { left, right, .. } => {
            check_filter(left)?;
            check_filter(right)
        }
        FilterExpression::Existence { path } => check_patterns(path),
        FilterExpression::Function { name, args } => check_function(name, args),
        FilterExpression::Paren(inner) | FilterExpression::Negation(inner) => check_filter(inner),
    }
}

fn check_value(expr: &ValueExpression) -> Result<(), EvaluationError> {
    match expr {
        ValueExpression::Path(path) | ValueExpression::RootPath(path) => check_patterns(path),
        ValueExpression::Function { name, args } => check_function(name, args),
        ValueExpression::Current | ValueExpression::Literal(_) => Ok(()),
    }
}

fn check_function(name: &str, args: &[ValueExpression]) -> Result<(), EvaluationError> {
    if let ("match" | "search", [_, ValueExpression::Literal(Value::String(pattern))]) =
        (name, args)
    {
        Regex::new(pattern).map_err(|e| {
            EvaluationError::Runtime(format!("invalid pattern in {name}(): {e}"))
        })?;
    }
    args.iter().try_for_each(check_value)
}
