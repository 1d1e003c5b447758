//! JSONPath evaluator.

use crate::{
    ComparisonOperator, FilterExpression, JSONPath, LogicalOperator, PathComponent, PathSegment,
    QueryResult, Selector, ValueExpression,
};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// JSONPath evaluator.
pub struct JsonPathEval;

impl JsonPathEval {
    /// Evaluate a JSONPath against a JSON document.
    ///
    /// Returns a vector of references to matching values.
    pub fn eval<'a>(path: &JSONPath, doc: &'a JsonValue) -> Vec<&'a JsonValue> {
        Self::eval_query(path, doc).values
    }

    /// Evaluate a JSONPath and also return the path components of every match.
    pub fn eval_query<'a>(path: &JSONPath, doc: &'a JsonValue) -> QueryResult<'a> {
        Self::eval_from(path, doc, vec![], doc)
    }

    fn eval_from<'a>(
        path: &JSONPath,
        start: &'a JsonValue,
        start_path: Vec<PathComponent>,
        root: &'a JsonValue,
    ) -> QueryResult<'a> {
        let mut results = vec![start];
        let mut paths: Vec<Vec<PathComponent>> = vec![start_path];

        for segment in &path.segments {
            let mut new_results = Vec::new();
            let mut new_paths = Vec::new();

            for (&value, current_path) in results.iter().zip(&paths) {
                if segment.recursive {
                    Self::eval_recursive(
                        value,
                        &segment.selectors,
                        current_path,
                        root,
                        &mut new_results,
                        &mut new_paths,
                    );
                } else {
                    Self::eval_segment(
                        value,
                        segment,
                        current_path,
                        root,
                        &mut new_results,
                        &mut new_paths,
                    );
                }
            }

            results = new_results;
            paths = new_paths;
        }

        QueryResult {
            values: results,
            paths,
        }
    }

    fn eval_segment<'a>(
        value: &'a JsonValue,
        segment: &PathSegment,
        current_path: &[PathComponent],
        root: &'a JsonValue,
        results: &mut Vec<&'a JsonValue>,
        paths: &mut Vec<Vec<PathComponent>>,
    ) {
        for selector in &segment.selectors {
            Self::eval_selector(value, selector, current_path, root, results, paths);
        }
    }

    fn eval_recursive<'a>(
        value: &'a JsonValue,
        selectors: &[Selector],
        current_path: &[PathComponent],
        root: &'a JsonValue,
        results: &mut Vec<&'a JsonValue>,
        paths: &mut Vec<Vec<PathComponent>>,
    ) {
        // Match selectors at current node first.
        for selector in selectors {
            Self::eval_selector(value, selector, current_path, root, results, paths);
        }

        // Then recurse through descendants.
        for_each_child(value, current_path, |child, child_path| {
            Self::eval_recursive(child, selectors, &child_path, root, results, paths);
        });
    }

    fn eval_selector<'a>(
        value: &'a JsonValue,
        selector: &Selector,
        current_path: &[PathComponent],
        root: &'a JsonValue,
        results: &mut Vec<&'a JsonValue>,
        paths: &mut Vec<Vec<PathComponent>>,
    ) {
        let mut push = |child: &'a JsonValue, component: PathComponent| {
            let mut new_path = current_path.to_vec();
            new_path.push(component);
            results.push(child);
            paths.push(new_path);
        };

        match selector {
            Selector::Name(name) => {
                if let Some(child) = value.as_object().and_then(|map| map.get(name)) {
                    push(child, PathComponent::Key(name.clone()));
                }
            }
            Selector::Index(index) => {
                if let JsonValue::Array(arr) = value {
                    let idx = if *index < 0 {
                        arr.len().checked_sub(index.unsigned_abs())
                    } else {
                        Some(*index as usize)
                    };
                    if let Some((idx, child)) = idx.and_then(|i| arr.get(i).map(|c| (i, c))) {
                        push(child, PathComponent::Index(idx));
                    }
                }
            }
            Selector::Wildcard => match value {
                JsonValue::Object(map) => {
                    for (key, child) in map {
                        push(child, PathComponent::Key(key.clone()));
                    }
                }
                JsonValue::Array(arr) => {
                    for (idx, child) in arr.iter().enumerate() {
                        push(child, PathComponent::Index(idx));
                    }
                }
                _ => {}
            },
            Selector::Slice { start, end, step } => {
                if let JsonValue::Array(arr) = value {
                    for idx in slice_indices(arr.len(), *start, *end, *step) {
                        push(&arr[idx], PathComponent::Index(idx));
                    }
                }
            }
            Selector::Filter(expr) => match value {
                JsonValue::Object(map) => {
                    for (key, child) in map {
                        if Self::eval_filter(expr, child, root) {
                            push(child, PathComponent::Key(key.clone()));
                        }
                    }
                }
                JsonValue::Array(arr) => {
                    for (idx, child) in arr.iter().enumerate() {
                        if Self::eval_filter(expr, child, root) {
                            push(child, PathComponent::Index(idx));
                        }
                    }
                }
                _ => {}
            },
        }
    }

    fn eval_filter(expr: &FilterExpression, current: &JsonValue, root: &JsonValue) -> bool {
        match expr {
            FilterExpression::Existence { path } => {
                !Self::eval_from(path, current, vec![], root).values.is_empty()
            }
            FilterExpression::Comparison {
                operator,
                left,
                right,
            } => {
                let left_val = Self::eval_value_expr(left, current, root);
                let right_val = Self::eval_value_expr(right, current, root);
                compare(*operator, left_val.as_ref(), right_val.as_ref())
            }
            FilterExpression::Logical {
                operator,
                left,
                right,
            } => match operator {
                LogicalOperator::And => {
                    Self::eval_filter(left, current, root) && Self::eval_filter(right, current, root)
                }
                LogicalOperator::Or => {
                    Self::eval_filter(left, current, root) || Self::eval_filter(right, current, root)
                }
            },
            FilterExpression::Negation(expr) => !Self::eval_filter(expr, current, root),
            FilterExpression::Paren(expr) => Self::eval_filter(expr, current, root),
            FilterExpression::Function { name, args } => {
                value_truthy(Self::eval_function(name, args, current, root).as_ref())
            }
        }
    }

    fn eval_value_expr(
        expr: &ValueExpression,
        current: &JsonValue,
        root: &JsonValue,
    ) -> Option<JsonValue> {
        match expr {
            ValueExpression::Current => Some(current.clone()),
            ValueExpression::Literal(v) => Some(v.clone()),
            ValueExpression::Path(_) | ValueExpression::RootPath(_) => {
                Self::eval_nodes(expr, current, root).into_iter().next()
            }
            ValueExpression::Function { name, args } => {
                Self::eval_function(name, args, current, root)
            }
        }
    }

    /// Node list produced by a path argument; other expressions yield at most one node.
    fn eval_nodes(expr: &ValueExpression, current: &JsonValue, root: &JsonValue) -> Vec<JsonValue> {
        match expr {
            ValueExpression::Path(path) => Self::eval_from(path, current, vec![], root)
                .values
                .into_iter()
                .cloned()
                .collect(),
            ValueExpression::RootPath(path) => Self::eval_from(path, root, vec![], root)
                .values
                .into_iter()
                .cloned()
                .collect(),
            other => Self::eval_value_expr(other, current, root)
                .into_iter()
                .collect(),
        }
    }

    /// Single value of an argument; a path argument must select exactly one node.
    fn eval_single(expr: &ValueExpression, current: &JsonValue, root: &JsonValue) -> Option<JsonValue> {
        let mut nodes = Self::eval_nodes(expr, current, root);
        if nodes.len() == 1 {
            nodes.pop()
        } else {
            None
        }
    }

    fn eval_function(
        name: &str,
        args: &[ValueExpression],
        current: &JsonValue,
        root: &JsonValue,
    ) -> Option<JsonValue> {
        match (name, args) {
            ("length", [arg]) => {
                let out = match Self::eval_single(arg, current, root)? {
                    JsonValue::String(s) => s.chars().count(),
                    JsonValue::Array(arr) => arr.len(),
                    JsonValue::Object(map) => map.len(),
                    _ => return None,
                };
                Some(JsonValue::from(out))
            }
            ("count", [arg]) => Some(JsonValue::from(Self::eval_nodes(arg, current, root).len())),
            ("value", [arg]) => Self::eval_single(arg, current, root),
            ("match", [subject, pattern]) | ("search", [subject, pattern]) => {
                let subject = Self::eval_single(subject, current, root);
                let pattern = Self::eval_single(pattern, current, root);
                let matched = match (subject, pattern) {
                    (Some(JsonValue::String(s)), Some(JsonValue::String(p))) => {
                        let pattern = if name == "match" {
                            format!("^(?:{p})$")
                        } else {
                            p
                        };
                        Regex::new(&pattern)
                            .map(|r| r.is_match(&s))
                            .unwrap_or(false)
                    }
                    _ => false,
                };
                Some(JsonValue::Bool(matched))
            }
            _ => None,
        }
    }
}

/// Visit the direct children of an object or array with their extended paths.
pub(crate) fn for_each_child<'a, F>(value: &'a JsonValue, current_path: &[PathComponent], mut f: F)
where
    F: FnMut(&'a JsonValue, Vec<PathComponent>),
{
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                let mut new_path = current_path.to_vec();
                new_path.push(PathComponent::Key(key.clone()));
                f(child, new_path);
            }
        }
        JsonValue::Array(arr) => {
            for (idx, child) in arr.iter().enumerate() {
                let mut new_path = current_path.to_vec();
                new_path.push(PathComponent::Index(idx));
                f(child, new_path);
            }
        }
        _ => {}
    }
}

fn slice_indices(
    len: usize,
    start: Option<isize>,
    end: Option<isize>,
    step: Option<isize>,
) -> Vec<usize> {
    let len = len as isize;
    let step = step.unwrap_or(1);
    if step == 0 {
        return Vec::new();
    }

    let normalize = |i: isize| if i < 0 { len + i } else { i };
    let mut out = Vec::new();

    if step > 0 {
        let lower = normalize(start.unwrap_or(0)).clamp(0, len);
        let upper = normalize(end.unwrap_or(len)).clamp(0, len);
        let mut next = Some(lower);
        while let Some(idx) = next.filter(|&i| i < upper) {
            out.push(idx as usize);
            next = idx.checked_add(step);
        }
    } else {
        let upper = start.map(normalize).unwrap_or(len - 1).clamp(-1, len - 1);
        let lower = end.map(normalize).unwrap_or(-1).clamp(-1, len - 1);
        let mut next = Some(upper);
        while let Some(idx) = next.filter(|&i| i > lower) {
            out.push(idx as usize);
            next = idx.checked_add(step);
        }
    }

    out
}

fn value_truthy(value: Option<&JsonValue>) -> bool {
    match value {
        Some(JsonValue::Bool(v)) => *v,
        Some(JsonValue::Number(v)) => v.as_f64().is_some_and(|n| n != 0.0),
        Some(JsonValue::Array(v)) => !v.is_empty(),
        Some(JsonValue::Null) | None => false,
        Some(_) => true,
    }
}

fn compare(operator: ComparisonOperator, left: Option<&JsonValue>, right: Option<&JsonValue>) -> bool {
    let (l, r) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        (None, None) => return operator == ComparisonOperator::Equal,
        _ => return operator == ComparisonOperator::NotEqual,
    };

    let ord = compare_values(l, r);
    // numbers compare by value so 1 == 1.0
    let equal = match (l, r) {
        (JsonValue::Number(_), JsonValue::Number(_)) => ord == Some(Ordering::Equal),
        _ => l == r,
    };

    match operator {
        ComparisonOperator::Equal => equal,
        ComparisonOperator::NotEqual => !equal,
        ComparisonOperator::Less => ord == Some(Ordering::Less),
        ComparisonOperator::LessEqual => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        ComparisonOperator::Greater => ord == Some(Ordering::Greater),
        ComparisonOperator::GreaterEqual => {
            matches!(ord, Some(Ordering::Greater | Ordering::Equal))
        }
    }
}

fn compare_values(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    match (a, b) {
        (JsonValue::Number(a), JsonValue::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (JsonValue::String(a), JsonValue::String(b)) => Some(a.cmp(b)),
        (JsonValue::Bool(a), JsonValue::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
