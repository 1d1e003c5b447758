//! Matched values and structural path rendering.

use serde_json::Value;

use crate::types::PathComponent;

/// One match produced by evaluating a query: the structural path of the node and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub path: String,
    pub value: Value,
}

impl MatchResult {
    pub fn new(components: &[PathComponent], value: Value) -> Self {
        Self {
            path: render_path(components),
            value,
        }
    }

    /// `{ "<path>": <value> }`, the shape shown by the data viewers.
    pub fn to_entry(&self) -> Value {
        let mut entry = serde_json::Map::with_capacity(1);
        entry.insert(self.path.clone(), self.value.clone());
        Value::Object(entry)
    }
}

/// Render path components as a `$`-prefixed path that re-selects the same node.
///
/// Indices render as `[n]`, identifier keys as `.key` and every other key as
/// `."key"` with `"` and `\` escaped.
pub fn render_path(components: &[PathComponent]) -> String {
    let mut out = String::from("$");
    for component in components {
        out.push_str(&render_component(component));
    }
    out
}

/// Render a single component the way [`render_path`] does.
pub fn render_component(component: &PathComponent) -> String {
    match component {
        PathComponent::Index(index) => format!("[{index}]"),
        PathComponent::Key(key) if is_identifier(key) => format!(".{key}"),
        PathComponent::Key(key) => format!(".\"{}\"", escape_double_quoted(key)),
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn escape_double_quoted(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}
