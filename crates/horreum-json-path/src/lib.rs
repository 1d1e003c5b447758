//! JSONPath tooling for exploring run and dataset payloads.
//!
//! - [`translate`] rewrites PostgreSQL `jsonb_path_*` paths into the native dialect.
//! - [`evaluate`] runs a user query against a document and returns every match
//!   with a structural path that re-selects it.
//! - [`suggest`] completes a partially typed query from the keys present in
//!   the document.
//!
//! The native dialect is parsed by [`JsonPathParser`] and executed by
//! [`JsonPathEval`].
//!
//! ```
//! use serde_json::json;
//!
//! let doc = json!({"a": [{"x": 1}, {"x": 5}]});
//! let matches = horreum_json_path::evaluate(&doc, "$.a[1].x").unwrap();
//! assert_eq!(matches[0].path, "$.a[1].x");
//! assert_eq!(matches[0].value, json!(5));
//! ```

mod error;
mod eval;
mod evaluate;
mod parser;
pub mod scanner;
mod suggest;
mod translate;
mod types;
mod value;

pub use error::EvaluationError;
pub use eval::JsonPathEval;
pub use evaluate::{evaluate, normalize_query};
pub use parser::{JsonPathParser, ParseError};
pub use suggest::{suggest, Suggestions};
pub use translate::translate;
pub use types::*;
pub use value::{render_component, render_path, MatchResult};
