use thiserror::Error;

use crate::parser::ParseError;

/// Failure of a local query. Always recoverable: the caller shows the message
/// as the "invalid path" reason and lets the user correct the input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    /// The query is not valid native JSONPath.
    #[error("{error} at position {position}")]
    Syntax { error: ParseError, position: usize },
    /// The query parsed but cannot be evaluated.
    #[error("{0}")]
    Runtime(String),
}
