use thiserror::Error;

use crate::remote::RemoteError;

/// Failure of [`run_query`](crate::run_query) that cannot be shown as an
/// invalid-path message.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The remote executor rejected the call before producing a response.
    #[error("remote query failed: {0}")]
    Remote(#[from] RemoteError),
    #[error("cannot format result: {0}")]
    Format(#[from] serde_json::Error),
}

/// The `type` parameter named a mode that does not exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown query type '{0}'")]
pub struct UnknownModeError(pub String);

/// Failure to persist or restore a [`QueryState`](crate::QueryState).
#[derive(Debug, Error)]
pub enum StateError {
    #[error("cannot encode query state: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("cannot decode query state: {0}")]
    Decode(#[from] serde_urlencoded::de::Error),
}
