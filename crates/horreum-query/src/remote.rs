//! Contract with the backend that runs `jsonb_path_query_*` for us.

use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport-level failure of a remote query. A query the backend rejected is
/// not an error: it comes back as a [`RemoteResponse`] with `valid == false`.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Backend answer to a path query.
///
/// `value` is itself JSON-encoded text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RemoteResponse {
    pub fn valid(value: impl Into<String>) -> Self {
        Self {
            valid: true,
            value: Some(value.into()),
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            value: None,
            reason: Some(reason.into()),
        }
    }

    /// Decode the backend's JSON body.
    pub fn from_json(body: &str) -> Result<Self, RemoteError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Runs a path query somewhere else, typically on the Horreum backend.
///
/// `array` selects `jsonb_path_query_array` over `jsonb_path_query_first`;
/// its exact meaning belongs to the implementor. Any timeout policy does too.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn execute(&self, query: &str, array: bool) -> Result<RemoteResponse, RemoteError>;
}

#[async_trait]
impl<F, Fut> RemoteExecutor for F
where
    F: Fn(String, bool) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RemoteResponse, RemoteError>> + Send + 'static,
{
    async fn execute(&self, query: &str, array: bool) -> Result<RemoteResponse, RemoteError> {
        self(query.to_string(), array).await
    }
}
