//! Runs a query locally or remotely and formats the result for display.

use horreum_json_path::{evaluate, MatchResult};
use serde_json::Value;

use crate::error::QueryError;
use crate::mode::{Dialect, Query, QueryMode};
use crate::remote::RemoteExecutor;

/// Formatted result of one query, tagged with the query that produced it so
/// callers can drop stale answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub query: String,
    pub mode: QueryMode,
    /// Pretty-printed JSON, or the reason the query was rejected.
    pub formatted: String,
    pub valid: bool,
}

/// Run `raw_text` against `doc` in the given mode.
///
/// Local queries are native JSONPath. Invalid paths are reported through
/// `valid == false`; only a transport failure of the remote executor is an
/// `Err`.
pub async fn run_query(
    doc: Option<&Value>,
    mode: QueryMode,
    raw_text: &str,
    remote: &dyn RemoteExecutor,
) -> Result<QueryOutcome, QueryError> {
    execute(doc, mode, raw_text, Dialect::LocalNative, remote).await
}

/// Like [`run_query`], honouring the query's dialect for local evaluation.
pub async fn run(
    doc: Option<&Value>,
    query: &Query,
    remote: &dyn RemoteExecutor,
) -> Result<QueryOutcome, QueryError> {
    execute(doc, query.mode, &query.raw_text, query.dialect, remote).await
}

async fn execute(
    doc: Option<&Value>,
    mode: QueryMode,
    raw_text: &str,
    dialect: Dialect,
    remote: &dyn RemoteExecutor,
) -> Result<QueryOutcome, QueryError> {
    let outcome = |formatted: String, valid: bool| QueryOutcome {
        query: raw_text.to_string(),
        mode,
        formatted,
        valid,
    };

    let Some(doc) = doc else {
        return Ok(outcome(String::new(), true));
    };
    if raw_text.is_empty() {
        return Ok(outcome(serde_json::to_string_pretty(doc)?, true));
    }

    if mode.is_local() {
        let query = Query::new(raw_text, mode, dialect);
        return match evaluate(doc, &query.native_text()) {
            Ok(matches) => {
                let entries: Vec<Value> = matches.iter().map(MatchResult::to_entry).collect();
                Ok(outcome(serde_json::to_string_pretty(&entries)?, true))
            }
            Err(error) => {
                tracing::debug!(query = raw_text, %error, "local query rejected");
                Ok(outcome(error.to_string(), false))
            }
        };
    }

    tracing::debug!(query = raw_text, %mode, "running remote query");
    let response = remote
        .execute(raw_text, mode.is_array())
        .await
        .inspect_err(|error| tracing::warn!(query = raw_text, %error, "remote query failed"))?;

    if !response.valid {
        return Ok(outcome(response.reason.unwrap_or_default(), false));
    }
    let formatted = match response.value {
        Some(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(value) => serde_json::to_string_pretty(&value)?,
            Err(_) => raw,
        },
        None => String::new(),
    };
    Ok(outcome(formatted, true))
}
