//! Query state shared between the explorer and its URL.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ExplorerConfig;
use crate::error::{QueryError, StateError};
use crate::mode::{Dialect, Query, QueryMode};
use crate::orchestrator::{run, QueryOutcome};
use crate::remote::RemoteExecutor;

/// Mode and query text as persisted in `?type=...&query=...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    #[serde(rename = "type", default)]
    pub mode: QueryMode,
    #[serde(default)]
    pub query: String,
}

impl QueryState {
    pub fn new(mode: QueryMode, query: impl Into<String>) -> Self {
        Self {
            mode,
            query: query.into(),
        }
    }

    pub fn to_query_string(&self) -> Result<String, StateError> {
        Ok(serde_urlencoded::to_string(self)?)
    }

    /// Parse a URL query string, with or without the leading `?`.
    /// Unrelated parameters are ignored.
    pub fn from_query_string(input: &str) -> Result<Self, StateError> {
        Ok(serde_urlencoded::from_str(input.trim_start_matches('?'))?)
    }
}

/// Identifies one submitted query within a [`QuerySession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

/// A query handed out by [`QuerySession::begin`] or [`QuerySession::replay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub ticket: QueryTicket,
    pub mode: QueryMode,
    pub dialect: Dialect,
    pub text: String,
}

impl PendingQuery {
    pub async fn run(
        &self,
        doc: Option<&Value>,
        remote: &dyn RemoteExecutor,
    ) -> Result<QueryOutcome, QueryError> {
        run(doc, &Query::new(self.text.as_str(), self.mode, self.dialect), remote).await
    }
}

/// Last-write-wins bookkeeping for queries whose results arrive out of order.
///
/// The session remembers the last mode and query so the view can replay them
/// after the document is reloaded. Locally evaluated queries are read in the
/// session's dialect, [`Dialect::LocalNative`] unless configured otherwise.
#[derive(Debug)]
pub struct QuerySession {
    state: QueryState,
    dialect: Dialect,
    issued: u64,
}

impl Default for QuerySession {
    fn default() -> Self {
        Self::with_state(QueryState::default())
    }
}

impl QuerySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self::with_state(QueryState::new(config.query.default_mode, ""))
            .with_dialect(config.query.default_dialect)
    }

    /// Resume from persisted state, e.g. the current URL.
    pub fn with_state(state: QueryState) -> Self {
        Self {
            state,
            dialect: Dialect::LocalNative,
            issued: 0,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Record a new query and return it with a fresh ticket. Every ticket
    /// issued before it becomes stale.
    pub fn begin(&mut self, mode: QueryMode, text: impl Into<String>) -> PendingQuery {
        self.state = QueryState::new(mode, text);
        self.next_pending()
    }

    /// Re-issue the last query, typically after the document changed.
    pub fn replay(&mut self) -> PendingQuery {
        self.next_pending()
    }

    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Pass `outcome` through if `ticket` is still the latest, drop it otherwise.
    pub fn accept(&self, ticket: QueryTicket, outcome: QueryOutcome) -> Option<QueryOutcome> {
        if self.is_current(ticket) {
            Some(outcome)
        } else {
            tracing::debug!(query = %outcome.query, "dropping stale query outcome");
            None
        }
    }

    fn next_pending(&mut self) -> PendingQuery {
        self.issued += 1;
        let pending = PendingQuery {
            ticket: QueryTicket(self.issued),
            mode: self.state.mode,
            dialect: self.dialect,
            text: self.state.query.clone(),
        };
        tracing::trace!(ticket = self.issued, mode = %pending.mode, query = %pending.text, "issued query");
        pending
    }
}
