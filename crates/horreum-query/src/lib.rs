//! Query orchestration for the Horreum data explorer.
//!
//! [`run_query`] evaluates a path locally with [`horreum_json_path`] or hands it
//! to a [`RemoteExecutor`] backed by PostgreSQL's `jsonb_path_query_first` /
//! `jsonb_path_query_array`, and formats the answer as pretty JSON.
//! [`QuerySession`] keeps late answers from overwriting newer ones and
//! [`Debouncer`] spaces out suggestion requests while the user types.

mod config;
mod debounce;
mod error;
mod mode;
mod orchestrator;
mod remote;
mod session;

pub use config::{ConfigError, ExplorerConfig, QueryConfig, SuggestionConfig};
pub use debounce::Debouncer;
pub use error::{QueryError, StateError, UnknownModeError};
pub use mode::{Dialect, Query, QueryMode};
pub use orchestrator::{run, run_query, QueryOutcome};
pub use remote::{RemoteError, RemoteExecutor, RemoteResponse};
pub use session::{PendingQuery, QuerySession, QueryState, QueryTicket};

pub use horreum_json_path as json_path;
