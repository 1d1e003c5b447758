//! Query modes and dialects.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownModeError;

/// Where and how a query runs.
///
/// The serialized names are the `type` values persisted in explorer URLs and
/// must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QueryMode {
    /// `jsonb_path_query_first` on the backend.
    #[default]
    #[serde(rename = "jsonb_path_query_first")]
    FirstMatch,
    /// `jsonb_path_query_array` on the backend.
    #[serde(rename = "jsonb_path_query_array")]
    AllMatches,
    /// In-process evaluation against the loaded document.
    #[serde(rename = "js")]
    LocalEvaluator,
}

impl QueryMode {
    pub const ALL: [QueryMode; 3] = [Self::FirstMatch, Self::AllMatches, Self::LocalEvaluator];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstMatch => "jsonb_path_query_first",
            Self::AllMatches => "jsonb_path_query_array",
            Self::LocalEvaluator => "js",
        }
    }

    /// The `array` flag forwarded to the remote executor.
    pub fn is_array(self) -> bool {
        matches!(self, Self::AllMatches)
    }

    pub fn is_local(self) -> bool {
        matches!(self, Self::LocalEvaluator)
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownModeError(s.to_string()))
    }
}

/// Path syntax the user typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// PostgreSQL SQL/JSON path (`$.a ? (@.b > 1)`).
    #[default]
    Postgres,
    /// Native JSONPath (`$.a[?(@.b > 1)]`).
    LocalNative,
}

/// One query as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub raw_text: String,
    pub mode: QueryMode,
    pub dialect: Dialect,
}

impl Query {
    pub fn new(raw_text: impl Into<String>, mode: QueryMode, dialect: Dialect) -> Self {
        Self {
            raw_text: raw_text.into(),
            mode,
            dialect,
        }
    }

    /// Text handed to the local evaluator; PostgreSQL paths are translated first.
    pub fn native_text(&self) -> Cow<'_, str> {
        match self.dialect {
            Dialect::Postgres => Cow::Owned(horreum_json_path::translate(&self.raw_text)),
            Dialect::LocalNative => Cow::Borrowed(&self.raw_text),
        }
    }
}
