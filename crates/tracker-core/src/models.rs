use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// Common issue representation across all backends
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    /// Issue number within its repository
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Close timestamp, present only for closed issues
    pub closed: Option<DateTime<Utc>>,
    /// Names of the labels currently attached
    #[serde(default)]
    pub labels: Vec<String>,
    /// The tracker lists pull requests alongside issues
    #[serde(default)]
    pub is_pull_request: bool,
}

impl Issue {
    pub fn is_closed(&self) -> bool {
        self.closed.is_some()
    }

    /// Labels whose name starts with `prefix`
    pub fn labels_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(move |name| name.starts_with(prefix))
    }
}

/// Issue state filter used when listing issues
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
    #[default]
    All,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueState {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            "all" => Ok(IssueState::All),
            other => Err(TrackerError::InvalidInput(format!(
                "Unknown issue state '{}'. Expected one of: open, closed, all",
                other
            ))),
        }
    }
}

/// Filter applied when listing issues
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFilter {
    pub state: IssueState,
    /// Comma-separated label names; `None` means no label filter
    pub labels: Option<String>,
}

impl IssueFilter {
    pub fn new(state: IssueState, labels: Option<String>) -> Self {
        Self {
            state,
            labels: labels.filter(|l| !l.is_empty()),
        }
    }
}

/// Repository-level label definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDefinition {
    pub name: String,
    /// Color hex string WITHOUT `#` prefix (e.g., "FF0000")
    pub color: String,
}

impl LabelDefinition {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}
