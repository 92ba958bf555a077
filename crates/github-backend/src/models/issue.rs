use serde::Deserialize;

use super::label::GitHubLabel;

/// An entry of `GET /repos/{owner}/{repo}/issues`
///
/// The endpoint lists pull requests too; those carry a non-null
/// `pull_request` object.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubIssue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    pub created_at: String,
    pub closed_at: Option<String>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl GitHubIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}
