use serde::{Deserialize, Serialize};

/// A repository label as returned by the labels endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubLabel {
    pub name: String,
    /// Hex color without the leading `#`
    #[serde(default)]
    pub color: String,
}

/// Body of `POST /repos/{owner}/{repo}/labels`
#[derive(Debug, Clone, Serialize)]
pub struct CreateGitHubLabel {
    pub name: String,
    pub color: String,
}

/// Body of `PATCH /repos/{owner}/{repo}/labels/{name}`; only the color is changed
#[derive(Debug, Clone, Serialize)]
pub struct UpdateGitHubLabel {
    pub color: String,
}

/// Body of `POST /repos/{owner}/{repo}/issues/{number}/labels`
#[derive(Debug, Clone, Serialize)]
pub struct AddGitHubLabels {
    pub labels: Vec<String>,
}
