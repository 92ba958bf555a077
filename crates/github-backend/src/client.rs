use std::time::Duration;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

use crate::error::{GitHubError, Result};
use crate::models::*;

const API_VERSION: &str = "2022-11-28";

/// GitHub REST API client scoped to one repository
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for the API at `base_url` (api.github.com, GitHub Enterprise, or a test server)
    pub fn with_base_url(base_url: &str, owner: &str, repo: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
        }
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url, self.owner, self.repo, path
        )
    }

    /// Attach the token and the media type/version headers every call sends
    fn authorized<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Turn non-2xx responses into typed errors
    fn check_response(&self, mut response: Response<Body>) -> Result<Response<Body>> {
        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(response);
        }

        // Primary rate limit: 403 with x-ratelimit-remaining: 0
        let exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");
        if status == 403 && exhausted {
            return Err(GitHubError::RateLimited);
        }

        let body = response.body_mut().read_to_string().unwrap_or_default();
        let message = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or(body),
            Err(_) if body.is_empty() => format!("HTTP {}", status),
            Err(_) => body,
        };

        match status {
            401 => Err(GitHubError::Unauthorized),
            404 => Err(GitHubError::NotFound(message)),
            _ => Err(GitHubError::Api { status, message }),
        }
    }

    /// List one page of issues for the repository
    ///
    /// GitHub returns pull requests from this endpoint as well; they are kept
    /// so the page length reflects what the server sent.
    pub fn list_issues(
        &self,
        state: &str,
        labels: Option<&str>,
        per_page: usize,
        page: usize,
    ) -> Result<Vec<GitHubIssue>> {
        let mut url = format!(
            "{}?state={}&per_page={}&page={}",
            self.repo_url("/issues"),
            urlencoding::encode(state),
            per_page,
            page
        );
        if let Some(labels) = labels {
            url.push_str("&labels=");
            url.push_str(&urlencoding::encode(labels));
        }

        let response = self
            .authorized(self.agent.get(&url))
            .call()
            .map_err(GitHubError::Http)?;

        Ok(self.check_response(response)?.body_mut().read_json()?)
    }

    /// Remove a label from an issue, returning the labels left on it
    pub fn remove_issue_label(&self, number: u64, name: &str) -> Result<Vec<GitHubLabel>> {
        let url = self.repo_url(&format!(
            "/issues/{}/labels/{}",
            number,
            urlencoding::encode(name)
        ));

        let response = self
            .authorized(self.agent.delete(&url))
            .call()
            .map_err(GitHubError::Http)?;

        Ok(self.check_response(response)?.body_mut().read_json()?)
    }

    /// Add labels to an issue, returning every label it now carries
    pub fn add_issue_labels(&self, number: u64, labels: &[String]) -> Result<Vec<GitHubLabel>> {
        let url = self.repo_url(&format!("/issues/{}/labels", number));
        let body = AddGitHubLabels {
            labels: labels.to_vec(),
        };

        let response = self
            .authorized(self.agent.post(&url))
            .send_json(&body)
            .map_err(GitHubError::Http)?;

        Ok(self.check_response(response)?.body_mut().read_json()?)
    }

    /// Create a repository label
    ///
    /// GitHub answers 422 when the name is taken; that is reported as
    /// [`GitHubError::LabelExists`].
    pub fn create_label(&self, label: &CreateGitHubLabel) -> Result<GitHubLabel> {
        let response = self
            .authorized(self.agent.post(&self.repo_url("/labels")))
            .send_json(label)
            .map_err(GitHubError::Http)?;

        match self.check_response(response) {
            Ok(mut response) => Ok(response.body_mut().read_json()?),
            Err(GitHubError::Api { status: 422, .. }) => {
                Err(GitHubError::LabelExists(label.name.clone()))
            }
            Err(e) => Err(e),
        }
    }

    /// Update a repository label by name
    pub fn update_label(&self, name: &str, update: &UpdateGitHubLabel) -> Result<GitHubLabel> {
        let url = self.repo_url(&format!("/labels/{}", urlencoding::encode(name)));

        let response = self
            .authorized(self.agent.patch(&url))
            .send_json(update)
            .map_err(GitHubError::Http)?;

        Ok(self.check_response(response)?.body_mut().read_json()?)
    }
}
