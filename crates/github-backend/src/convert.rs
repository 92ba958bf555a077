//! Model conversions between GitHub types and tracker-core types

use chrono::{DateTime, Utc};
use tracker_core::{Issue, LabelDefinition};

use crate::error::{GitHubError, Result};
use crate::models::*;

/// Convert a GitHub issue to a tracker-core Issue
pub fn github_issue_to_core(issue: GitHubIssue) -> Result<Issue> {
    let created = parse_github_datetime(&issue.created_at)?;
    let closed = issue
        .closed_at
        .as_deref()
        .map(parse_github_datetime)
        .transpose()?;

    Ok(Issue {
        number: issue.number,
        is_pull_request: issue.is_pull_request(),
        title: issue.title,
        created,
        closed,
        labels: issue.labels.into_iter().map(|l| l.name).collect(),
    })
}

/// Build a create-label request from a label definition
pub fn create_label_from_core(label: &LabelDefinition) -> CreateGitHubLabel {
    CreateGitHubLabel {
        name: label.name.clone(),
        color: normalize_color(&label.color),
    }
}

/// Build an update request that only touches the label's color
pub fn update_label_from_core(label: &LabelDefinition) -> UpdateGitHubLabel {
    UpdateGitHubLabel {
        color: normalize_color(&label.color),
    }
}

/// GitHub rejects colors with a leading `#`
fn normalize_color(color: &str) -> String {
    color.trim_start_matches('#').to_string()
}

fn parse_github_datetime(dt: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(dt)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|source| GitHubError::Timestamp {
            value: dt.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github_issue(closed_at: Option<&str>, pull_request: bool) -> GitHubIssue {
        GitHubIssue {
            number: 42,
            title: "Crash on startup".to_string(),
            labels: vec![
                GitHubLabel {
                    name: "bug".to_string(),
                    color: "fc2929".to_string(),
                },
                GitHubLabel {
                    name: "Duration: 1-7 days".to_string(),
                    color: "00FF00".to_string(),
                },
            ],
            created_at: "2024-01-01T00:00:00Z".to_string(),
            closed_at: closed_at.map(String::from),
            pull_request: pull_request.then(|| serde_json::json!({"url": "https://api.github.com/pulls/42"})),
        }
    }

    #[test]
    fn converts_open_issue() {
        let issue = github_issue_to_core(github_issue(None, false)).unwrap();

        assert_eq!(issue.number, 42);
        assert_eq!(issue.title, "Crash on startup");
        assert_eq!(issue.created.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert!(issue.closed.is_none());
        assert_eq!(issue.labels, vec!["bug", "Duration: 1-7 days"]);
        assert!(!issue.is_pull_request);
    }

    #[test]
    fn converts_closed_pull_request() {
        let issue =
            github_issue_to_core(github_issue(Some("2024-01-20T12:30:00Z"), true)).unwrap();

        assert!(issue.is_closed());
        assert_eq!(
            issue.closed.unwrap().to_rfc3339(),
            "2024-01-20T12:30:00+00:00"
        );
        assert!(issue.is_pull_request);
    }

    #[test]
    fn rejects_malformed_timestamp() {
        let mut raw = github_issue(None, false);
        raw.created_at = "yesterday".to_string();

        let err = github_issue_to_core(raw).unwrap_err();
        assert!(matches!(err, GitHubError::Timestamp { .. }));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn label_requests_strip_hash_prefix() {
        let label = LabelDefinition::new("Duration: >1 month", "#FF0000");

        assert_eq!(create_label_from_core(&label).color, "FF0000");
        assert_eq!(update_label_from_core(&label).color, "FF0000");
    }
}
