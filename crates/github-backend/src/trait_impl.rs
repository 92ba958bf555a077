//! Implementation of tracker-core traits for GitHubClient

use tracker_core::{
    Issue, IssueFilter, IssueTracker, LabelDefinition, Result, TrackerError,
};

use crate::client::GitHubClient;
use crate::convert::{create_label_from_core, github_issue_to_core, update_label_from_core};

impl IssueTracker for GitHubClient {
    fn list_issues(&self, filter: &IssueFilter, per_page: usize, page: usize) -> Result<Vec<Issue>> {
        let issues = self
            .list_issues(filter.state.as_str(), filter.labels.as_deref(), per_page, page)
            .map_err(TrackerError::from)?;

        issues
            .into_iter()
            .map(|i| github_issue_to_core(i).map_err(TrackerError::from))
            .collect()
    }

    fn remove_issue_label(&self, number: u64, name: &str) -> Result<()> {
        self.remove_issue_label(number, name)
            .map_err(TrackerError::from)?;
        Ok(())
    }

    fn add_issue_labels(&self, number: u64, names: &[String]) -> Result<()> {
        self.add_issue_labels(number, names)
            .map_err(TrackerError::from)?;
        Ok(())
    }

    fn create_label(&self, label: &LabelDefinition) -> Result<()> {
        self.create_label(&create_label_from_core(label))
            .map_err(TrackerError::from)?;
        Ok(())
    }

    fn update_label(&self, label: &LabelDefinition) -> Result<()> {
        self.update_label(&label.name, &update_label_from_core(label))
            .map_err(TrackerError::from)?;
        Ok(())
    }
}
