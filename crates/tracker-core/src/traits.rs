use crate::error::Result;
use crate::models::*;

/// Common trait for all issue tracker backends
///
/// This trait defines the operations the labeler needs from a tracker.
/// Each backend provides its own implementation.
pub trait IssueTracker: Send + Sync {
    // ========== Issue Operations ==========

    /// List one page of issues matching `filter`. Pages are numbered from 1.
    ///
    /// The returned page must not be filtered client-side, so callers can rely
    /// on its length to detect the last page.
    fn list_issues(&self, filter: &IssueFilter, per_page: usize, page: usize) -> Result<Vec<Issue>>;

    /// Remove a single label from an issue
    fn remove_issue_label(&self, number: u64, name: &str) -> Result<()>;

    /// Attach labels to an issue, keeping the ones already present
    fn add_issue_labels(&self, number: u64, names: &[String]) -> Result<()>;

    // ========== Label Operations ==========

    /// Create a repository label.
    ///
    /// Returns [`TrackerError::AlreadyExists`](crate::TrackerError::AlreadyExists)
    /// when a label with the same name is already defined.
    fn create_label(&self, label: &LabelDefinition) -> Result<()>;

    /// Update the color of an existing repository label
    fn update_label(&self, label: &LabelDefinition) -> Result<()>;
}
