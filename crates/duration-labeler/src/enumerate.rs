use tracing::info;
use tracker_core::{fetch_all_pages, Issue, IssueTracker, DEFAULT_PAGE_SIZE};

use crate::config::LabelerConfig;

/// Fetch every issue matching the configured state and label filter.
///
/// Any tracker error aborts the fetch; pages already read are discarded.
pub fn fetch_issues(
    tracker: &dyn IssueTracker,
    config: &LabelerConfig,
) -> tracker_core::Result<Vec<Issue>> {
    let filter = config.issue_filter();

    let with_label = filter
        .labels
        .as_deref()
        .map(|l| format!(" with label '{}'", l))
        .unwrap_or_default();

    let issues = fetch_all_pages(
        |page, per_page| {
            info!("Fetching page {} of {} issues{}...", page, filter.state, with_label);
            tracker.list_issues(&filter, per_page, page)
        },
        DEFAULT_PAGE_SIZE,
    )?;

    match filter.labels.as_deref() {
        Some(label) => info!(
            "Found {} total {} issues with '{}' label",
            issues.len(),
            filter.state,
            label
        ),
        None => info!("Found {} total {} issues", issues.len(), filter.state),
    }

    Ok(issues)
}
