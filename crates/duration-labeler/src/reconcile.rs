//! Per-issue label reconciliation
//!
//! Every mutation is isolated: a failed request is logged as a warning and
//! recorded on the outcome, and the remaining steps still run.

use serde::Serialize;
use tracing::{debug, info, warn};
use tracker_core::{Issue, IssueTracker, TrackerError};

use crate::classify::{DurationBucket, DURATION_LABEL_PREFIX};
use crate::config::LabelerConfig;

/// What happened to the repository-level label definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelDefinitionAction {
    Created,
    /// The label existed; its color was updated in place
    Updated,
    Failed,
    /// Dry run; nothing was sent
    Planned,
}

/// Result of reconciling one issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueOutcome {
    pub number: u64,
    pub label: String,
    pub color: String,
    /// Duration labels successfully removed (or planned for removal)
    pub removed: Vec<String>,
    pub definition: LabelDefinitionAction,
    pub attached: bool,
    pub warnings: Vec<String>,
}

impl IssueOutcome {
    fn new(issue: &Issue, bucket: &DurationBucket) -> Self {
        Self {
            number: issue.number,
            label: bucket.label.clone(),
            color: bucket.color.clone(),
            removed: Vec::new(),
            definition: LabelDefinitionAction::Planned,
            attached: false,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String, err: &TrackerError) {
        warn!(
            issue = self.number,
            transient = err.is_transient(),
            "{}",
            message
        );
        self.warnings.push(message);
    }
}

/// Gate for `thresholded_update`: proceed unless the flag is set and no
/// label was computed. Classification always yields a label, so this only
/// skips for an empty label name.
pub fn update_required(config: &LabelerConfig, bucket: &DurationBucket) -> bool {
    !config.thresholded_update || !bucket.label.is_empty()
}

/// Bring the duration label of `issue` in line with `bucket`.
///
/// Removes every existing duration label, makes sure the repository label
/// exists with the bucket's color, then attaches it.
pub fn reconcile_issue(
    tracker: &dyn IssueTracker,
    issue: &Issue,
    bucket: &DurationBucket,
    config: &LabelerConfig,
) -> Option<IssueOutcome> {
    if !update_required(config, bucket) {
        debug!(issue = issue.number, "No label computed, leaving issue untouched");
        return None;
    }

    let mut outcome = IssueOutcome::new(issue, bucket);

    remove_old_duration_labels(tracker, issue, config, &mut outcome);
    outcome.definition = ensure_label_definition(tracker, bucket, config, &mut outcome);
    outcome.attached = attach_label(tracker, issue, bucket, config, &mut outcome);

    if config.dry_run {
        info!(
            "Would update issue #{} with label: {} (color: {})",
            issue.number, bucket.label, bucket.color
        );
    } else {
        info!(
            "Updated issue #{} with label: {} (color: {})",
            issue.number, bucket.label, bucket.color
        );
    }

    Some(outcome)
}

fn remove_old_duration_labels(
    tracker: &dyn IssueTracker,
    issue: &Issue,
    config: &LabelerConfig,
    outcome: &mut IssueOutcome,
) {
    for name in issue.labels_with_prefix(DURATION_LABEL_PREFIX) {
        if config.dry_run {
            debug!(issue = issue.number, label = %name, "Would remove old label");
            outcome.removed.push(name.to_string());
            continue;
        }

        match tracker.remove_issue_label(issue.number, name) {
            Ok(()) => {
                debug!(issue = issue.number, label = %name, "Removed old label");
                outcome.removed.push(name.to_string());
            }
            Err(e) => outcome.warn(
                format!(
                    "Failed to remove old label from issue #{}: {}",
                    issue.number, e
                ),
                &e,
            ),
        }
    }
}

/// Create the label, falling back to a color update when it already exists
fn ensure_label_definition(
    tracker: &dyn IssueTracker,
    bucket: &DurationBucket,
    config: &LabelerConfig,
    outcome: &mut IssueOutcome,
) -> LabelDefinitionAction {
    let definition = bucket.definition();

    if config.dry_run {
        debug!(label = %definition.name, color = %definition.color, "Would create or update label");
        return LabelDefinitionAction::Planned;
    }

    match tracker.create_label(&definition) {
        Ok(()) => {
            debug!(label = %definition.name, "Created label");
            LabelDefinitionAction::Created
        }
        Err(e) if e.is_conflict() => match tracker.update_label(&definition) {
            Ok(()) => {
                debug!(label = %definition.name, "Label exists, updated color");
                LabelDefinitionAction::Updated
            }
            Err(e) => {
                outcome.warn(format!("Failed to update label: {}", e), &e);
                LabelDefinitionAction::Failed
            }
        },
        Err(e) => {
            outcome.warn(format!("Failed to create label: {}", e), &e);
            LabelDefinitionAction::Failed
        }
    }
}

fn attach_label(
    tracker: &dyn IssueTracker,
    issue: &Issue,
    bucket: &DurationBucket,
    config: &LabelerConfig,
    outcome: &mut IssueOutcome,
) -> bool {
    if config.dry_run {
        debug!(issue = issue.number, label = %bucket.label, "Would add label");
        return false;
    }

    match tracker.add_issue_labels(issue.number, std::slice::from_ref(&bucket.label)) {
        Ok(()) => true,
        Err(e) => {
            outcome.warn(
                format!("Failed to add label to issue #{}: {}", issue.number, e),
                &e,
            );
            false
        }
    }
}
