use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracker_core::IssueTracker;

use crate::classify::classify;
use crate::config::{LabelerConfig, Repository};
use crate::enumerate::fetch_issues;
use crate::reconcile::{reconcile_issue, IssueOutcome};

/// Values shared by every operation in a run
#[derive(Debug, Clone)]
pub struct RunContext {
    pub repository: Repository,
    /// Instant open issues are aged against
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub repository: Repository,
    pub evaluated_at: DateTime<Utc>,
    pub dry_run: bool,
    pub issues_found: usize,
    pub pull_requests_skipped: usize,
    pub issues_labeled: usize,
    pub warnings: usize,
    pub outcomes: Vec<IssueOutcome>,
}

/// Label every matching issue of the repository.
///
/// Only enumeration failures are fatal; per-issue failures end up as
/// warnings in the summary.
pub fn run(
    tracker: &dyn IssueTracker,
    config: &LabelerConfig,
    ctx: &RunContext,
) -> Result<RunSummary> {
    if config.thresholds.short >= config.thresholds.medium {
        warn!(
            "short_threshold ({}) is not below medium_threshold ({}); the medium tier is unreachable",
            config.thresholds.short, config.thresholds.medium
        );
    }

    let issues = fetch_issues(tracker, config)
        .with_context(|| format!("Failed to fetch issues for {}", ctx.repository))?;
    let issues_found = issues.len();

    let mut pull_requests_skipped = 0;
    let mut outcomes = Vec::with_capacity(issues.len());

    for issue in &issues {
        if config.skip_pull_requests && issue.is_pull_request {
            debug!(issue = issue.number, "Skipping pull request");
            pull_requests_skipped += 1;
            continue;
        }

        let bucket = classify(issue, config, ctx.now);
        if let Some(outcome) = reconcile_issue(tracker, issue, &bucket, config) {
            outcomes.push(outcome);
        }
    }

    let warnings = outcomes.iter().map(|o| o.warnings.len()).sum();
    let issues_labeled = outcomes.iter().filter(|o| o.attached).count();

    if warnings > 0 {
        warn!("Finished with {} warning(s)", warnings);
    }
    info!(
        "Processed {} issue(s) in {}, labeled {}",
        outcomes.len(),
        ctx.repository,
        issues_labeled
    );

    Ok(RunSummary {
        repository: ctx.repository.clone(),
        evaluated_at: ctx.now,
        dry_run: config.dry_run,
        issues_found,
        pull_requests_skipped,
        issues_labeled,
        warnings,
        outcomes,
    })
}
