//! Age bucketing of issues

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracker_core::{Issue, LabelDefinition};

use crate::config::LabelerConfig;

/// Marks the labels this tool owns
pub const DURATION_LABEL_PREFIX: &str = "Duration:";

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Short,
    Medium,
    Long,
}

/// The duration label an issue should carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationBucket {
    pub tier: Tier,
    pub label: String,
    pub color: String,
}

impl DurationBucket {
    pub fn definition(&self) -> LabelDefinition {
        LabelDefinition::new(self.label.clone(), self.color.clone())
    }
}

/// Whole days between `created` and `end`, rounded up.
///
/// Any positive fraction of a day counts as a full day.
pub fn age_in_days(created: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - created).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

/// Classify an issue by how long it was open, measured up to its close time
/// or to `now` while it is still open.
pub fn classify(issue: &Issue, config: &LabelerConfig, now: DateTime<Utc>) -> DurationBucket {
    let end = issue.closed.unwrap_or(now);
    bucket_for_age(age_in_days(issue.created, end), config)
}

/// Map an age in days onto the configured tiers. Thresholds are inclusive.
pub fn bucket_for_age(age_days: i64, config: &LabelerConfig) -> DurationBucket {
    let short = config.thresholds.short;
    let medium = config.thresholds.medium;

    if age_days <= short {
        DurationBucket {
            tier: Tier::Short,
            label: format!("{} 1-{} days", DURATION_LABEL_PREFIX, short),
            color: config.colors.short.clone(),
        }
    } else if age_days <= medium {
        DurationBucket {
            tier: Tier::Medium,
            label: format!(
                "{} {}-{} days",
                DURATION_LABEL_PREFIX,
                short.saturating_add(1),
                medium
            ),
            color: config.colors.medium.clone(),
        }
    } else {
        DurationBucket {
            tier: Tier::Long,
            label: format!("{} >1 month", DURATION_LABEL_PREFIX),
            color: config.colors.long.clone(),
        }
    }
}
