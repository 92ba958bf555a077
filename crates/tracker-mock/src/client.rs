//! Mock tracker implementing IssueTracker trait
//!
//! Holds issues and repository labels in memory and mimics the GitHub
//! semantics the labeler relies on.

use std::collections::BTreeMap;
use std::sync::Mutex;
use tracker_core::{
    Issue, IssueFilter, IssueState, IssueTracker, LabelDefinition, Result, TrackerError,
};

/// Color GitHub assigns to labels created implicitly by adding them to an issue
const IMPLICIT_LABEL_COLOR: &str = "ededed";

/// Tracker operations that can be recorded or made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListIssues,
    RemoveIssueLabel,
    AddIssueLabels,
    CreateLabel,
    UpdateLabel,
}

/// A single recorded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListIssues { page: usize, per_page: usize },
    RemoveIssueLabel { number: u64, name: String },
    AddIssueLabels { number: u64, names: Vec<String> },
    CreateLabel(LabelDefinition),
    UpdateLabel(LabelDefinition),
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::ListIssues { .. } => Operation::ListIssues,
            Call::RemoveIssueLabel { .. } => Operation::RemoveIssueLabel,
            Call::AddIssueLabels { .. } => Operation::AddIssueLabels,
            Call::CreateLabel(_) => Operation::CreateLabel,
            Call::UpdateLabel(_) => Operation::UpdateLabel,
        }
    }
}

/// Makes an operation fail, optionally only for one label name
#[derive(Clone)]
pub struct FailureRule {
    pub operation: Operation,
    /// Label name the rule applies to; `None` matches every call
    pub label: Option<String>,
    pub error: fn() -> TrackerError,
}

#[derive(Default)]
struct State {
    issues: BTreeMap<u64, Issue>,
    labels: BTreeMap<String, String>,
    calls: Vec<Call>,
}

/// An in-memory tracker
#[derive(Default)]
pub struct MockTracker {
    state: Mutex<State>,
    failures: Vec<FailureRule>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issue; labels it carries are registered as repository labels
    pub fn with_issue(self, issue: Issue) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for name in &issue.labels {
                state
                    .labels
                    .entry(name.clone())
                    .or_insert_with(|| IMPLICIT_LABEL_COLOR.to_string());
            }
            state.issues.insert(issue.number, issue);
        }
        self
    }

    /// Define a repository label
    pub fn with_label(self, label: LabelDefinition) -> Self {
        self.state
            .lock()
            .unwrap()
            .labels
            .insert(label.name, label.color);
        self
    }

    /// Make `operation` fail with `error`, for every call or only for `label`
    pub fn failing(
        mut self,
        operation: Operation,
        label: Option<&str>,
        error: fn() -> TrackerError,
    ) -> Self {
        self.failures.push(FailureRule {
            operation,
            label: label.map(String::from),
            error,
        });
        self
    }

    /// Current state of an issue
    pub fn issue(&self, number: u64) -> Option<Issue> {
        self.state.lock().unwrap().issues.get(&number).cloned()
    }

    /// Color of a repository label
    pub fn label_color(&self, name: &str) -> Option<String> {
        self.state.lock().unwrap().labels.get(name).cloned()
    }

    /// Every request received so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Requests received for one operation
    pub fn calls_for(&self, operation: Operation) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation() == operation)
            .collect()
    }

    /// Forget recorded calls, keeping issues and labels
    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn check_failure(&self, operation: Operation, label: Option<&str>) -> Result<()> {
        let rule = self.failures.iter().find(|rule| {
            rule.operation == operation
                && match (&rule.label, label) {
                    (None, _) => true,
                    (Some(expected), Some(actual)) => expected == actual,
                    (Some(_), None) => false,
                }
        });

        match rule {
            Some(rule) => Err((rule.error)()),
            None => Ok(()),
        }
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn matches_filter(issue: &Issue, filter: &IssueFilter) -> bool {
    let state_matches = match filter.state {
        IssueState::Open => !issue.is_closed(),
        IssueState::Closed => issue.is_closed(),
        IssueState::All => true,
    };

    // GitHub treats a comma-separated label filter as "has all of these"
    let labels_match = filter.labels.as_deref().map_or(true, |labels| {
        labels
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .all(|wanted| issue.labels.iter().any(|l| l == wanted))
    });

    state_matches && labels_match
}

impl IssueTracker for MockTracker {
    fn list_issues(&self, filter: &IssueFilter, per_page: usize, page: usize) -> Result<Vec<Issue>> {
        self.record(Call::ListIssues { page, per_page });
        self.check_failure(Operation::ListIssues, None)?;

        let state = self.state.lock().unwrap();
        Ok(state
            .issues
            .values()
            .filter(|issue| matches_filter(issue, filter))
            .skip(page.saturating_sub(1) * per_page)
            .take(per_page)
            .cloned()
            .collect())
    }

    fn remove_issue_label(&self, number: u64, name: &str) -> Result<()> {
        self.record(Call::RemoveIssueLabel {
            number,
            name: name.to_string(),
        });
        self.check_failure(Operation::RemoveIssueLabel, Some(name))?;

        let mut state = self.state.lock().unwrap();
        let issue = state
            .issues
            .get_mut(&number)
            .ok_or_else(|| TrackerError::NotFound(format!("issue #{}", number)))?;

        let before = issue.labels.len();
        issue.labels.retain(|l| l != name);
        if issue.labels.len() == before {
            return Err(TrackerError::NotFound("Label does not exist".to_string()));
        }
        Ok(())
    }

    fn add_issue_labels(&self, number: u64, names: &[String]) -> Result<()> {
        self.record(Call::AddIssueLabels {
            number,
            names: names.to_vec(),
        });
        for name in names {
            self.check_failure(Operation::AddIssueLabels, Some(name))?;
        }

        let mut state = self.state.lock().unwrap();
        if !state.issues.contains_key(&number) {
            return Err(TrackerError::NotFound(format!("issue #{}", number)));
        }

        for name in names {
            state
                .labels
                .entry(name.clone())
                .or_insert_with(|| IMPLICIT_LABEL_COLOR.to_string());
        }

        if let Some(issue) = state.issues.get_mut(&number) {
            for name in names {
                if !issue.labels.contains(name) {
                    issue.labels.push(name.clone());
                }
            }
        }
        Ok(())
    }

    fn create_label(&self, label: &LabelDefinition) -> Result<()> {
        self.record(Call::CreateLabel(label.clone()));
        self.check_failure(Operation::CreateLabel, Some(&label.name))?;

        let mut state = self.state.lock().unwrap();
        if state.labels.contains_key(&label.name) {
            return Err(TrackerError::AlreadyExists(label.name.clone()));
        }
        state.labels.insert(label.name.clone(), label.color.clone());
        Ok(())
    }

    fn update_label(&self, label: &LabelDefinition) -> Result<()> {
        self.record(Call::UpdateLabel(label.clone()));
        self.check_failure(Operation::UpdateLabel, Some(&label.name))?;

        let mut state = self.state.lock().unwrap();
        match state.labels.get_mut(&label.name) {
            Some(color) => {
                *color = label.color.clone();
                Ok(())
            }
            None => Err(TrackerError::NotFound(format!("label '{}'", label.name))),
        }
    }
}
