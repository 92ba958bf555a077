//! In-memory issue tracker for testing
//!
//! This crate provides an implementation of the `IssueTracker` trait that keeps
//! issues and label definitions in memory instead of making HTTP requests. It's
//! designed for:
//!
//! 1. **Reconciliation tests**: Inspect the label state an issue ends up in
//! 2. **Call assertions**: Every request is recorded in order
//! 3. **Failure injection**: Make individual operations fail deterministically
//!
//! # Usage
//!
//! ```
//! use tracker_core::{IssueTracker, LabelDefinition, TrackerError};
//! use tracker_mock::{MockTracker, Operation};
//!
//! let tracker = MockTracker::new()
//!     .with_label(LabelDefinition::new("Duration: 1-7 days", "00FF00"))
//!     .failing(Operation::UpdateLabel, None, || TrackerError::Unauthorized);
//!
//! assert!(tracker.update_label(&LabelDefinition::new("Duration: 1-7 days", "123456")).is_err());
//! ```

mod client;

pub use client::{Call, FailureRule, MockTracker, Operation};
