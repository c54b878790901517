//! JackBot core data models.
//!
//! This crate defines the projections of Jira state the reconciliation
//! engine operates on, plus the pure decision logic: webhook event
//! classification, the story status state machine, and the burndown
//! classification buckets.

#![warn(missing_docs)]

// Tracker projections
mod issue;
mod sprint;

// Inbound events
mod event;

// Decision logic
mod status;
mod report;

// Runtime knobs
mod config;

pub use issue::{Assignee, Issue, IssueKey, IssueStatus, IssueType};
pub use sprint::Sprint;

pub use event::{QueuedEvent, WebhookEvent};

pub use status::{derive_status, names as status_names, DerivedStatus};
pub use report::{classify_issue, Bucket, BucketIssue, BurndownReport};

pub use config::BotConfig;
