//! Burndown classification buckets and the report shape.

use crate::issue::{Issue, IssueKey, IssueType};
use serde::{Deserialize, Serialize};

/// Bucket a sprint issue lands in for burndown reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bucket {
    /// Story without any subtasks
    Story,
    /// Bug or critical
    Bug,
    /// Task or story task
    Task,
}

impl Bucket {
    /// Slack icon token suffix (`:jira_story:` etc).
    pub fn icon(self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Bug => "bug",
            Self::Task => "task",
        }
    }
}

/// A sprint issue tagged with its bucket, as rendered in notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketIssue {
    /// Issue key
    pub key: IssueKey,

    /// Classification bucket
    pub bucket: Bucket,

    /// Assignee display name, if assigned
    pub assignee: Option<String>,
}

impl BucketIssue {
    /// Tag an issue with a bucket.
    pub fn new(issue: &Issue, bucket: Bucket) -> Self {
        Self {
            key: issue.key.clone(),
            bucket,
            assignee: issue.assignee_name().map(str::to_owned),
        }
    }
}

/// Classify a non-Done sprint issue into its burndown bucket.
///
/// Stories that already have subtasks are excluded entirely: their
/// effort is carried by the subtasks. Issue types outside the burndown
/// domain are excluded as well.
pub fn classify_issue(issue: &Issue) -> Option<Bucket> {
    match issue.issue_type {
        IssueType::Story => {
            if issue.subtasks.is_empty() {
                Some(Bucket::Story)
            } else {
                None
            }
        }
        IssueType::Bug | IssueType::Critical => Some(Bucket::Bug),
        IssueType::Task | IssueType::StoryTask => Some(Bucket::Task),
        IssueType::Other(_) => None,
    }
}

/// Aggregated burndown figures for one sprint, handed to the
/// notification builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurndownReport {
    /// Sprint name
    pub sprint_name: String,

    /// Total remaining hours over bug/task issues, truncated
    pub hours_remaining: i64,

    /// Stories that have no subtasks yet
    pub no_subtasks: Vec<BucketIssue>,

    /// Bug/task issues lacking an estimate
    pub estimates_missing: Vec<BucketIssue>,

    /// Tasks whose estimate exceeds the configured threshold
    pub large_estimates: Vec<BucketIssue>,
}
