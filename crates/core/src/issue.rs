//! Issue projection - the unit of tracker state the engine reconciles.

use serde::{Deserialize, Serialize};

/// Issue key, e.g. "EDU-42".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueKey(pub String);

impl IssueKey {
    /// Create a key from anything string-like.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for IssueKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Issue type as configured on the Jira project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    /// Parent-level issue that may own subtasks
    Story,
    /// Subtask of a story ("Story Task" in Jira)
    StoryTask,
    /// Standalone task
    Task,
    /// Bug
    Bug,
    /// Critical bug
    Critical,
    /// Anything else the project defines
    Other(String),
}

impl IssueType {
    /// Parse from the Jira issue-type name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Story" => Self::Story,
            "Story Task" => Self::StoryTask,
            "Task" => Self::Task,
            "Bug" => Self::Bug,
            "Critical" => Self::Critical,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Granular status name plus the coarse Jira status-category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatus {
    /// Status name, e.g. "In Progress"
    pub name: String,

    /// Status-category name, e.g. "Done"
    pub category: String,
}

/// Statuses that withdraw a subtask from its parent's rollup.
const ARCHIVED_STATUSES: [&str; 2] = ["Archived", "Won't Do"];

impl IssueStatus {
    /// Create a status from name and category.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }

    /// True when the issue has been archived/withdrawn.
    pub fn is_archived(&self) -> bool {
        ARCHIVED_STATUSES
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&self.name))
    }

    /// True when the status-category is "Done".
    pub fn is_done_category(&self) -> bool {
        self.category == "Done"
    }
}

/// Issue assignee identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// Jira account id
    pub account_id: String,

    /// Human-readable name
    pub display_name: String,
}

/// Projection of a Jira issue, fetched fresh on every reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue key
    pub key: IssueKey,

    /// Issue type
    pub issue_type: IssueType,

    /// Current status
    pub status: IssueStatus,

    /// Estimate in hours; may be fractional on input, absent in the backlog
    pub estimate: Option<f64>,

    /// Current assignee
    pub assignee: Option<Assignee>,

    /// Parent story key (subtasks only)
    pub parent: Option<IssueKey>,

    /// Id of the sprint the issue belongs to, if any
    pub sprint_id: Option<u64>,

    /// Keys of child subtasks (only stories have children)
    pub subtasks: Vec<IssueKey>,
}

impl Issue {
    /// True when the issue is a child of a story.
    pub fn is_subtask(&self) -> bool {
        self.parent.is_some()
    }

    /// True when the issue belongs to some sprint.
    pub fn is_sprint_bound(&self) -> bool {
        self.sprint_id.is_some()
    }

    /// Assignee display name, if assigned.
    pub fn assignee_name(&self) -> Option<&str> {
        self.assignee.as_ref().map(|a| a.display_name.as_str())
    }
}
