//! Tracker trait abstraction.

use async_trait::async_trait;
use jackbot_core::{Issue, IssueKey, Sprint};

/// Error type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur talking to the issue tracker.
///
/// `NotFound` is distinguished because the reconciler treats a deleted
/// issue as benign; every other variant propagates.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The requested entity does not exist (or no longer exists)
    #[error("not found: {0}")]
    NotFound(String),

    /// The tracker rejected the call
    #[error("tracker API error (status {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, for the host's error channel
        body: String,
    },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response document did not have the expected shape
    #[error("malformed tracker response: {0}")]
    Malformed(String),

    /// No transition with the requested name is available on the issue
    #[error("transition '{name}' not available on {issue}")]
    TransitionNotFound {
        /// Issue key
        issue: String,
        /// Requested transition name
        name: String,
    },
}

/// Tracker abstraction consumed by the engine.
///
/// This trait is the seam that lets the reconciler and reporter be
/// tested without a live Jira instance.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Fetch an issue projection by key.
    async fn get_issue(&self, key: &IssueKey) -> Result<Issue>;

    /// Fetch all issues in a sprint.
    async fn get_sprint_issues(&self, sprint_id: u64) -> Result<Vec<Issue>>;

    /// Fetch the currently active sprint on the configured board.
    async fn get_active_sprint(&self) -> Result<Option<Sprint>>;

    /// Fetch an issue's estimate.
    async fn get_estimate(&self, key: &IssueKey) -> Result<Option<f64>>;

    /// Set (or clear, with `None`) an issue's estimate.
    async fn set_estimate(&self, key: &IssueKey, estimate: Option<f64>) -> Result<()>;

    /// Move an issue through the named workflow transition.
    async fn transition_issue(&self, key: &IssueKey, transition: &str) -> Result<()>;

    /// Set (or clear, with `None`) an issue's assignee.
    async fn assign_issue(&self, key: &IssueKey, account_id: Option<&str>) -> Result<()>;
}
