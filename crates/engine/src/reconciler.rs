//! Hierarchical estimate rollup and status derivation.

use jackbot_core::{derive_status, status_names, Issue, IssueKey, IssueType};
use jackbot_jira::{Result, Tracker, TrackerError};
use std::sync::Arc;
use tracing::debug;

/// Applies the estimate rollup and status state machine to every issue
/// affected by a change event.
///
/// Holds no state of its own; every pass fetches fresh projections from
/// the tracker.
pub struct Reconciler {
    tracker: Arc<dyn Tracker>,
}

impl Reconciler {
    /// Create a reconciler over a tracker.
    pub fn new(tracker: Arc<dyn Tracker>) -> Self {
        Self { tracker }
    }

    /// Reconcile the scope of effect of a changed issue: the active
    /// sprint when the issue is sprint-bound, otherwise the issue's
    /// rollup target in the backlog.
    pub async fn reconcile(&self, key: &IssueKey) -> Result<()> {
        let issue = match self.tracker.get_issue(key).await {
            Ok(issue) => issue,
            Err(TrackerError::NotFound(_)) => {
                // Deleted between the event firing and us processing it.
                debug!("issue {key} no longer exists, skipping");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        match issue.sprint_id {
            Some(sprint_id) => self.reconcile_sprint(sprint_id).await,
            None => self.reset_backlog_target(issue).await,
        }
    }

    async fn reconcile_sprint(&self, sprint_id: u64) -> Result<()> {
        let mut issues = self.tracker.get_sprint_issues(sprint_id).await?;

        // Sprint commitments are whole numbers.
        for issue in &mut issues {
            if let Some(estimate) = issue.estimate {
                let rounded = estimate.ceil();
                if rounded != estimate {
                    self.tracker.set_estimate(&issue.key, Some(rounded)).await?;
                    issue.estimate = Some(rounded);
                }
            }
        }

        for story in issues.iter().filter(|i| i.issue_type == IssueType::Story) {
            self.rollup_story(story).await?;
        }
        Ok(())
    }

    /// Derive a story's status and estimate from its unarchived
    /// subtasks, writing back only what actually changed.
    async fn rollup_story(&self, story: &Issue) -> Result<()> {
        let mut subtasks = Vec::with_capacity(story.subtasks.len());
        for key in &story.subtasks {
            let subtask = self.tracker.get_issue(key).await?;
            if !subtask.status.is_archived() {
                subtasks.push(subtask);
            }
        }

        let statuses: Vec<&str> = subtasks.iter().map(|s| s.status.name.as_str()).collect();
        if let Some(derived) = derive_status(&story.status.name, &statuses) {
            self.tracker
                .transition_issue(&story.key, derived.transition_name())
                .await?;
        }

        let rollup: f64 = subtasks.iter().filter_map(|s| s.estimate).sum();
        let current = self.tracker.get_estimate(&story.key).await?;
        if current != Some(rollup) {
            self.tracker.set_estimate(&story.key, Some(rollup)).await?;
        }
        Ok(())
    }

    /// Reset a backlog-bound issue (or, for a subtask, its parent):
    /// backlog issues hold no status progress, no assignee and no
    /// estimate. A present zero estimate still counts as present and is
    /// cleared.
    async fn reset_backlog_target(&self, issue: Issue) -> Result<()> {
        let target = match &issue.parent {
            Some(parent_key) => self.tracker.get_issue(parent_key).await?,
            None => issue,
        };

        if target.status.name != status_names::BACKLOG {
            self.tracker
                .transition_issue(&target.key, status_names::BACKLOG)
                .await?;
        }
        if target.assignee.is_some() {
            self.tracker.assign_issue(&target.key, None).await?;
        }
        if self.tracker.get_estimate(&target.key).await?.is_some() {
            self.tracker.set_estimate(&target.key, None).await?;
        }
        Ok(())
    }
}
