//! Sprint burndown classification and aggregation.

use crate::error::EngineError;
use jackbot_core::{classify_issue, BotConfig, Bucket, BucketIssue, BurndownReport};
use jackbot_jira::Tracker;
use jackbot_slack::Notifier;
use std::sync::Arc;
use tracing::debug;

/// Partitions a sprint's open issues into burndown buckets, sums the
/// remaining effort and hands the result to the notifier.
///
/// Read-then-compute with no shared mutable state, so the dispatcher
/// and the scheduler may both invoke it concurrently.
pub struct Reporter {
    tracker: Arc<dyn Tracker>,
    notifier: Arc<dyn Notifier>,
    config: BotConfig,
}

impl Reporter {
    /// Create a reporter over a tracker and notifier.
    pub fn new(tracker: Arc<dyn Tracker>, notifier: Arc<dyn Notifier>, config: BotConfig) -> Self {
        Self {
            tracker,
            notifier,
            config,
        }
    }

    /// Build and send the burndown report for a sprint. The report is
    /// sent even when every list is empty; only the live/test guard
    /// suppresses it.
    pub async fn report(&self, sprint_id: u64, sprint_name: &str) -> Result<(), EngineError> {
        if !self.config.sprint_in_scope(sprint_name) {
            debug!("sprint '{sprint_name}' out of scope for this deployment, skipping");
            return Ok(());
        }

        let issues = self.tracker.get_sprint_issues(sprint_id).await?;

        let mut no_subtasks = Vec::new();
        let mut bugs = Vec::new();
        let mut tasks = Vec::new();
        for issue in issues.iter().filter(|i| !i.status.is_done_category()) {
            match classify_issue(issue) {
                Some(Bucket::Story) => no_subtasks.push(BucketIssue::new(issue, Bucket::Story)),
                Some(Bucket::Bug) => bugs.push(BucketIssue::new(issue, Bucket::Bug)),
                Some(Bucket::Task) => tasks.push(BucketIssue::new(issue, Bucket::Task)),
                None => {}
            }
        }

        let mut burndown = 0.0;
        let mut estimates_missing = Vec::new();
        let mut large_estimates = Vec::new();
        for issue in bugs.iter().chain(tasks.iter()) {
            match self.tracker.get_estimate(&issue.key).await? {
                None => estimates_missing.push(issue.clone()),
                Some(estimate) => {
                    burndown += estimate;
                    if issue.bucket == Bucket::Task && estimate > self.config.large_estimate_threshold
                    {
                        large_estimates.push(issue.clone());
                    }
                }
            }
        }

        let report = BurndownReport {
            sprint_name: sprint_name.to_owned(),
            hours_remaining: burndown as i64,
            no_subtasks,
            estimates_missing,
            large_estimates,
        };
        self.notifier.send_burndown(&report).await?;
        Ok(())
    }
}
