//! In-memory tracker and notifier doubles for engine tests.

use async_trait::async_trait;
use jackbot_core::{Assignee, BurndownReport, Issue, IssueKey, IssueStatus, IssueType, Sprint};
use jackbot_jira::{Result, Tracker, TrackerError};
use jackbot_slack::{Notifier, NotifierError};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

/// Build an issue projection for tests.
pub fn issue(key: &str, issue_type: IssueType, status: &str, sprint_id: Option<u64>) -> Issue {
    let category = if status == "Done" { "Done" } else { "To Do" };
    Issue {
        key: IssueKey::new(key),
        issue_type,
        status: IssueStatus::new(status, category),
        estimate: None,
        assignee: None,
        parent: None,
        sprint_id,
        subtasks: Vec::new(),
    }
}

/// Build a subtask projection for tests.
pub fn subtask(key: &str, parent: &str, status: &str, sprint_id: Option<u64>) -> Issue {
    let mut subtask = issue(key, IssueType::StoryTask, status, sprint_id);
    subtask.parent = Some(IssueKey::new(parent));
    subtask
}

/// Builder-style helpers on test issues.
pub trait IssueExt {
    /// Attach subtask keys.
    fn with_subtasks(self, keys: &[&str]) -> Issue;
    /// Attach an estimate.
    fn with_estimate(self, estimate: f64) -> Issue;
    /// Attach an assignee.
    fn with_assignee(self, name: &str) -> Issue;
}

impl IssueExt for Issue {
    fn with_subtasks(mut self, keys: &[&str]) -> Issue {
        self.subtasks = keys.iter().map(|k| IssueKey::new(*k)).collect();
        self
    }

    fn with_estimate(mut self, estimate: f64) -> Issue {
        self.estimate = Some(estimate);
        self
    }

    fn with_assignee(mut self, name: &str) -> Issue {
        self.assignee = Some(Assignee {
            account_id: "acct".to_owned(),
            display_name: name.to_owned(),
        });
        self
    }
}

/// In-memory tracker double. Writes are applied to the stored
/// projections and recorded for assertions.
#[derive(Default)]
pub struct MockTracker {
    issues: Mutex<BTreeMap<String, Issue>>,
    active_sprint: Mutex<Option<Sprint>>,
    failing: Mutex<HashSet<String>>,
    fetches: Mutex<Vec<String>>,
    transitions: Mutex<Vec<(String, String)>>,
    assignments: Mutex<Vec<(String, Option<String>)>>,
    estimate_writes: Mutex<Vec<(String, Option<f64>)>>,
}

impl MockTracker {
    /// Create a tracker holding the given issues.
    pub fn new(issues: Vec<Issue>) -> Self {
        let tracker = Self::default();
        *tracker.issues.lock().unwrap() = issues
            .into_iter()
            .map(|i| (i.key.to_string(), i))
            .collect();
        tracker
    }

    /// Set the active sprint returned by `get_active_sprint`.
    pub fn set_active_sprint(&self, sprint: Option<Sprint>) {
        *self.active_sprint.lock().unwrap() = sprint;
    }

    /// Make `get_issue` fail for a key with a server error.
    pub fn fail_issue(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_owned());
    }

    /// Current estimate of a stored issue.
    pub fn estimate_of(&self, key: &str) -> Option<f64> {
        self.issues.lock().unwrap().get(key).and_then(|i| i.estimate)
    }

    /// Keys fetched through `get_issue`, in call order.
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    /// Issued transitions, in call order.
    pub fn transitions(&self) -> Vec<(String, String)> {
        self.transitions.lock().unwrap().clone()
    }

    /// Assignment writes, in call order.
    pub fn assignments(&self) -> Vec<(String, Option<String>)> {
        self.assignments.lock().unwrap().clone()
    }

    /// Estimate writes, in call order.
    pub fn estimate_writes(&self) -> Vec<(String, Option<f64>)> {
        self.estimate_writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tracker for MockTracker {
    async fn get_issue(&self, key: &IssueKey) -> Result<Issue> {
        if self.failing.lock().unwrap().contains(key.as_str()) {
            return Err(TrackerError::Api {
                status: 500,
                body: "boom".to_owned(),
            });
        }
        self.fetches.lock().unwrap().push(key.to_string());
        self.issues
            .lock()
            .unwrap()
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| TrackerError::NotFound(key.to_string()))
    }

    async fn get_sprint_issues(&self, sprint_id: u64) -> Result<Vec<Issue>> {
        Ok(self
            .issues
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.sprint_id == Some(sprint_id))
            .cloned()
            .collect())
    }

    async fn get_active_sprint(&self) -> Result<Option<Sprint>> {
        Ok(self.active_sprint.lock().unwrap().clone())
    }

    async fn get_estimate(&self, key: &IssueKey) -> Result<Option<f64>> {
        self.issues
            .lock()
            .unwrap()
            .get(key.as_str())
            .map(|i| i.estimate)
            .ok_or_else(|| TrackerError::NotFound(key.to_string()))
    }

    async fn set_estimate(&self, key: &IssueKey, estimate: Option<f64>) -> Result<()> {
        self.estimate_writes
            .lock()
            .unwrap()
            .push((key.to_string(), estimate));
        if let Some(issue) = self.issues.lock().unwrap().get_mut(key.as_str()) {
            issue.estimate = estimate;
        }
        Ok(())
    }

    async fn transition_issue(&self, key: &IssueKey, transition: &str) -> Result<()> {
        self.transitions
            .lock()
            .unwrap()
            .push((key.to_string(), transition.to_owned()));
        if let Some(issue) = self.issues.lock().unwrap().get_mut(key.as_str()) {
            let category = if transition == "Done" { "Done" } else { "To Do" };
            issue.status = IssueStatus::new(transition, category);
        }
        Ok(())
    }

    async fn assign_issue(&self, key: &IssueKey, account_id: Option<&str>) -> Result<()> {
        self.assignments
            .lock()
            .unwrap()
            .push((key.to_string(), account_id.map(str::to_owned)));
        if let Some(issue) = self.issues.lock().unwrap().get_mut(key.as_str()) {
            issue.assignee = account_id.map(|id| Assignee {
                account_id: id.to_owned(),
                display_name: id.to_owned(),
            });
        }
        Ok(())
    }
}

/// Notifier double recording delivered reports.
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<BurndownReport>>,
}

impl MockNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports delivered so far.
    pub fn sent(&self) -> Vec<BurndownReport> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_burndown(
        &self,
        report: &BurndownReport,
    ) -> std::result::Result<(), NotifierError> {
        self.sent.lock().unwrap().push(report.clone());
        Ok(())
    }
}
