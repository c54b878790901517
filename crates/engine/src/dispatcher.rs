//! Event queue and the single-consumer dispatcher.

use crate::reconciler::Reconciler;
use crate::reporter::Reporter;
use jackbot_core::{BotConfig, QueuedEvent, WebhookEvent};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Producer side of the event pipeline. `enqueue` never blocks, so the
/// webhook receiver can call it from its request-handling context.
#[derive(Clone)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<QueuedEvent>,
}

impl EventQueue {
    /// Create the queue, returning the producer handle and the receiver
    /// the dispatcher consumes.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<QueuedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Push a raw webhook payload. Fire and forget.
    pub fn enqueue(&self, payload: Value) {
        let _ = self.tx.send(QueuedEvent::Payload(payload));
    }

    /// Push the shutdown sentinel; the dispatcher exits once it reaches
    /// the front of the queue.
    pub fn shutdown(&self) {
        let _ = self.tx.send(QueuedEvent::Shutdown);
    }
}

/// The single event consumer. Pulls events strictly in arrival order
/// and fully processes one before dequeuing the next, so reconciliation
/// passes never overlap.
pub struct Dispatcher {
    config: BotConfig,
    reconciler: Reconciler,
    reporter: Arc<Reporter>,
    rx: mpsc::UnboundedReceiver<QueuedEvent>,
}

impl Dispatcher {
    /// Create a dispatcher draining the given receiver.
    pub fn new(
        config: BotConfig,
        reconciler: Reconciler,
        reporter: Arc<Reporter>,
        rx: mpsc::UnboundedReceiver<QueuedEvent>,
    ) -> Self {
        Self {
            config,
            reconciler,
            reporter,
            rx,
        }
    }

    /// Consume events until the shutdown sentinel (or the queue is
    /// dropped). A failed pass is logged and the loop continues.
    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            match event {
                QueuedEvent::Shutdown => break,
                QueuedEvent::Payload(payload) => self.handle(payload).await,
            }
        }
        info!("event consumer stopped");
    }

    async fn handle(&self, payload: Value) {
        match WebhookEvent::classify(&payload) {
            Some(WebhookEvent::IssueChanged { key, project_key }) => {
                if project_key != self.config.project_key {
                    debug!("ignoring issue event for project {project_key}");
                    return;
                }
                if let Err(e) = self.reconciler.reconcile(&key).await {
                    error!("reconciliation of {key} failed: {e}");
                }
            }
            Some(WebhookEvent::SprintStarted {
                sprint_id,
                name,
                origin_board_id,
            }) => {
                if origin_board_id != self.config.board_id {
                    debug!("ignoring sprint event for board {origin_board_id}");
                    return;
                }
                if let Err(e) = self.reporter.report(sprint_id, &name).await {
                    error!("burndown report for sprint {sprint_id} failed: {e}");
                }
            }
            None => debug!("discarding unrecognized event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{issue, MockNotifier, MockTracker};
    use jackbot_core::IssueType;
    use serde_json::json;

    fn issue_payload(key: &str, project: &str) -> Value {
        json!({
            "webhookEvent": "jira:issue_updated",
            "issue": {
                "key": key,
                "fields": { "project": { "key": project } }
            }
        })
    }

    fn sprint_payload(id: u64, name: &str, board: u64) -> Value {
        json!({
            "webhookEvent": "sprint_started",
            "sprint": { "id": id, "name": name, "originBoardId": board }
        })
    }

    fn dispatcher(tracker: Arc<MockTracker>, notifier: Arc<MockNotifier>) -> (EventQueue, Dispatcher) {
        let config = BotConfig {
            live: false,
            ..BotConfig::default()
        };
        let (queue, rx) = EventQueue::new();
        let reconciler = Reconciler::new(tracker.clone());
        let reporter = Arc::new(Reporter::new(tracker, notifier, config.clone()));
        (queue, Dispatcher::new(config, reconciler, reporter, rx))
    }

    #[tokio::test]
    async fn issue_events_reach_the_reconciler_in_order() {
        let tracker = Arc::new(MockTracker::new(vec![
            issue("EDU-1", IssueType::Story, "Backlog", None),
            issue("EDU-2", IssueType::Story, "Backlog", None),
        ]));
        let (queue, dispatcher) = dispatcher(tracker.clone(), Arc::new(MockNotifier::new()));

        queue.enqueue(issue_payload("EDU-1", "EDU"));
        queue.enqueue(issue_payload("EDU-2", "EDU"));
        queue.shutdown();
        dispatcher.run().await;

        assert_eq!(tracker.fetches(), vec!["EDU-1".to_owned(), "EDU-2".to_owned()]);
    }

    #[tokio::test]
    async fn foreign_project_events_are_skipped() {
        let tracker = Arc::new(MockTracker::new(vec![]));
        let (queue, dispatcher) = dispatcher(tracker.clone(), Arc::new(MockNotifier::new()));

        queue.enqueue(issue_payload("OPS-1", "OPS"));
        queue.shutdown();
        dispatcher.run().await;

        assert!(tracker.fetches().is_empty());
    }

    #[tokio::test]
    async fn sprint_started_triggers_a_report() {
        let tracker = Arc::new(MockTracker::new(vec![]));
        let notifier = Arc::new(MockNotifier::new());
        let (queue, dispatcher) = dispatcher(tracker, notifier.clone());

        queue.enqueue(sprint_payload(1, "TEST Sprint", 17));
        queue.shutdown();
        dispatcher.run().await;

        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn foreign_board_sprints_are_skipped() {
        let tracker = Arc::new(MockTracker::new(vec![]));
        let notifier = Arc::new(MockNotifier::new());
        let (queue, dispatcher) = dispatcher(tracker, notifier.clone());

        queue.enqueue(sprint_payload(1, "TEST Sprint", 99));
        queue.shutdown();
        dispatcher.run().await;

        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn unrecognized_payloads_are_discarded_silently() {
        let tracker = Arc::new(MockTracker::new(vec![]));
        let (queue, dispatcher) = dispatcher(tracker.clone(), Arc::new(MockNotifier::new()));

        queue.enqueue(json!({ "key": "value" }));
        queue.shutdown();
        dispatcher.run().await;

        assert!(tracker.fetches().is_empty());
    }

    #[tokio::test]
    async fn a_failing_pass_does_not_stop_the_consumer() {
        let tracker = Arc::new(MockTracker::new(vec![issue(
            "EDU-2",
            IssueType::Story,
            "Backlog",
            None,
        )]));
        tracker.fail_issue("EDU-1");
        let (queue, dispatcher) = dispatcher(tracker.clone(), Arc::new(MockNotifier::new()));

        queue.enqueue(issue_payload("EDU-1", "EDU"));
        queue.enqueue(issue_payload("EDU-2", "EDU"));
        queue.shutdown();
        dispatcher.run().await;

        assert_eq!(tracker.fetches(), vec!["EDU-2".to_owned()]);
    }

    #[tokio::test]
    async fn queue_drop_also_terminates_the_consumer() {
        let tracker = Arc::new(MockTracker::new(vec![]));
        let (queue, dispatcher) = dispatcher(tracker, Arc::new(MockNotifier::new()));

        drop(queue);
        dispatcher.run().await;
    }
}
