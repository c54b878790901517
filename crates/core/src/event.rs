//! Webhook event classification.

use crate::issue::IssueKey;
use serde_json::Value;

/// Item carried on the engine's event queue.
///
/// `Shutdown` is the poison pill: it is never produced by
/// classification and is the only thing that terminates the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum QueuedEvent {
    /// Raw webhook body, classified by the dispatcher
    Payload(Value),

    /// Cooperative shutdown sentinel
    Shutdown,
}

/// A recognized change notification.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    /// An issue was created, updated or deleted
    IssueChanged {
        /// Key of the changed issue
        key: IssueKey,
        /// Project the issue belongs to
        project_key: String,
    },

    /// A sprint entered its active state
    SprintStarted {
        /// Sprint id
        sprint_id: u64,
        /// Sprint name
        name: String,
        /// Board the sprint was created on
        origin_board_id: u64,
    },
}

impl WebhookEvent {
    /// Classify a raw webhook payload.
    ///
    /// A payload carrying an `issue` object is an issue-changed event; a
    /// payload carrying a `sprint` object together with the
    /// `sprint_started` marker is a sprint-started event. Anything else
    /// is unrecognized and returns `None`.
    pub fn classify(payload: &Value) -> Option<Self> {
        if let Some(issue) = payload.get("issue") {
            let key = issue.get("key")?.as_str()?;
            let project_key = issue
                .pointer("/fields/project/key")?
                .as_str()?;
            return Some(Self::IssueChanged {
                key: IssueKey::new(key),
                project_key: project_key.to_owned(),
            });
        }

        if let Some(sprint) = payload.get("sprint") {
            if payload.get("webhookEvent").and_then(Value::as_str) != Some("sprint_started") {
                return None;
            }
            return Some(Self::SprintStarted {
                sprint_id: sprint.get("id")?.as_u64()?,
                name: sprint.get("name")?.as_str()?.to_owned(),
                origin_board_id: sprint.get("originBoardId")?.as_u64()?,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn issue_payload_is_classified() {
        let payload = json!({
            "webhookEvent": "jira:issue_updated",
            "issue": {
                "key": "EDU-7",
                "fields": {
                    "project": { "key": "EDU" }
                }
            }
        });
        assert_eq!(
            WebhookEvent::classify(&payload),
            Some(WebhookEvent::IssueChanged {
                key: IssueKey::new("EDU-7"),
                project_key: "EDU".to_owned(),
            })
        );
    }

    #[test]
    fn sprint_started_payload_is_classified() {
        let payload = json!({
            "webhookEvent": "sprint_started",
            "sprint": {
                "id": 3,
                "name": "Sprint 12",
                "originBoardId": 17
            }
        });
        assert_eq!(
            WebhookEvent::classify(&payload),
            Some(WebhookEvent::SprintStarted {
                sprint_id: 3,
                name: "Sprint 12".to_owned(),
                origin_board_id: 17,
            })
        );
    }

    #[test]
    fn sprint_payload_without_started_marker_is_discarded() {
        let payload = json!({
            "webhookEvent": "sprint_closed",
            "sprint": { "id": 3, "name": "Sprint 12", "originBoardId": 17 }
        });
        assert_eq!(WebhookEvent::classify(&payload), None);
    }

    #[test]
    fn unrecognized_payload_is_discarded() {
        assert_eq!(WebhookEvent::classify(&json!({ "key": "value" })), None);
        assert_eq!(WebhookEvent::classify(&json!(null)), None);
    }

    #[test]
    fn issue_payload_missing_fields_is_discarded() {
        let payload = json!({ "issue": { "id": 10002 } });
        assert_eq!(WebhookEvent::classify(&payload), None);
    }
}
