//! Mapping from Jira REST documents to core projections.

use crate::trait_::{Result, TrackerError};
use jackbot_core::{Assignee, Issue, IssueKey, IssueStatus, IssueType, Sprint};
use serde_json::Value;

fn malformed(what: &str) -> TrackerError {
    TrackerError::Malformed(what.to_owned())
}

/// Project an agile-API issue document onto the core `Issue` shape.
///
/// The estimate lives in a board-configured custom field, so its field
/// id is passed in rather than hard-coded.
pub(crate) fn parse_issue(doc: &Value, estimate_field: &str) -> Result<Issue> {
    let key = doc
        .get("key")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("issue key"))?;
    let fields = doc.get("fields").ok_or_else(|| malformed("issue fields"))?;

    let type_name = fields
        .pointer("/issuetype/name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("issue type"))?;
    let status_name = fields
        .pointer("/status/name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("issue status"))?;
    let status_category = fields
        .pointer("/status/statusCategory/name")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let assignee = fields.get("assignee").filter(|a| !a.is_null()).map(|a| Assignee {
        account_id: a
            .get("accountId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        display_name: a
            .get("displayName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
    });

    let subtasks = fields
        .get("subtasks")
        .and_then(Value::as_array)
        .map(|subtasks| {
            subtasks
                .iter()
                .filter_map(|s| s.get("key").and_then(Value::as_str))
                .map(IssueKey::new)
                .collect()
        })
        .unwrap_or_default();

    Ok(Issue {
        key: IssueKey::new(key),
        issue_type: IssueType::from_name(type_name),
        status: IssueStatus::new(status_name, status_category),
        estimate: fields.get(estimate_field).and_then(Value::as_f64),
        assignee,
        parent: fields
            .pointer("/parent/key")
            .and_then(Value::as_str)
            .map(IssueKey::new),
        sprint_id: fields.pointer("/sprint/id").and_then(Value::as_u64),
        subtasks,
    })
}

/// Project a board-API sprint entry onto the core `Sprint` shape.
pub(crate) fn parse_sprint(doc: &Value) -> Result<Sprint> {
    Ok(Sprint {
        id: doc
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| malformed("sprint id"))?,
        name: doc
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("sprint name"))?
            .to_owned(),
        origin_board_id: doc
            .get("originBoardId")
            .and_then(Value::as_u64)
            .unwrap_or_default(),
        active: doc.get("state").and_then(Value::as_str) == Some("active"),
    })
}
