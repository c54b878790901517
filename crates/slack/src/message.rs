//! Block Kit burndown message builder.
//!
//! Pure transformation from a `BurndownReport` to the Slack message
//! body: a headline block, then one divider+section pair per non-empty
//! issue list.

use jackbot_core::{BotConfig, BucketIssue, BurndownReport};
use serde_json::{json, Value};

/// Build the full message for a burndown report.
pub fn build_message(report: &BurndownReport, config: &BotConfig) -> Value {
    let mut blocks = vec![headline_block(report, config)];
    if !report.no_subtasks.is_empty() {
        blocks.extend(issue_list_blocks(
            "These stories don't have any tasks, consider adding some",
            "*Stories:*",
            &report.no_subtasks,
            config,
        ));
    }
    if !report.estimates_missing.is_empty() {
        blocks.extend(issue_list_blocks(
            "These issues don't have an estimate, consider adding one",
            "*Issues:*",
            &report.estimates_missing,
            config,
        ));
    }
    if !report.large_estimates.is_empty() {
        blocks.extend(issue_list_blocks(
            "These tasks are pretty big, consider splitting them",
            "*Tasks:*",
            &report.large_estimates,
            config,
        ));
    }
    json!({ "blocks": blocks })
}

fn headline_block(report: &BurndownReport, config: &BotConfig) -> Value {
    json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": ":fire::fire::fire:BURNDOWN ALERT:fire::fire::fire:"
        },
        "fields": [
            {
                "type": "mrkdwn",
                "text": format!(
                    "*Sprint:*\n<{}|{}>",
                    config.board_url(),
                    report.sprint_name
                )
            },
            {
                "type": "mrkdwn",
                "text": format!("*Hours Remaining:*\n{}", report.hours_remaining)
            }
        ]
    })
}

fn issue_list_blocks(
    prompt: &str,
    field_header: &str,
    issues: &[BucketIssue],
    config: &BotConfig,
) -> Vec<Value> {
    let mut field_text = field_header.to_owned();
    for issue in issues {
        field_text.push_str(&format!(
            "\n<{}|:jira_{}: {}>",
            config.issue_url(issue.key.as_str()),
            issue.bucket.icon(),
            issue.key
        ));
        if let Some(assignee) = &issue.assignee {
            field_text.push_str(&format!("    ({assignee})"));
        }
    }

    vec![
        json!({ "type": "divider" }),
        json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": prompt },
            "fields": [{ "type": "mrkdwn", "text": field_text }]
        }),
    ]
}
