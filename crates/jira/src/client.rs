//! Jira REST client.

use crate::parse::{parse_issue, parse_sprint};
use crate::trait_::{Result, Tracker, TrackerError};
use async_trait::async_trait;
use jackbot_core::{Issue, IssueKey, Sprint};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

/// Connection settings for a Jira site.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// Server base URL, e.g. "https://moblab.atlassian.net"
    pub server: String,

    /// Account email for basic auth
    pub email: String,

    /// API token paired with the email
    pub api_token: String,

    /// Board whose estimation field and sprints are used
    pub board_id: u64,

    /// Custom field id the board stores estimates in
    pub estimate_field: String,
}

/// Tracker implementation backed by the Jira agile + v3 REST APIs.
#[derive(Clone)]
pub struct JiraClient {
    client: Client,
    config: JiraConfig,
}

impl JiraClient {
    /// Create a client for the given site.
    pub fn new(config: JiraConfig) -> Self {
        Self {
            client: ClientBuilder::new()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    async fn request(&self, method: Method, endpoint: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.config.server, endpoint);
        debug!("{} {}", method, endpoint);

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.config.email, Some(&self.config.api_token));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TrackerError::NotFound(endpoint.to_owned()));
        }
        if !status.is_success() {
            return Err(TrackerError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| TrackerError::Malformed(e.to_string()))
    }

    fn estimation_endpoint(&self, key: &IssueKey) -> String {
        format!(
            "/rest/agile/1.0/issue/{}/estimation?boardId={}",
            key, self.config.board_id
        )
    }
}

#[async_trait]
impl Tracker for JiraClient {
    async fn get_issue(&self, key: &IssueKey) -> Result<Issue> {
        let doc = self
            .request(Method::GET, &format!("/rest/agile/1.0/issue/{key}"), None)
            .await?;
        parse_issue(&doc, &self.config.estimate_field)
    }

    async fn get_sprint_issues(&self, sprint_id: u64) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        let mut start_at = 0u64;
        loop {
            let page = self
                .request(
                    Method::GET,
                    &format!("/rest/agile/1.0/sprint/{sprint_id}/issue?startAt={start_at}"),
                    None,
                )
                .await?;
            let docs = page
                .get("issues")
                .and_then(Value::as_array)
                .ok_or_else(|| TrackerError::Malformed("sprint issue page".to_owned()))?;
            for doc in docs {
                issues.push(parse_issue(doc, &self.config.estimate_field)?);
            }

            let total = page.get("total").and_then(Value::as_u64).unwrap_or(0);
            start_at += docs.len() as u64;
            if start_at >= total || docs.is_empty() {
                return Ok(issues);
            }
        }
    }

    async fn get_active_sprint(&self) -> Result<Option<Sprint>> {
        let page = self
            .request(
                Method::GET,
                &format!("/rest/agile/1.0/board/{}/sprint", self.config.board_id),
                None,
            )
            .await?;
        let sprints = page
            .get("values")
            .and_then(Value::as_array)
            .ok_or_else(|| TrackerError::Malformed("board sprint page".to_owned()))?;
        for doc in sprints {
            let sprint = parse_sprint(doc)?;
            if sprint.active {
                return Ok(Some(sprint));
            }
        }
        Ok(None)
    }

    async fn get_estimate(&self, key: &IssueKey) -> Result<Option<f64>> {
        let doc = self
            .request(Method::GET, &self.estimation_endpoint(key), None)
            .await?;
        Ok(doc.get("value").and_then(Value::as_f64))
    }

    async fn set_estimate(&self, key: &IssueKey, estimate: Option<f64>) -> Result<()> {
        self.request(
            Method::PUT,
            &self.estimation_endpoint(key),
            Some(json!({ "value": estimate })),
        )
        .await?;
        Ok(())
    }

    async fn transition_issue(&self, key: &IssueKey, transition: &str) -> Result<()> {
        let doc = self
            .request(
                Method::GET,
                &format!("/rest/api/3/issue/{key}/transitions"),
                None,
            )
            .await?;
        let transition_id = doc
            .get("transitions")
            .and_then(Value::as_array)
            .and_then(|transitions| {
                transitions
                    .iter()
                    .find(|t| t.get("name").and_then(Value::as_str) == Some(transition))
            })
            .and_then(|t| t.get("id").cloned())
            .ok_or_else(|| TrackerError::TransitionNotFound {
                issue: key.to_string(),
                name: transition.to_owned(),
            })?;

        self.request(
            Method::POST,
            &format!("/rest/api/3/issue/{key}/transitions"),
            Some(json!({ "transition": { "id": transition_id } })),
        )
        .await?;
        Ok(())
    }

    async fn assign_issue(&self, key: &IssueKey, account_id: Option<&str>) -> Result<()> {
        self.request(
            Method::PUT,
            &format!("/rest/api/3/issue/{key}/assignee"),
            Some(json!({ "accountId": account_id })),
        )
        .await?;
        Ok(())
    }
}
