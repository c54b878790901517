//! Slack HTTP client and the webhook-backed notifier.

use crate::message::build_message;
use crate::trait_::{Notifier, NotifierError, Result};
use async_trait::async_trait;
use jackbot_core::{BotConfig, BurndownReport};
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Low-level Slack client: posts to an incoming webhook, plus the
/// channel-history helpers the functional tests use to observe and
/// clean up bot messages.
#[derive(Clone)]
pub struct SlackClient {
    client: Client,

    /// Incoming webhook URL the burndown messages are posted to
    webhook_url: String,

    /// Web-API token; only needed for the diagnostic helpers
    api_token: Option<String>,
}

impl SlackClient {
    /// Create a client posting to the given incoming webhook.
    pub fn new(webhook_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client: ClientBuilder::new()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            webhook_url: webhook_url.into(),
            api_token,
        }
    }

    /// Post a message body to the incoming webhook.
    pub async fn send_message(&self, message: &Value) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifierError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Poll a channel for the newest message posted by this webhook's
    /// bot, deleting it once found. Gives up after a minute.
    ///
    /// Diagnostic path only; requires an API token.
    pub async fn take_latest_bot_message(&self, channel_id: &str) -> Result<Option<Value>> {
        let token = self.api_token.as_deref().ok_or(NotifierError::NoApiToken)?;
        // The webhook URL's second-to-last path segment is the bot id.
        let bot_id = self
            .webhook_url
            .rsplit('/')
            .nth(1)
            .unwrap_or_default()
            .to_owned();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(60);
        while tokio::time::Instant::now() < deadline {
            let history = self.channel_history(token, channel_id).await?;
            for message in &history {
                if message.get("bot_id").and_then(Value::as_str) == Some(bot_id.as_str()) {
                    if let Some(ts) = message.get("ts").and_then(Value::as_str) {
                        self.delete_message(channel_id, ts).await?;
                    }
                    return Ok(Some(message.clone()));
                }
            }
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        Ok(None)
    }

    /// Delete a channel message by timestamp. Diagnostic path only.
    pub async fn delete_message(&self, channel_id: &str, ts: &str) -> Result<()> {
        let token = self.api_token.as_deref().ok_or(NotifierError::NoApiToken)?;
        let response = self
            .client
            .post("https://slack.com/api/chat.delete")
            .bearer_auth(token)
            .json(&serde_json::json!({ "channel": channel_id, "ts": ts }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifierError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn channel_history(&self, token: &str, channel_id: &str) -> Result<Vec<Value>> {
        let response = self
            .client
            .get("https://slack.com/api/conversations.history")
            .bearer_auth(token)
            .query(&[("channel", channel_id), ("limit", "10")])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifierError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| NotifierError::Malformed(e.to_string()))?;
        body.get("messages")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| NotifierError::Malformed("conversations.history".to_owned()))
    }
}

/// Notifier that renders a burndown report into Block Kit and posts it
/// through the incoming webhook.
#[derive(Clone)]
pub struct SlackNotifier {
    client: SlackClient,
    config: BotConfig,
}

impl SlackNotifier {
    /// Create a notifier over a Slack client.
    pub fn new(client: SlackClient, config: BotConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send_burndown(&self, report: &BurndownReport) -> Result<()> {
        debug!("posting burndown for sprint '{}'", report.sprint_name);
        let message = build_message(report, &self.config);
        self.client.send_message(&message).await
    }
}
