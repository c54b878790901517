//! Notifier trait abstraction.

use async_trait::async_trait;
use jackbot_core::BurndownReport;

/// Error type for notifier operations.
pub type Result<T> = std::result::Result<T, NotifierError>;

/// Errors that can occur posting to the chat service.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    /// The chat service rejected the call
    #[error("Slack API error (status {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response did not have the expected shape
    #[error("malformed Slack response: {0}")]
    Malformed(String),

    /// A diagnostic helper was called without an API token
    #[error("no Slack API token configured")]
    NoApiToken,
}

/// Outbound notification seam consumed by the burndown reporter.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a burndown report to the destination channel.
    async fn send_burndown(&self, report: &BurndownReport) -> Result<()>;
}
