//! Engine error type.

use jackbot_jira::TrackerError;
use jackbot_slack::NotifierError;

/// Failure of a single reconciliation or report pass. Surfaced to the
/// host's error channel; never fatal to the consumer or scheduler loop.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Tracker call failed
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Notifier call failed
    #[error(transparent)]
    Notifier(#[from] NotifierError),
}
