//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Knobs the engine is constructed with. Explicit configuration,
/// injected at construction - never read from ambient globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Jira server base URL, e.g. "https://moblab.atlassian.net"
    pub server: String,

    /// Project whose issue events the engine acts on
    pub project_key: String,

    /// Board whose sprints the engine reports on
    pub board_id: u64,

    /// True in production; false when driving the test sprint
    pub live: bool,

    /// Name of the sprint reserved for end-to-end testing
    pub test_sprint_name: String,

    /// Task estimates above this are flagged as oversized
    pub large_estimate_threshold: f64,

    /// Hour (local time) of the weekday burndown report
    pub report_hour: u32,

    /// Minute of the weekday burndown report
    pub report_minute: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            server: "https://moblab.atlassian.net".to_owned(),
            project_key: "EDU".to_owned(),
            board_id: 17,
            live: true,
            test_sprint_name: "TEST Sprint".to_owned(),
            large_estimate_threshold: 16.0,
            report_hour: 9,
            report_minute: 0,
        }
    }
}

impl BotConfig {
    /// URL of the sprint board, used as the headline link.
    pub fn board_url(&self) -> String {
        format!(
            "{}/secure/RapidBoard.jspa?rapidView={}",
            self.server, self.board_id
        )
    }

    /// Browse URL for an issue key.
    pub fn issue_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.server, key)
    }

    /// Whether a sprint is in scope for this deployment. The test
    /// sprint is only processed in non-live mode, and vice versa, so a
    /// staging sprint never leaks into production notifications.
    pub fn sprint_in_scope(&self, sprint_name: &str) -> bool {
        let is_test_sprint = sprint_name == self.test_sprint_name;
        self.live != is_test_sprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_mode_skips_the_test_sprint() {
        let config = BotConfig::default();
        assert!(config.sprint_in_scope("Sprint 12"));
        assert!(!config.sprint_in_scope("TEST Sprint"));
    }

    #[test]
    fn test_mode_only_processes_the_test_sprint() {
        let config = BotConfig {
            live: false,
            ..BotConfig::default()
        };
        assert!(config.sprint_in_scope("TEST Sprint"));
        assert!(!config.sprint_in_scope("Sprint 12"));
    }
}
