//! Weekday burndown trigger.

use crate::reporter::Reporter;
use chrono::{Datelike, Duration, Local, NaiveDateTime, NaiveTime, Weekday};
use jackbot_core::BotConfig;
use jackbot_jira::Tracker;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Next weekday instant at the given wall-clock time, strictly after
/// `after`. Saturday and Sunday never fire.
pub fn next_fire(after: NaiveDateTime, hour: u32, minute: u32) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    let mut candidate = after.date().and_time(time);
    if candidate <= after {
        candidate += Duration::days(1);
    }
    while matches!(candidate.weekday(), Weekday::Sat | Weekday::Sun) {
        candidate += Duration::days(1);
    }
    candidate
}

/// Background task that looks up the active sprint once per weekday and
/// runs the burndown reporter on it.
///
/// Independent of the event queue; both may invoke the reporter
/// concurrently.
pub struct Scheduler {
    tracker: Arc<dyn Tracker>,
    reporter: Arc<Reporter>,
    config: BotConfig,
    stop: watch::Receiver<bool>,
}

impl Scheduler {
    /// Create a scheduler. It starts ticking when `run` is awaited.
    pub fn new(
        tracker: Arc<dyn Tracker>,
        reporter: Arc<Reporter>,
        config: BotConfig,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            tracker,
            reporter,
            config,
            stop,
        }
    }

    /// Tick until the stop signal fires. Shutdown is cooperative: it
    /// only takes effect between ticks.
    pub async fn run(self) {
        let mut stop = self.stop.clone();
        loop {
            let now = Local::now().naive_local();
            let at = next_fire(now, self.config.report_hour, self.config.report_minute);
            let wait = (at - now).to_std().unwrap_or_default();
            debug!("next scheduled burndown report at {at}");

            tokio::select! {
                _ = tokio::time::sleep(wait) => self.fire().await,
                _ = stop.changed() => {
                    info!("scheduler stopped");
                    return;
                }
            }
        }
    }

    async fn fire(&self) {
        match self.tracker.get_active_sprint().await {
            Ok(Some(sprint)) => {
                if let Err(e) = self.reporter.report(sprint.id, &sprint.name).await {
                    error!("scheduled burndown report failed: {e}");
                }
            }
            Ok(None) => debug!("no active sprint, skipping scheduled report"),
            Err(e) => error!("active sprint lookup failed: {e}"),
        }
    }
}
